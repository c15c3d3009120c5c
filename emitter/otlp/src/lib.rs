/*!
Encode synthesized telemetry documents as OTLP and send them to an ingestion API.

Each [`Signal`] is encoded into a single protobuf export request containing one resource block per entity.
Requests are sent by an [`Exporter`] over HTTP, or rendered for inspection with [`dump()`].
*/

mod client;
pub mod data;
mod dump;
mod error;
mod exporter;
mod internal_metrics;
mod signal;

pub use self::{
    client::{Transport, TransportBuilder},
    dump::{dump, DumpFormat},
    error::{Error, ErrorKind},
    exporter::{ExportReport, Exporter, ExporterBuilder},
    internal_metrics::ExporterMetrics,
    signal::Signal,
};

/**
Start building an [`Exporter`] that sends to `endpoint`.
*/
pub fn http(endpoint: impl Into<String>) -> ExporterBuilder {
    ExporterBuilder::new().transport(TransportBuilder::new(endpoint))
}
