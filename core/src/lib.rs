/*!
The data model for synthesized telemetry.

A [`FsocData`] document is a flat list of [`Entity`] values. Each entity owns
the metrics, logs, events, spans, and relationships observed for it.
*/

#[macro_use]
mod parse;

pub mod clock;
pub mod document;
pub mod entity;
pub mod log;
pub mod metric;
pub mod span;
pub mod synth;
pub mod value;

mod error;

pub use self::{
    clock::{Clock, FixedClock, SystemClock, Timestamp},
    document::FsocData,
    entity::{Entity, Relationship},
    error::Error,
    log::Log,
    metric::{AggregationTemporality, ContentType, DataPoint, Metric, ValueType},
    span::{Span, SpanEvent, SpanKind, SpanLink, SpanStatus, StatusCode},
    synth::Synthesizer,
    value::{AttributeValue, Attributes},
};
