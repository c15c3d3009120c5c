use melt_core::{Entity, Timestamp};
use sval_protobuf::buf::{ProtoBuf, ProtoBufCursor};

use crate::{internal_metrics::InternalMetrics, Error, Signal};

pub mod logs;
pub mod metrics;
pub mod traces;

mod any_value;
mod instrumentation_scope;
mod resource;

#[cfg(test)]
pub(crate) mod generated;

pub use self::{any_value::*, instrumentation_scope::*, resource::*};

/**
Items that were dropped while encoding a batch.
*/
#[derive(Debug, Default)]
pub struct EncodeReport {
    unsupported: Vec<Error>,
}

impl EncodeReport {
    pub(crate) fn push(&mut self, err: Error) {
        self.unsupported.push(err);
    }

    /**
    Whether every item in the batch was encoded.
    */
    pub fn is_empty(&self) -> bool {
        self.unsupported.is_empty()
    }

    /**
    The items that used an unsupported signal type.
    */
    pub fn unsupported(&self) -> &[Error] {
        &self.unsupported
    }
}

/**
An export request for any signal.
*/
pub enum ExportRequest<'a> {
    Metrics(metrics::ExportMetricsServiceRequest<'a>),
    Logs(logs::ExportLogsServiceRequest<'a>),
    Traces(traces::ExportTraceServiceRequest<'a>),
}

impl<'a> ExportRequest<'a> {
    /**
    Build the request for `signal` from a set of entities.
    */
    pub(crate) fn encode(
        signal: Signal,
        entities: &'a [Entity],
        now: Timestamp,
        report: &mut EncodeReport,
        metrics: &InternalMetrics,
    ) -> Self {
        match signal {
            Signal::Metrics => {
                ExportRequest::Metrics(metrics::encode_request(entities, report, metrics))
            }
            Signal::Logs | Signal::Events => {
                ExportRequest::Logs(logs::encode_request(entities, now, metrics))
            }
            Signal::Traces => ExportRequest::Traces(traces::encode_request(entities, metrics)),
        }
    }

    /**
    The number of resource blocks in the request.
    */
    pub fn len(&self) -> usize {
        match self {
            ExportRequest::Metrics(request) => request.resource_metrics.len(),
            ExportRequest::Logs(request) => request.resource_logs.len(),
            ExportRequest::Traces(request) => request.resource_spans.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'a> sval::Value for ExportRequest<'a> {
    fn stream<'sval, S: sval::Stream<'sval> + ?Sized>(&'sval self, stream: &mut S) -> sval::Result {
        match self {
            ExportRequest::Metrics(request) => request.stream(stream),
            ExportRequest::Logs(request) => request.stream(stream),
            ExportRequest::Traces(request) => request.stream(stream),
        }
    }
}

/**
A request body encoded as protobuf.
*/
pub struct EncodedPayload(ProtoBuf);

impl EncodedPayload {
    pub(crate) fn encode(value: impl sval::Value) -> Self {
        EncodedPayload(sval_protobuf::stream_to_protobuf(value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn into_cursor(self) -> ProtoBufCursor {
        self.0.into_cursor()
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec().into_owned()
    }
}
