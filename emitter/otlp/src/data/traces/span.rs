use sval_derive::Value;

use crate::data::KeyValue;

#[derive(Value, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
#[sval(unlabeled_variants)]
pub enum SpanKind {
    Unspecified = 0,
    Internal = 1,
    Server = 2,
    Client = 3,
    Producer = 4,
    Consumer = 5,
}

impl From<melt_core::SpanKind> for SpanKind {
    fn from(kind: melt_core::SpanKind) -> Self {
        match kind {
            melt_core::SpanKind::Unspecified => SpanKind::Unspecified,
            melt_core::SpanKind::Internal => SpanKind::Internal,
            melt_core::SpanKind::Server => SpanKind::Server,
            melt_core::SpanKind::Client => SpanKind::Client,
            melt_core::SpanKind::Producer => SpanKind::Producer,
            melt_core::SpanKind::Consumer => SpanKind::Consumer,
        }
    }
}

#[derive(Value, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
#[sval(unlabeled_variants)]
pub enum StatusCode {
    Unset = 0,
    Ok = 1,
    Error = 2,
}

impl From<melt_core::StatusCode> for StatusCode {
    fn from(code: melt_core::StatusCode) -> Self {
        match code {
            melt_core::StatusCode::Unset => StatusCode::Unset,
            melt_core::StatusCode::Ok => StatusCode::Ok,
            melt_core::StatusCode::Error => StatusCode::Error,
        }
    }
}

#[derive(Value, Debug, Clone, PartialEq)]
pub struct Span<'a> {
    #[sval(label = "traceId", index = 1)]
    pub trace_id: &'a str,
    #[sval(label = "spanId", index = 2)]
    pub span_id: &'a str,
    #[sval(label = "traceState", index = 3)]
    pub trace_state: Option<&'a str>,
    #[sval(label = "parentSpanId", index = 4)]
    pub parent_span_id: Option<&'a str>,
    #[sval(label = "name", index = 5)]
    pub name: &'a str,
    #[sval(label = "kind", index = 6)]
    pub kind: SpanKind,
    #[sval(
        label = "startTimeUnixNano",
        index = 7,
        data_tag = "sval_protobuf::tags::PROTOBUF_I64"
    )]
    pub start_time_unix_nano: u64,
    #[sval(
        label = "endTimeUnixNano",
        index = 8,
        data_tag = "sval_protobuf::tags::PROTOBUF_I64"
    )]
    pub end_time_unix_nano: u64,
    #[sval(label = "attributes", index = 9)]
    pub attributes: Vec<KeyValue<'a>>,
    #[sval(label = "events", index = 11)]
    pub events: Vec<Event<'a>>,
    #[sval(label = "links", index = 13)]
    pub links: Vec<Link<'a>>,
    #[sval(label = "status", index = 15)]
    pub status: Option<Status<'a>>,
}

#[derive(Value, Debug, Clone, PartialEq)]
pub struct Event<'a> {
    #[sval(
        label = "timeUnixNano",
        index = 1,
        data_tag = "sval_protobuf::tags::PROTOBUF_I64"
    )]
    pub time_unix_nano: u64,
    #[sval(label = "name", index = 2)]
    pub name: &'a str,
    #[sval(label = "attributes", index = 3)]
    pub attributes: Vec<KeyValue<'a>>,
}

#[derive(Value, Debug, Clone, PartialEq)]
pub struct Link<'a> {
    #[sval(label = "traceId", index = 1)]
    pub trace_id: &'a str,
    #[sval(label = "spanId", index = 2)]
    pub span_id: &'a str,
    #[sval(label = "traceState", index = 3)]
    pub trace_state: Option<&'a str>,
    #[sval(label = "attributes", index = 4)]
    pub attributes: Vec<KeyValue<'a>>,
}

#[derive(Value, Debug, Clone, PartialEq)]
pub struct Status<'a> {
    #[sval(label = "message", index = 2)]
    pub message: &'a str,
    #[sval(label = "code", index = 3)]
    pub code: StatusCode,
}
