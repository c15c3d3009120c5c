use serde::{Deserialize, Serialize};

use crate::value::{AttributeValue, Attributes};

closed_enum! {
    /**
    The relationship of a span to its parent and children.
    */
    pub enum SpanKind ("span kind", prefix = "span_kind_") {
        #[default]
        Unspecified = 0 => "unspecified",
        Internal = 1 => "internal",
        Server = 2 => "server",
        Client = 3 => "client",
        Producer = 4 => "producer",
        Consumer = 5 => "consumer",
    }
}

closed_enum! {
    /**
    The outcome of a span.
    */
    pub enum StatusCode ("status code", prefix = "status_code_") {
        #[default]
        Unset = 0 => "unset",
        Ok = 1 => "ok",
        Error = 2 => "error",
    }
}

/**
A span attached to an entity.

Trace and span ids are opaque strings. They're sent exactly as given, even
when they aren't 16 or 8 byte hex ids.
*/
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Span {
    #[serde(rename = "traceid", default)]
    pub trace_id: String,
    #[serde(rename = "spanid", default)]
    pub span_id: String,
    #[serde(rename = "parentspanid", default, skip_serializing_if = "String::is_empty")]
    pub parent_span_id: String,
    #[serde(rename = "tracestate", default, skip_serializing_if = "String::is_empty")]
    pub trace_state: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kind: SpanKind,
    #[serde(rename = "starttime", default)]
    pub start_time: u64,
    #[serde(rename = "endtime", default)]
    pub end_time: u64,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<SpanEvent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<SpanLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SpanStatus>,
}

impl Span {
    pub fn new(
        trace_id: impl Into<String>,
        span_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Span {
            trace_id: trace_id.into(),
            span_id: span_id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_parent(mut self, parent_span_id: impl Into<String>) -> Self {
        self.parent_span_id = parent_span_id.into();
        self
    }

    pub fn with_trace_state(mut self, trace_state: impl Into<String>) -> Self {
        self.trace_state = trace_state.into();
        self
    }

    pub fn with_kind(mut self, kind: SpanKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_times(mut self, start_time: u64, end_time: u64) -> Self {
        self.start_time = start_time;
        self.end_time = end_time;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_event(mut self, event: SpanEvent) -> Self {
        self.events.push(event);
        self
    }

    pub fn with_link(mut self, link: SpanLink) -> Self {
        self.links.push(link);
        self
    }

    pub fn with_status(mut self, code: StatusCode, message: impl Into<String>) -> Self {
        self.status = Some(SpanStatus {
            code,
            message: message.into(),
        });
        self
    }
}

/**
A timestamped event within a span.
*/
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanEvent {
    pub name: String,
    #[serde(default)]
    pub timestamp: u64,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
}

impl SpanEvent {
    pub fn new(name: impl Into<String>, timestamp: u64) -> Self {
        SpanEvent {
            name: name.into(),
            timestamp,
            attributes: Attributes::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/**
A link from a span to a span in another trace.
*/
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanLink {
    #[serde(rename = "traceid")]
    pub trace_id: String,
    #[serde(rename = "spanid")]
    pub span_id: String,
    #[serde(rename = "tracestate", default, skip_serializing_if = "String::is_empty")]
    pub trace_state: String,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
}

impl SpanLink {
    pub fn new(trace_id: impl Into<String>, span_id: impl Into<String>) -> Self {
        SpanLink {
            trace_id: trace_id.into(),
            span_id: span_id.into(),
            ..Default::default()
        }
    }

    pub fn with_trace_state(mut self, trace_state: impl Into<String>) -> Self {
        self.trace_state = trace_state.into();
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanStatus {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: StatusCode,
}
