use serde::{Deserialize, Serialize};

use crate::value::{AttributeValue, Attributes};

/**
A log record, or a domain event when `is_event` is set.

OTLP doesn't distinguish events from logs, so events are sent as log records
marked with extra attributes.
*/
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Log {
    #[serde(rename = "typename", default, skip_serializing_if = "String::is_empty")]
    pub type_name: String,
    #[serde(default)]
    pub body: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub severity: String,
    /**
    Nanoseconds since the Unix epoch. Zero means the time of export.
    */
    #[serde(default)]
    pub timestamp: u64,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    #[serde(rename = "isevent", default)]
    pub is_event: bool,
}

impl Log {
    pub fn new(body: impl Into<String>) -> Self {
        Log {
            body: body.into(),
            ..Default::default()
        }
    }

    pub fn event(type_name: impl Into<String>, body: impl Into<String>) -> Self {
        Log {
            type_name: type_name.into(),
            body: body.into(),
            is_event: true,
            ..Default::default()
        }
    }

    pub fn with_severity(mut self, severity: impl Into<String>) -> Self {
        self.severity = severity.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}
