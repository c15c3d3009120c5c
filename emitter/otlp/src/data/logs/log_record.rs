use sval_derive::Value;

use crate::data::{AnyValue, KeyValue};

#[derive(Value, Debug, Clone, PartialEq)]
pub struct LogRecord<'a> {
    #[sval(
        label = "timeUnixNano",
        index = 1,
        data_tag = "sval_protobuf::tags::PROTOBUF_I64"
    )]
    pub time_unix_nano: u64,
    #[sval(
        label = "observedTimeUnixNano",
        index = 11,
        data_tag = "sval_protobuf::tags::PROTOBUF_I64"
    )]
    pub observed_time_unix_nano: u64,
    #[sval(label = "severityText", index = 3)]
    pub severity_text: Option<&'a str>,
    #[sval(label = "body", index = 5)]
    pub body: AnyValue<'a>,
    #[sval(label = "attributes", index = 6)]
    pub attributes: Vec<KeyValue<'a>>,
}
