use sval_derive::Value;

use crate::data::{InstrumentationScope, Resource};

use super::log_record::LogRecord;

#[derive(Value, Debug, Clone, PartialEq)]
pub struct ExportLogsServiceRequest<'a> {
    #[sval(label = "resourceLogs", index = 1)]
    pub resource_logs: Vec<ResourceLogs<'a>>,
}

#[derive(Value, Debug, Clone, PartialEq)]
pub struct ResourceLogs<'a> {
    #[sval(label = "resource", index = 1)]
    pub resource: Resource<'a>,
    #[sval(label = "scopeLogs", index = 2)]
    pub scope_logs: Vec<ScopeLogs<'a>>,
}

#[derive(Value, Debug, Clone, PartialEq)]
pub struct ScopeLogs<'a> {
    #[sval(label = "scope", index = 1)]
    pub scope: InstrumentationScope<'a>,
    #[sval(label = "logRecords", index = 2)]
    pub log_records: Vec<LogRecord<'a>>,
}
