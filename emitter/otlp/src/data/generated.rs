/*
Message definitions for the subset of OTLP used by tests to decode encoded payloads.

These mirror the upstream `opentelemetry-proto` definitions field for field.
*/

pub(crate) mod common {
    pub(crate) mod v1 {
        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct AnyValue {
            #[prost(oneof = "any_value::Value", tags = "1, 2, 3, 4, 5, 6")]
            pub value: Option<any_value::Value>,
        }

        pub mod any_value {
            #[derive(Clone, PartialEq, ::prost::Oneof)]
            pub enum Value {
                #[prost(string, tag = "1")]
                StringValue(String),
                #[prost(bool, tag = "2")]
                BoolValue(bool),
                #[prost(int64, tag = "3")]
                IntValue(i64),
                #[prost(double, tag = "4")]
                DoubleValue(f64),
                #[prost(message, tag = "5")]
                ArrayValue(super::ArrayValue),
                #[prost(message, tag = "6")]
                KvlistValue(super::KeyValueList),
            }
        }

        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct ArrayValue {
            #[prost(message, repeated, tag = "1")]
            pub values: Vec<AnyValue>,
        }

        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct KeyValueList {
            #[prost(message, repeated, tag = "1")]
            pub values: Vec<KeyValue>,
        }

        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct KeyValue {
            #[prost(string, tag = "1")]
            pub key: String,
            #[prost(message, optional, tag = "2")]
            pub value: Option<AnyValue>,
        }

        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct InstrumentationScope {
            #[prost(string, tag = "1")]
            pub name: String,
            #[prost(string, tag = "2")]
            pub version: String,
        }
    }
}

pub(crate) mod resource {
    pub(crate) mod v1 {
        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct Resource {
            #[prost(message, repeated, tag = "1")]
            pub attributes: Vec<super::super::common::v1::KeyValue>,
        }
    }
}

pub(crate) mod metrics {
    pub(crate) mod v1 {
        use super::super::{common::v1::*, resource::v1::Resource};

        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct ResourceMetrics {
            #[prost(message, optional, tag = "1")]
            pub resource: Option<Resource>,
            #[prost(message, repeated, tag = "2")]
            pub scope_metrics: Vec<ScopeMetrics>,
        }

        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct ScopeMetrics {
            #[prost(message, optional, tag = "1")]
            pub scope: Option<InstrumentationScope>,
            #[prost(message, repeated, tag = "2")]
            pub metrics: Vec<Metric>,
        }

        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct Metric {
            #[prost(string, tag = "1")]
            pub name: String,
            #[prost(string, tag = "3")]
            pub unit: String,
            #[prost(oneof = "metric::Data", tags = "5, 7")]
            pub data: Option<metric::Data>,
        }

        pub mod metric {
            #[derive(Clone, PartialEq, ::prost::Oneof)]
            pub enum Data {
                #[prost(message, tag = "5")]
                Gauge(super::Gauge),
                #[prost(message, tag = "7")]
                Sum(super::Sum),
            }
        }

        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct Gauge {
            #[prost(message, repeated, tag = "1")]
            pub data_points: Vec<NumberDataPoint>,
        }

        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct Sum {
            #[prost(message, repeated, tag = "1")]
            pub data_points: Vec<NumberDataPoint>,
            #[prost(enumeration = "AggregationTemporality", tag = "2")]
            pub aggregation_temporality: i32,
            #[prost(bool, tag = "3")]
            pub is_monotonic: bool,
        }

        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct NumberDataPoint {
            #[prost(message, repeated, tag = "7")]
            pub attributes: Vec<KeyValue>,
            #[prost(fixed64, tag = "2")]
            pub start_time_unix_nano: u64,
            #[prost(fixed64, tag = "3")]
            pub time_unix_nano: u64,
            #[prost(oneof = "number_data_point::Value", tags = "4, 6")]
            pub value: Option<number_data_point::Value>,
        }

        pub mod number_data_point {
            #[derive(Clone, PartialEq, ::prost::Oneof)]
            pub enum Value {
                #[prost(double, tag = "4")]
                AsDouble(f64),
                #[prost(sfixed64, tag = "6")]
                AsInt(i64),
            }
        }

        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
        #[repr(i32)]
        pub enum AggregationTemporality {
            Unspecified = 0,
            Delta = 1,
            Cumulative = 2,
        }
    }
}

pub(crate) mod logs {
    pub(crate) mod v1 {
        use super::super::{common::v1::*, resource::v1::Resource};

        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct ResourceLogs {
            #[prost(message, optional, tag = "1")]
            pub resource: Option<Resource>,
            #[prost(message, repeated, tag = "2")]
            pub scope_logs: Vec<ScopeLogs>,
        }

        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct ScopeLogs {
            #[prost(message, optional, tag = "1")]
            pub scope: Option<InstrumentationScope>,
            #[prost(message, repeated, tag = "2")]
            pub log_records: Vec<LogRecord>,
        }

        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct LogRecord {
            #[prost(fixed64, tag = "1")]
            pub time_unix_nano: u64,
            #[prost(fixed64, tag = "11")]
            pub observed_time_unix_nano: u64,
            #[prost(string, tag = "3")]
            pub severity_text: String,
            #[prost(message, optional, tag = "5")]
            pub body: Option<AnyValue>,
            #[prost(message, repeated, tag = "6")]
            pub attributes: Vec<KeyValue>,
        }
    }
}

pub(crate) mod trace {
    pub(crate) mod v1 {
        use super::super::{common::v1::*, resource::v1::Resource};

        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct ResourceSpans {
            #[prost(message, optional, tag = "1")]
            pub resource: Option<Resource>,
            #[prost(message, repeated, tag = "2")]
            pub scope_spans: Vec<ScopeSpans>,
        }

        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct ScopeSpans {
            #[prost(message, optional, tag = "1")]
            pub scope: Option<InstrumentationScope>,
            #[prost(message, repeated, tag = "2")]
            pub spans: Vec<Span>,
        }

        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct Span {
            #[prost(bytes = "vec", tag = "1")]
            pub trace_id: Vec<u8>,
            #[prost(bytes = "vec", tag = "2")]
            pub span_id: Vec<u8>,
            #[prost(string, tag = "3")]
            pub trace_state: String,
            #[prost(bytes = "vec", tag = "4")]
            pub parent_span_id: Vec<u8>,
            #[prost(string, tag = "5")]
            pub name: String,
            #[prost(enumeration = "span::SpanKind", tag = "6")]
            pub kind: i32,
            #[prost(fixed64, tag = "7")]
            pub start_time_unix_nano: u64,
            #[prost(fixed64, tag = "8")]
            pub end_time_unix_nano: u64,
            #[prost(message, repeated, tag = "9")]
            pub attributes: Vec<KeyValue>,
            #[prost(message, repeated, tag = "11")]
            pub events: Vec<span::Event>,
            #[prost(message, repeated, tag = "13")]
            pub links: Vec<span::Link>,
            #[prost(message, optional, tag = "15")]
            pub status: Option<Status>,
        }

        pub mod span {
            use super::KeyValue;

            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct Event {
                #[prost(fixed64, tag = "1")]
                pub time_unix_nano: u64,
                #[prost(string, tag = "2")]
                pub name: String,
                #[prost(message, repeated, tag = "3")]
                pub attributes: Vec<KeyValue>,
            }

            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct Link {
                #[prost(bytes = "vec", tag = "1")]
                pub trace_id: Vec<u8>,
                #[prost(bytes = "vec", tag = "2")]
                pub span_id: Vec<u8>,
                #[prost(string, tag = "3")]
                pub trace_state: String,
                #[prost(message, repeated, tag = "4")]
                pub attributes: Vec<KeyValue>,
            }

            #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
            #[repr(i32)]
            pub enum SpanKind {
                Unspecified = 0,
                Internal = 1,
                Server = 2,
                Client = 3,
                Producer = 4,
                Consumer = 5,
            }
        }

        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct Status {
            #[prost(string, tag = "2")]
            pub message: String,
            #[prost(enumeration = "status::StatusCode", tag = "3")]
            pub code: i32,
        }

        pub mod status {
            #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
            #[repr(i32)]
            pub enum StatusCode {
                Unset = 0,
                Ok = 1,
                Error = 2,
            }
        }
    }
}

pub(crate) mod collector {
    pub(crate) mod metrics {
        pub(crate) mod v1 {
            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct ExportMetricsServiceRequest {
                #[prost(message, repeated, tag = "1")]
                pub resource_metrics: Vec<crate::data::generated::metrics::v1::ResourceMetrics>,
            }
        }
    }

    pub(crate) mod logs {
        pub(crate) mod v1 {
            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct ExportLogsServiceRequest {
                #[prost(message, repeated, tag = "1")]
                pub resource_logs: Vec<crate::data::generated::logs::v1::ResourceLogs>,
            }
        }
    }

    pub(crate) mod trace {
        pub(crate) mod v1 {
            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct ExportTraceServiceRequest {
                #[prost(message, repeated, tag = "1")]
                pub resource_spans: Vec<crate::data::generated::trace::v1::ResourceSpans>,
            }
        }
    }
}
