use sval_derive::Value;

use crate::data::KeyValue;

#[derive(Value, Debug, Clone, PartialEq)]
pub struct Metric<'a> {
    #[sval(label = "name", index = 1)]
    pub name: &'a str,
    #[sval(label = "unit", index = 3)]
    pub unit: &'a str,
    #[sval(flatten)]
    pub data: MetricData<'a>,
}

#[derive(Value, Debug, Clone, PartialEq)]
pub enum MetricData<'a> {
    #[sval(label = "gauge", index = 5)]
    Gauge(Gauge<'a>),
    #[sval(label = "sum", index = 7)]
    Sum(Sum<'a>),
}

#[derive(Value, Debug, Clone, PartialEq)]
pub struct Gauge<'a> {
    #[sval(label = "dataPoints", index = 1)]
    pub data_points: Vec<NumberDataPoint<'a>>,
}

#[derive(Value, Debug, Clone, PartialEq)]
pub struct Sum<'a> {
    #[sval(label = "dataPoints", index = 1)]
    pub data_points: Vec<NumberDataPoint<'a>>,
    #[sval(label = "aggregationTemporality", index = 2)]
    pub aggregation_temporality: AggregationTemporality,
    #[sval(label = "isMonotonic", index = 3)]
    pub is_monotonic: bool,
}

#[derive(Value, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
#[sval(unlabeled_variants)]
pub enum AggregationTemporality {
    Unspecified = 0,
    Delta = 1,
    Cumulative = 2,
}

impl From<melt_core::AggregationTemporality> for AggregationTemporality {
    fn from(temporality: melt_core::AggregationTemporality) -> Self {
        match temporality {
            melt_core::AggregationTemporality::Unspecified => AggregationTemporality::Unspecified,
            melt_core::AggregationTemporality::Delta => AggregationTemporality::Delta,
            melt_core::AggregationTemporality::Cumulative => AggregationTemporality::Cumulative,
        }
    }
}

#[derive(Value, Debug, Clone, PartialEq)]
pub struct NumberDataPoint<'a> {
    #[sval(label = "attributes", index = 7)]
    pub attributes: Vec<KeyValue<'a>>,
    #[sval(
        label = "startTimeUnixNano",
        index = 2,
        data_tag = "sval_protobuf::tags::PROTOBUF_I64"
    )]
    pub start_time_unix_nano: u64,
    #[sval(
        label = "timeUnixNano",
        index = 3,
        data_tag = "sval_protobuf::tags::PROTOBUF_I64"
    )]
    pub time_unix_nano: u64,
    #[sval(flatten)]
    pub value: NumberDataPointValue,
}

#[derive(Value, Debug, Clone, Copy, PartialEq)]
pub enum NumberDataPointValue {
    #[sval(label = "asDouble", index = 4)]
    AsDouble(AsDouble),
    #[sval(label = "asInt", index = 6)]
    AsInt(AsInt),
}

#[derive(Value, Debug, Clone, Copy, PartialEq)]
pub struct AsDouble(pub f64);

#[derive(Value, Debug, Clone, Copy, PartialEq, Eq)]
#[sval(tag = "sval_protobuf::tags::PROTOBUF_I64")]
pub struct AsInt(pub i64);
