use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::{AttributeValue, Attributes};

closed_enum! {
    /**
    Whether the value of a sum resets each reporting interval or accumulates.
    */
    pub enum AggregationTemporality ("aggregation temporality", prefix = "aggregation_temporality_") {
        #[default]
        Unspecified = 0 => "unspecified",
        Delta = 1 => "delta",
        Cumulative = 2 => "cumulative",
    }
}

/**
The kind of metric data a [`Metric`] carries.

Kinds that can't be encoded are kept so a document containing them still
loads; exporters reject them per metric.
*/
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContentType {
    Sum,
    Gauge,
    Unsupported(String),
}

impl From<String> for ContentType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "sum" => ContentType::Sum,
            "gauge" => ContentType::Gauge,
            _ => ContentType::Unsupported(value),
        }
    }
}

impl From<ContentType> for String {
    fn from(value: ContentType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentType::Sum => f.write_str("sum"),
            ContentType::Gauge => f.write_str("gauge"),
            ContentType::Unsupported(other) => f.write_str(other),
        }
    }
}

/**
The numeric type of the values in a [`Metric`].
*/
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ValueType {
    Long,
    Double,
    Unsupported(String),
}

impl From<String> for ValueType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "long" => ValueType::Long,
            "double" => ValueType::Double,
            _ => ValueType::Unsupported(value),
        }
    }
}

impl From<ValueType> for String {
    fn from(value: ValueType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Long => f.write_str("long"),
            ValueType::Double => f.write_str("double"),
            ValueType::Unsupported(other) => f.write_str(other),
        }
    }
}

/**
A single observation of a metric over the range `start_time..end_time`.

Times are nanoseconds since the Unix epoch.
*/
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    #[serde(rename = "starttime", default)]
    pub start_time: u64,
    #[serde(rename = "endtime", default)]
    pub end_time: u64,
    pub value: f64,
}

impl DataPoint {
    pub fn new(start_time: u64, end_time: u64, value: f64) -> Self {
        DataPoint {
            start_time,
            end_time,
            value,
        }
    }
}

/**
A metric attached to an entity.

`min`, `max`, and `value` aren't sent anywhere. They're hints used to
synthesize data points when `data_points` is empty.
*/
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    #[serde(rename = "typename")]
    pub type_name: String,
    #[serde(default)]
    pub unit: String,
    #[serde(rename = "contenttype")]
    pub content_type: ContentType,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    #[serde(rename = "ismonotonic", default)]
    pub is_monotonic: bool,
    #[serde(rename = "aggregationtemporality", default)]
    pub aggregation_temporality: AggregationTemporality,
    #[serde(rename = "datapoints", default, skip_serializing_if = "Vec::is_empty")]
    pub data_points: Vec<DataPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Metric {
    pub fn new(
        type_name: impl Into<String>,
        unit: impl Into<String>,
        content_type: ContentType,
        value_type: ValueType,
    ) -> Self {
        Metric {
            type_name: type_name.into(),
            unit: unit.into(),
            content_type,
            value_type,
            attributes: Attributes::new(),
            is_monotonic: false,
            aggregation_temporality: AggregationTemporality::Unspecified,
            data_points: Vec::new(),
            min: None,
            max: None,
            value: None,
        }
    }

    pub fn sum(type_name: impl Into<String>, unit: impl Into<String>, value_type: ValueType) -> Self {
        Metric::new(type_name, unit, ContentType::Sum, value_type)
    }

    pub fn gauge(
        type_name: impl Into<String>,
        unit: impl Into<String>,
        value_type: ValueType,
    ) -> Self {
        Metric::new(type_name, unit, ContentType::Gauge, value_type)
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_monotonic(mut self, is_monotonic: bool) -> Self {
        self.is_monotonic = is_monotonic;
        self
    }

    pub fn with_temporality(mut self, temporality: AggregationTemporality) -> Self {
        self.aggregation_temporality = temporality;
        self
    }

    pub fn with_data_point(mut self, start_time: u64, end_time: u64, value: f64) -> Self {
        self.add_data_point(start_time, end_time, value);
        self
    }

    pub fn with_min(mut self, min: impl Into<String>) -> Self {
        self.min = Some(min.into());
        self
    }

    pub fn with_max(mut self, max: impl Into<String>) -> Self {
        self.max = Some(max.into());
        self
    }

    pub fn with_value_hint(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn add_data_point(&mut self, start_time: u64, end_time: u64, value: f64) -> &mut Self {
        self.data_points
            .push(DataPoint::new(start_time, end_time, value));
        self
    }
}
