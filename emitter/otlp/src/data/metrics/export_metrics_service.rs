use sval_derive::Value;

use crate::data::{InstrumentationScope, Resource};

use super::metric::Metric;

#[derive(Value, Debug, Clone, PartialEq)]
pub struct ExportMetricsServiceRequest<'a> {
    #[sval(label = "resourceMetrics", index = 1)]
    pub resource_metrics: Vec<ResourceMetrics<'a>>,
}

#[derive(Value, Debug, Clone, PartialEq)]
pub struct ResourceMetrics<'a> {
    #[sval(label = "resource", index = 1)]
    pub resource: Resource<'a>,
    #[sval(label = "scopeMetrics", index = 2)]
    pub scope_metrics: Vec<ScopeMetrics<'a>>,
}

#[derive(Value, Debug, Clone, PartialEq)]
pub struct ScopeMetrics<'a> {
    #[sval(label = "scope", index = 1)]
    pub scope: InstrumentationScope<'a>,
    #[sval(label = "metrics", index = 2)]
    pub metrics: Vec<Metric<'a>>,
}
