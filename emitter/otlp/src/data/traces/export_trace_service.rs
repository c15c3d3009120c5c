use sval_derive::Value;

use crate::data::{InstrumentationScope, Resource};

use super::span::Span;

#[derive(Value, Debug, Clone, PartialEq)]
pub struct ExportTraceServiceRequest<'a> {
    #[sval(label = "resourceSpans", index = 1)]
    pub resource_spans: Vec<ResourceSpans<'a>>,
}

#[derive(Value, Debug, Clone, PartialEq)]
pub struct ResourceSpans<'a> {
    #[sval(label = "resource", index = 1)]
    pub resource: Resource<'a>,
    #[sval(label = "scopeSpans", index = 2)]
    pub scope_spans: Vec<ScopeSpans<'a>>,
}

#[derive(Value, Debug, Clone, PartialEq)]
pub struct ScopeSpans<'a> {
    #[sval(label = "scope", index = 1)]
    pub scope: InstrumentationScope<'a>,
    #[sval(label = "spans", index = 2)]
    pub spans: Vec<Span<'a>>,
}
