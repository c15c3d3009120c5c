mod export_trace_service;
mod span;

use melt_core::Entity;

use crate::internal_metrics::InternalMetrics;

pub use self::{export_trace_service::*, span::*};

use super::{encode_attributes, InstrumentationScope, Resource};

fn non_empty(value: &str) -> Option<&str> {
    Some(value).filter(|value| !value.is_empty())
}

/**
Build a trace export request from a set of entities.

Each entity with at least one span contributes one resource block.

Ids are passed through as given. Protobuf `bytes` and `string` fields share a wire encoding,
so the payload carries the UTF-8 bytes of each id while text renderings show the id itself.
*/
pub fn encode_request<'a>(
    entities: &'a [Entity],
    metrics: &InternalMetrics,
) -> ExportTraceServiceRequest<'a> {
    let resource_spans = entities
        .iter()
        .filter(|entity| !entity.spans.is_empty())
        .map(|entity| {
            let spans = entity
                .spans
                .iter()
                .map(|span| {
                    metrics.span_encoded.increment();

                    encode_span(span)
                })
                .collect();

            ResourceSpans {
                resource: Resource::from_entity(entity),
                scope_spans: vec![ScopeSpans {
                    scope: InstrumentationScope::default(),
                    spans,
                }],
            }
        })
        .collect();

    ExportTraceServiceRequest { resource_spans }
}

/**
Encode a single span, along with its events, links, and status.
*/
pub fn encode_span(span: &melt_core::Span) -> Span<'_> {
    Span {
        trace_id: &span.trace_id,
        span_id: &span.span_id,
        trace_state: non_empty(&span.trace_state),
        parent_span_id: non_empty(&span.parent_span_id),
        name: &span.name,
        kind: span.kind.into(),
        start_time_unix_nano: span.start_time,
        end_time_unix_nano: span.end_time,
        attributes: encode_attributes(&span.attributes),
        events: span
            .events
            .iter()
            .map(|event| Event {
                time_unix_nano: event.timestamp,
                name: &event.name,
                attributes: encode_attributes(&event.attributes),
            })
            .collect(),
        links: span
            .links
            .iter()
            .map(|link| Link {
                trace_id: &link.trace_id,
                span_id: &link.span_id,
                trace_state: non_empty(&link.trace_state),
                attributes: encode_attributes(&link.attributes),
            })
            .collect(),
        status: span.status.as_ref().map(|status| Status {
            message: &status.message,
            code: status.code.into(),
        }),
    }
}
