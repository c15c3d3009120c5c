mod export_metrics_service;
mod metric;

use melt_core::{ContentType, DataPoint, Entity, ValueType};

use crate::{internal_metrics::InternalMetrics, Error};

pub use self::{export_metrics_service::*, metric::*};

use super::{encode_attributes, EncodeReport, InstrumentationScope, Resource};

/**
Build a metrics export request from a set of entities.

Each entity with at least one encodable metric contributes one resource block.
Metrics with an unsupported content or value type are dropped and recorded in `report`.
*/
pub fn encode_request<'a>(
    entities: &'a [Entity],
    report: &mut EncodeReport,
    metrics: &InternalMetrics,
) -> ExportMetricsServiceRequest<'a> {
    let mut resource_metrics = Vec::new();

    for entity in entities {
        let mut encoded = Vec::with_capacity(entity.metrics.len());

        for metric in &entity.metrics {
            match encode_metric(metric) {
                Ok(metric) => {
                    metrics.metric_encoded.increment();

                    encoded.push(metric)
                }
                Err(err) => {
                    metrics.metric_unsupported.increment();

                    report.push(err);
                }
            }
        }

        if encoded.is_empty() {
            continue;
        }

        resource_metrics.push(ResourceMetrics {
            resource: Resource::from_entity(entity),
            scope_metrics: vec![ScopeMetrics {
                scope: InstrumentationScope::default(),
                metrics: encoded,
            }],
        });
    }

    ExportMetricsServiceRequest { resource_metrics }
}

/**
Encode a single metric.
*/
pub fn encode_metric(metric: &melt_core::Metric) -> Result<Metric<'_>, Error> {
    if let ValueType::Unsupported(ref value_type) = metric.value_type {
        return Err(Error::unsupported(format_args!(
            "metric {} has unsupported value type {value_type:?}; expected long or double",
            metric.type_name
        )));
    }

    let data_points = || {
        metric
            .data_points
            .iter()
            .map(|point| encode_data_point(metric, point))
            .collect()
    };

    let data = match metric.content_type {
        ContentType::Sum => MetricData::Sum(Sum {
            data_points: data_points(),
            aggregation_temporality: metric.aggregation_temporality.into(),
            is_monotonic: metric.is_monotonic,
        }),
        ContentType::Gauge => MetricData::Gauge(Gauge {
            data_points: data_points(),
        }),
        ContentType::Unsupported(ref content_type) => {
            return Err(Error::unsupported(format_args!(
                "metric {} has unsupported content type {content_type:?}; expected sum or gauge",
                metric.type_name
            )))
        }
    };

    Ok(Metric {
        name: &metric.type_name,
        unit: &metric.unit,
        data,
    })
}

fn encode_data_point<'a>(metric: &'a melt_core::Metric, point: &DataPoint) -> NumberDataPoint<'a> {
    let value = match metric.value_type {
        ValueType::Long => NumberDataPointValue::AsInt(AsInt(point.value as i64)),
        _ => NumberDataPointValue::AsDouble(AsDouble(point.value)),
    };

    NumberDataPoint {
        attributes: encode_attributes(&metric.attributes),
        start_time_unix_nano: point.start_time,
        time_unix_nano: point.end_time,
        value,
    }
}
