mod export_logs_service;
mod log_record;

use melt_core::{Entity, Log, Timestamp};

use crate::internal_metrics::InternalMetrics;

pub use self::{export_logs_service::*, log_record::*};

use super::{encode_attributes, insert_attribute, AnyValue, InstrumentationScope, Resource};

/**
The attribute that flags a log record as an event.
*/
pub const IS_EVENT_KEY: &str = "appd.isevent";

/**
The attribute that carries the type of an event.
*/
pub const EVENT_TYPE_KEY: &str = "appd.event.type";

/**
Build a logs export request from a set of entities.

Each entity with at least one log or event contributes one resource block.
Records without a timestamp are stamped with `now`.
*/
pub fn encode_request<'a>(
    entities: &'a [Entity],
    now: Timestamp,
    metrics: &InternalMetrics,
) -> ExportLogsServiceRequest<'a> {
    let now = now.to_unix_nanos();

    let resource_logs = entities
        .iter()
        .filter(|entity| !entity.logs.is_empty())
        .map(|entity| {
            let log_records = entity
                .logs
                .iter()
                .map(|log| {
                    metrics.log_encoded.increment();

                    encode_log_record(log, now)
                })
                .collect();

            ResourceLogs {
                resource: Resource::from_entity(entity),
                scope_logs: vec![ScopeLogs {
                    scope: InstrumentationScope::default(),
                    log_records,
                }],
            }
        })
        .collect();

    ExportLogsServiceRequest { resource_logs }
}

/**
Encode a single log or event.
*/
pub fn encode_log_record(log: &Log, now_unix_nano: u64) -> LogRecord<'_> {
    let time_unix_nano = if log.timestamp == 0 {
        now_unix_nano
    } else {
        log.timestamp
    };

    let mut attributes = encode_attributes(&log.attributes);

    if log.is_event {
        insert_attribute(&mut attributes, IS_EVENT_KEY, AnyValue::Bool(true));
        insert_attribute(
            &mut attributes,
            EVENT_TYPE_KEY,
            AnyValue::String(&log.type_name),
        );
    }

    LogRecord {
        time_unix_nano,
        observed_time_unix_nano: time_unix_nano,
        severity_text: Some(&*log.severity).filter(|severity| !severity.is_empty()),
        body: AnyValue::String(&log.body),
        attributes,
    }
}

#[cfg(test)]
mod tests {
    use prost::Message;

    use super::*;
    use crate::data::{
        generated::{collector::logs::v1 as collector, common::v1 as common},
        EncodedPayload,
    };

    fn encode(entities: &[Entity], now: Timestamp) -> collector::ExportLogsServiceRequest {
        let request = encode_request(entities, now, &InternalMetrics::default());

        let buf = EncodedPayload::encode(&request).to_vec();

        collector::ExportLogsServiceRequest::decode(&*buf).unwrap()
    }

    fn string(value: &str) -> Option<common::AnyValue> {
        Some(common::AnyValue {
            value: Some(common::any_value::Value::StringValue(value.into())),
        })
    }

    #[test]
    fn encode_log() {
        let entity = Entity::new("geometry:square").with_log(
            Log::new("square created")
                .with_severity("INFO")
                .with_timestamp(1_000)
                .with_attribute("geometry:name", "ABCD"),
        );

        let request = encode(&[entity], Timestamp::from_unix_nanos(5_000));

        let record = &request.resource_logs[0].scope_logs[0].log_records[0];

        assert_eq!(1_000, record.time_unix_nano);
        assert_eq!(1_000, record.observed_time_unix_nano);
        assert_eq!("INFO", record.severity_text);
        assert_eq!(string("square created"), record.body);
        assert_eq!(1, record.attributes.len());
        assert_eq!("geometry:name", record.attributes[0].key);
    }

    #[test]
    fn missing_timestamp_is_now() {
        let entity = Entity::new("geometry:square").with_log(Log::new("square created"));

        let request = encode(&[entity], Timestamp::from_unix_nanos(5_000));

        let record = &request.resource_logs[0].scope_logs[0].log_records[0];

        assert_eq!(5_000, record.time_unix_nano);
        assert_eq!("", record.severity_text);
    }

    #[test]
    fn events_get_event_attributes() {
        let entity = Entity::new("geometry:square")
            .with_event(Log::event("geometry:operation", "rotated").with_attribute("degrees", 90));

        let request = encode(&[entity], Timestamp::from_unix_nanos(5_000));

        let record = &request.resource_logs[0].scope_logs[0].log_records[0];

        let is_event = record
            .attributes
            .iter()
            .find(|kv| kv.key == IS_EVENT_KEY)
            .and_then(|kv| kv.value.clone());
        let event_type = record
            .attributes
            .iter()
            .find(|kv| kv.key == EVENT_TYPE_KEY)
            .and_then(|kv| kv.value.clone());

        assert_eq!(
            Some(common::AnyValue {
                value: Some(common::any_value::Value::BoolValue(true))
            }),
            is_event
        );
        assert_eq!(string("geometry:operation"), event_type);
        assert_eq!(3, record.attributes.len());
    }

    #[test]
    fn event_attributes_override_existing_keys() {
        let log = Log::event("geometry:operation", "rotated").with_attribute(EVENT_TYPE_KEY, "other");

        let record = encode_log_record(&log, 0);

        assert_eq!(
            1,
            record
                .attributes
                .iter()
                .filter(|kv| kv.key == EVENT_TYPE_KEY)
                .count()
        );
        assert!(record
            .attributes
            .contains(&crate::data::KeyValue::new(EVENT_TYPE_KEY, AnyValue::String("geometry:operation"))));
    }

    #[test]
    fn plain_logs_are_not_events() {
        let log = Log::new("square created");

        let record = encode_log_record(&log, 0);

        assert!(record.attributes.iter().all(|kv| kv.key != IS_EVENT_KEY));
    }

    #[test]
    fn entities_without_logs_are_skipped() {
        let entities = [
            Entity::new("geometry:point"),
            Entity::new("geometry:square").with_log(Log::new("square created")),
            Entity::new("geometry:line"),
        ];

        let request = encode(&entities, Timestamp::from_unix_nanos(1));

        assert_eq!(1, request.resource_logs.len());
    }
}
