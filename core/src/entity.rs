use serde::{Deserialize, Serialize};

use crate::{
    log::Log,
    metric::Metric,
    span::Span,
    value::{AttributeValue, Attributes},
};

/**
An observed resource, along with all the telemetry it carries.

An entity owns its signals. Its type name is namespaced, like `geometry:square`.
*/
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "typename")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<Metric>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub logs: Vec<Log>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spans: Vec<Span>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,
}

impl Entity {
    pub fn new(type_name: impl Into<String>) -> Self {
        Entity {
            type_name: type_name.into(),
            ..Default::default()
        }
    }

    /**
    The namespace part of the type name, if it has one.
    */
    pub fn namespace(&self) -> Option<&str> {
        self.type_name.split_once(':').map(|(namespace, _)| namespace)
    }

    /**
    The type name without its namespace.
    */
    pub fn name(&self) -> &str {
        self.type_name
            .split_once(':')
            .map(|(_, name)| name)
            .unwrap_or(&self.type_name)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.set_attribute(key, value);
        self
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metrics.push(metric);
        self
    }

    pub fn with_log(mut self, log: Log) -> Self {
        self.logs.push(log);
        self
    }

    /**
    Add a log as an event.
    */
    pub fn with_event(mut self, mut event: Log) -> Self {
        event.is_event = true;
        self.logs.push(event);
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.spans.push(span);
        self
    }

    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    pub fn set_attribute(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> &mut Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn events(&self) -> impl Iterator<Item = &Log> {
        self.logs.iter().filter(|log| log.is_event)
    }
}

/**
A labelled edge from an entity to another entity.

A relationship has no identity of its own beyond its attributes.
*/
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Relationship {
    pub attributes: Attributes,
}

impl Relationship {
    pub fn new() -> Self {
        Relationship::default()
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_name_splits_namespace() {
        let square = Entity::new("geometry:square");

        assert_eq!(Some("geometry"), square.namespace());
        assert_eq!("square", square.name());

        let bare = Entity::new("square");

        assert_eq!(None, bare.namespace());
        assert_eq!("square", bare.name());
    }

    #[test]
    fn with_event_marks_log() {
        let square = Entity::new("geometry:square")
            .with_log(Log::new("resized"))
            .with_event(Log::new("rotated"));

        assert_eq!(2, square.logs.len());
        assert_eq!(1, square.events().count());
        assert_eq!("rotated", square.events().next().unwrap().body);
    }

    #[test]
    fn relationship_is_a_plain_map() {
        let relationship: Relationship = serde_yaml::from_str("edge: AB\nlength: 2").unwrap();

        assert_eq!(
            Relationship::new()
                .with_attribute("edge", "AB")
                .with_attribute("length", 2),
            relationship
        );
    }
}
