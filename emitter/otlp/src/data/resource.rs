use melt_core::Entity;
use sval_derive::Value;

use super::{encode_attributes, AnyValue, ArrayValue, KeyValue, KvList};

/**
The attribute key that carries an entity's relationships on its resource.
*/
pub const RELATIONSHIPS_KEY: &str = "fsoc.melt.relationships";

#[derive(Value, Debug, Clone, PartialEq)]
pub struct Resource<'a> {
    #[sval(label = "attributes", index = 1)]
    pub attributes: Vec<KeyValue<'a>>,
}

impl<'a> Resource<'a> {
    /**
    The resource block for an entity.

    Relationships, if any, are appended as an array of key-value lists under [`RELATIONSHIPS_KEY`].
    */
    pub fn from_entity(entity: &'a Entity) -> Self {
        let mut attributes = encode_attributes(&entity.attributes);

        if !entity.relationships.is_empty() {
            attributes.retain(|kv| kv.key != RELATIONSHIPS_KEY);
            attributes.push(KeyValue::new(
                RELATIONSHIPS_KEY,
                AnyValue::Array(ArrayValue {
                    values: entity
                        .relationships
                        .iter()
                        .map(|relationship| {
                            AnyValue::KvList(KvList {
                                values: encode_attributes(&relationship.attributes),
                            })
                        })
                        .collect(),
                }),
            ));
        }

        Resource { attributes }
    }
}
