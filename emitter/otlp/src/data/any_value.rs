use melt_core::{AttributeValue, Attributes};
use sval_derive::Value;

const ANY_VALUE_STRING_LABEL: sval::Label =
    sval::Label::new("stringValue").with_tag(&sval::tags::VALUE_IDENT);
const ANY_VALUE_BOOL_LABEL: sval::Label =
    sval::Label::new("boolValue").with_tag(&sval::tags::VALUE_IDENT);
const ANY_VALUE_INT_LABEL: sval::Label =
    sval::Label::new("intValue").with_tag(&sval::tags::VALUE_IDENT);
const ANY_VALUE_DOUBLE_LABEL: sval::Label =
    sval::Label::new("doubleValue").with_tag(&sval::tags::VALUE_IDENT);
const ANY_VALUE_ARRAY_LABEL: sval::Label =
    sval::Label::new("arrayValue").with_tag(&sval::tags::VALUE_IDENT);
const ANY_VALUE_KVLIST_LABEL: sval::Label =
    sval::Label::new("kvlistValue").with_tag(&sval::tags::VALUE_IDENT);

const ANY_VALUE_STRING_INDEX: sval::Index = sval::Index::new(1);
const ANY_VALUE_BOOL_INDEX: sval::Index = sval::Index::new(2);
const ANY_VALUE_INT_INDEX: sval::Index = sval::Index::new(3);
const ANY_VALUE_DOUBLE_INDEX: sval::Index = sval::Index::new(4);
const ANY_VALUE_ARRAY_INDEX: sval::Index = sval::Index::new(5);
const ANY_VALUE_KVLIST_INDEX: sval::Index = sval::Index::new(6);

#[derive(Value, Debug, Clone, PartialEq)]
pub enum AnyValue<'a> {
    #[sval(label = ANY_VALUE_STRING_LABEL, index = ANY_VALUE_STRING_INDEX)]
    String(&'a str),
    #[sval(label = ANY_VALUE_BOOL_LABEL, index = ANY_VALUE_BOOL_INDEX)]
    Bool(bool),
    #[sval(label = ANY_VALUE_INT_LABEL, index = ANY_VALUE_INT_INDEX)]
    Int(i64),
    #[sval(label = ANY_VALUE_DOUBLE_LABEL, index = ANY_VALUE_DOUBLE_INDEX)]
    Double(f64),
    #[sval(label = ANY_VALUE_ARRAY_LABEL, index = ANY_VALUE_ARRAY_INDEX)]
    Array(ArrayValue<'a>),
    #[sval(label = ANY_VALUE_KVLIST_LABEL, index = ANY_VALUE_KVLIST_INDEX)]
    KvList(KvList<'a>),
}

impl<'a> From<&'a AttributeValue> for AnyValue<'a> {
    fn from(value: &'a AttributeValue) -> Self {
        match value {
            AttributeValue::String(value) => AnyValue::String(value),
            AttributeValue::Bool(value) => AnyValue::Bool(*value),
            AttributeValue::Int(value) => AnyValue::Int(*value),
            AttributeValue::Double(value) => AnyValue::Double(*value),
        }
    }
}

const ARRAY_VALUES_LABEL: sval::Label =
    sval::Label::new("values").with_tag(&sval::tags::VALUE_IDENT);

const ARRAY_VALUES_INDEX: sval::Index = sval::Index::new(1);

#[derive(Value, Debug, Clone, PartialEq)]
pub struct ArrayValue<'a> {
    #[sval(label = ARRAY_VALUES_LABEL, index = ARRAY_VALUES_INDEX)]
    pub values: Vec<AnyValue<'a>>,
}

const KVLIST_VALUES_LABEL: sval::Label =
    sval::Label::new("values").with_tag(&sval::tags::VALUE_IDENT);

const KVLIST_VALUES_INDEX: sval::Index = sval::Index::new(1);

#[derive(Value, Debug, Clone, PartialEq)]
pub struct KvList<'a> {
    #[sval(label = KVLIST_VALUES_LABEL, index = KVLIST_VALUES_INDEX)]
    pub values: Vec<KeyValue<'a>>,
}

const KEY_VALUE_KEY_LABEL: sval::Label = sval::Label::new("key").with_tag(&sval::tags::VALUE_IDENT);
const KEY_VALUE_VALUE_LABEL: sval::Label =
    sval::Label::new("value").with_tag(&sval::tags::VALUE_IDENT);

const KEY_VALUE_KEY_INDEX: sval::Index = sval::Index::new(1);
const KEY_VALUE_VALUE_INDEX: sval::Index = sval::Index::new(2);

#[derive(Value, Debug, Clone, PartialEq)]
pub struct KeyValue<'a> {
    #[sval(label = KEY_VALUE_KEY_LABEL, index = KEY_VALUE_KEY_INDEX)]
    pub key: &'a str,
    #[sval(label = KEY_VALUE_VALUE_LABEL, index = KEY_VALUE_VALUE_INDEX)]
    pub value: AnyValue<'a>,
}

impl<'a> KeyValue<'a> {
    pub fn new(key: &'a str, value: AnyValue<'a>) -> Self {
        KeyValue { key, value }
    }
}

/**
Encode a set of attributes as key-values.

Every key is kept, in the attribute set's sorted order.
*/
pub fn encode_attributes(attributes: &Attributes) -> Vec<KeyValue<'_>> {
    attributes
        .iter()
        .map(|(key, value)| KeyValue::new(key, AnyValue::from(value)))
        .collect()
}

/**
Set `key` to `value`, replacing any key-value already using it.
*/
pub(crate) fn insert_attribute<'a>(attributes: &mut Vec<KeyValue<'a>>, key: &'a str, value: AnyValue<'a>) {
    attributes.retain(|kv| kv.key != key);
    attributes.push(KeyValue::new(key, value));
}
