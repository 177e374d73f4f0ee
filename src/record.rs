//! Dynamic records: the attribute bag each store row is mapped into.

use indexmap::IndexMap;

use crate::value::Value;

/// An attribute value: a column scalar, or a relationship attachment.
#[derive(Debug, Clone, PartialEq)]
pub enum Attr {
    /// A plain column value.
    Value(Value),
    /// A single related record (belongs-to attachment).
    Record(Record),
    /// A sequence of related records (has-many attachment).
    Records(Vec<Record>),
}

impl Attr {
    /// The scalar inside this attribute, if it is one.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Attr::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Attr::Value(v) => v.to_json(),
            Attr::Record(r) => r.to_json(),
            Attr::Records(rs) => serde_json::Value::Array(rs.iter().map(Record::to_json).collect()),
        }
    }
}

impl From<Value> for Attr {
    fn from(v: Value) -> Self {
        Attr::Value(v)
    }
}

impl From<Record> for Attr {
    fn from(r: Record) -> Self {
        Attr::Record(r)
    }
}

impl From<Vec<Record>> for Attr {
    fn from(rs: Vec<Record>) -> Self {
        Attr::Records(rs)
    }
}

/// A named, dynamically-attributed entity instance.
///
/// Attribute names are unique within a record and keep insertion order.
/// A record's identity for relationship matching is its `id` attribute
/// unless a relationship names a different key.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    entity: String,
    attributes: IndexMap<String, Attr>,
}

impl Record {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            attributes: IndexMap::new(),
        }
    }

    /// The registered entity shape this record was mapped into.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Set an attribute, replacing any previous value under the name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Attr>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Attr> {
        self.attributes.get(name)
    }

    /// A scalar attribute, or `None` for attachments and absent names.
    pub fn scalar(&self, name: &str) -> Option<&Value> {
        self.get(name).and_then(Attr::as_value)
    }

    /// The record's `id` attribute.
    pub fn id(&self) -> Option<&Value> {
        self.scalar("id")
    }

    pub fn has(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// All attributes in insertion order.
    pub fn attributes(&self) -> &IndexMap<String, Attr> {
        &self.attributes
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (name, attr) in &self.attributes {
            map.insert(name.clone(), attr.to_json());
        }
        serde_json::Value::Object(map)
    }
}
