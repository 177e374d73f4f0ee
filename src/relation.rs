//! Relationship resolution: one batched query per declared relationship,
//! joined in memory.
//!
//! The relationship vocabulary is closed — belongs-to and has-many — and
//! dispatched by `match`. Foreign key names derive from model short
//! names, lower-cased and suffixed `_id`.

use std::str::FromStr;

use crate::error::{WeftError, WeftResult};
use crate::model::{Fetched, Model};
use crate::record::Record;
use crate::registry::{ModelDef, Registry};
use crate::store::Store;
use crate::value::Value;

/// The two supported relationship strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// The source record holds the foreign key referencing one related
    /// record.
    BelongsTo,
    /// Related records each hold a foreign key referencing the source
    /// record; the attachment is a sequence.
    HasMany,
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationKind::BelongsTo => write!(f, "belongs_to"),
            RelationKind::HasMany => write!(f, "has_many"),
        }
    }
}

impl FromStr for RelationKind {
    type Err = WeftError;

    fn from_str(s: &str) -> WeftResult<Self> {
        match s.to_lowercase().as_str() {
            "belongs_to" => Ok(RelationKind::BelongsTo),
            "has_many" => Ok(RelationKind::HasMany),
            other => Err(WeftError::UnknownRelation(other.to_string())),
        }
    }
}

/// One requested relationship: related model, strategy, and the property
/// the resolved records are attached under.
#[derive(Debug, Clone)]
pub struct RelationSpec {
    pub model: String,
    pub kind: RelationKind,
    pub property: String,
}

impl RelationSpec {
    pub fn new(model: impl Into<String>, kind: RelationKind, property: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            kind,
            property: property.into(),
        }
    }
}

impl FromStr for RelationSpec {
    type Err = WeftError;

    /// Parse the textual `model:kind:property` form.
    fn from_str(s: &str) -> WeftResult<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 {
            return Err(WeftError::RelationArity(parts.len()));
        }
        Ok(Self {
            model: parts[0].to_string(),
            kind: parts[1].parse()?,
            property: parts[2].to_string(),
        })
    }
}

/// One resolved relationship: the mutated source items and the property
/// they were attached under.
pub struct Attached {
    pub items: Fetched,
    pub with_name: String,
}

/// Foreign key derived from a model short name.
fn foreign_key_of(model_name: &str) -> String {
    format!("{}_id", model_name.to_lowercase())
}

/// Distinct values in first-seen order, nulls dropped.
fn distinct_non_null(values: impl IntoIterator<Item = Value>) -> Vec<Value> {
    let mut out: Vec<Value> = Vec::new();
    for value in values {
        if value.is_null() {
            continue;
        }
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

/// Resolve one relationship against the source items, issuing exactly one
/// batched fetch regardless of how many source records there are.
pub(crate) async fn resolve(
    registry: &Registry,
    store: &dyn Store,
    owner: &ModelDef,
    spec: &RelationSpec,
    mut items: Fetched,
) -> WeftResult<Attached> {
    let related = Model::new(registry, &spec.model, store)?;

    match spec.kind {
        RelationKind::BelongsTo => {
            let foreign_key = foreign_key_of(&spec.model);
            let ids = match &items {
                Fetched::One(record) => {
                    distinct_non_null(record.scalar(&foreign_key).cloned().into_iter())
                }
                Fetched::Many(records) => distinct_non_null(
                    records
                        .iter()
                        .filter_map(|record| record.scalar(&foreign_key))
                        .cloned(),
                ),
            };
            tracing::debug!(kind = %spec.kind, property = %spec.property, ids = ids.len(), "resolving relation");
            let fetched = related.related_with(ids, "id").await?;
            attach_belongs_to(&mut items, fetched, &foreign_key, &spec.property);
        }
        RelationKind::HasMany => {
            let foreign_key = foreign_key_of(&owner.name);
            let ids = match &items {
                Fetched::One(record) => distinct_non_null(record.id().cloned().into_iter()),
                Fetched::Many(records) => {
                    distinct_non_null(records.iter().filter_map(Record::id).cloned())
                }
            };
            tracing::debug!(kind = %spec.kind, property = %spec.property, ids = ids.len(), "resolving relation");
            let fetched = related.related_with(ids, &foreign_key).await?;
            attach_has_many(&mut items, fetched, &foreign_key, &spec.property);
        }
    }

    Ok(Attached {
        items,
        with_name: spec.property.clone(),
    })
}

/// Attach the related record whose `id` equals each source record's
/// foreign key; a record with no match keeps the attachment unset. A
/// single source record gets the first related result outright.
fn attach_belongs_to(items: &mut Fetched, related: Vec<Record>, foreign_key: &str, property: &str) {
    match items {
        Fetched::One(record) => {
            if let Some(first) = related.into_iter().next() {
                record.set(property, first);
            }
        }
        Fetched::Many(records) => {
            for record in records.iter_mut() {
                let Some(key) = record.scalar(foreign_key).cloned() else {
                    continue;
                };
                if let Some(found) = related.iter().find(|r| r.id() == Some(&key)) {
                    record.set(property, found.clone());
                }
            }
        }
    }
}

/// Attach to each source record the sequence of related records whose
/// foreign key equals its `id` — an empty sequence when nothing matches,
/// never absent.
fn attach_has_many(items: &mut Fetched, related: Vec<Record>, foreign_key: &str, property: &str) {
    match items {
        Fetched::One(record) => {
            record.set(property, related);
        }
        Fetched::Many(records) => {
            for record in records.iter_mut() {
                let matches: Vec<Record> = match record.id() {
                    Some(id) => related
                        .iter()
                        .filter(|r| r.scalar(foreign_key) == Some(id))
                        .cloned()
                        .collect(),
                    None => Vec::new(),
                };
                record.set(property, matches);
            }
        }
    }
}

/// Fold independently-computed attachments onto the first relationship's
/// item set. Subsequent attachments are copied positionally, and only
/// where the property is not already present.
pub(crate) fn merge(mut created: Vec<Attached>) -> Fetched {
    if created.len() == 1 {
        return created.remove(0).items;
    }

    let mut canonical = created.remove(0).items;
    for attached in created {
        let name = attached.with_name;
        match (&mut canonical, attached.items) {
            (Fetched::Many(base), Fetched::Many(items)) => {
                for (slot, item) in base.iter_mut().zip(items) {
                    if !slot.has(&name) {
                        if let Some(attr) = item.get(&name) {
                            slot.set(name.clone(), attr.clone());
                        }
                    }
                }
            }
            (Fetched::One(base), Fetched::One(item)) => {
                if !base.has(&name) {
                    if let Some(attr) = item.get(&name) {
                        base.set(name.clone(), attr.clone());
                    }
                }
            }
            _ => {}
        }
    }
    canonical
}
