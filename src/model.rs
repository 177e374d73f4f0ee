//! Model operations: statement execution and row mapping for one
//! registered model.

use crate::error::{WeftError, WeftResult};
use crate::query::Query;
use crate::record::Record;
use crate::registry::{ModelDef, Registry};
use crate::relation::{self, RelationSpec};
use crate::statement;
use crate::store::{Row, Store};
use crate::value::Value;

/// The result of a fetch: a single record or a collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    One(Record),
    Many(Vec<Record>),
}

impl Fetched {
    pub fn len(&self) -> usize {
        match self {
            Fetched::One(_) => 1,
            Fetched::Many(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_records(self) -> Vec<Record> {
        match self {
            Fetched::One(record) => vec![record],
            Fetched::Many(records) => records,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Fetched::One(record) => record.to_json(),
            Fetched::Many(records) => {
                serde_json::Value::Array(records.iter().map(Record::to_json).collect())
            }
        }
    }
}

/// Id arguments for a batched relationship fetch: a single id is
/// normalized into a one-element set before formatting.
pub enum Ids {
    One(Value),
    Many(Vec<Value>),
}

impl Ids {
    fn into_vec(self) -> Vec<Value> {
        match self {
            Ids::One(id) => vec![id],
            Ids::Many(ids) => ids,
        }
    }
}

impl From<Value> for Ids {
    fn from(id: Value) -> Self {
        Ids::One(id)
    }
}

impl From<Vec<Value>> for Ids {
    fn from(ids: Vec<Value>) -> Self {
        Ids::Many(ids)
    }
}

/// One registered model bound to a store, owning the clause set it
/// executes and the records the last fetch produced.
pub struct Model<'a> {
    def: ModelDef,
    registry: &'a Registry,
    store: &'a dyn Store,
    query: Query,
    results: Option<Fetched>,
}

impl std::fmt::Debug for Model<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("def", &self.def)
            .field("query", &self.query)
            .field("results", &self.results)
            .finish_non_exhaustive()
    }
}

impl<'a> Model<'a> {
    pub fn new(registry: &'a Registry, name: &str, store: &'a dyn Store) -> WeftResult<Self> {
        let def = registry.get(name)?.clone();
        Ok(Self {
            def,
            registry,
            store,
            query: Query::new(),
            results: None,
        })
    }

    pub fn def(&self) -> &ModelDef {
        &self.def
    }

    /// Adopt a clause set for the next fetch.
    pub fn execute(&mut self, query: Query) -> &mut Self {
        self.query = query;
        self
    }

    /// Fetch every matching row, mapping each into the model's entity.
    pub async fn all(&mut self) -> WeftResult<&mut Self> {
        let entity = self.registry.entity_for(&self.def)?;
        let sql = statement::select_statement(&self.def.table, &self.query);
        tracing::debug!(model = %self.def.name, sql = %sql, "fetching all");
        let rows = self.store.execute(&sql, self.query.binds()).await?;
        let records = rows
            .into_iter()
            .map(|row| map_row(&entity, row))
            .collect();
        self.results = Some(Fetched::Many(records));
        Ok(self)
    }

    /// Fetch a single record: select and where fragments only, first row
    /// or nothing.
    pub async fn find(&mut self) -> WeftResult<&mut Self> {
        let entity = self.registry.entity_for(&self.def)?;
        let sql = statement::find_statement(&self.def.table, &self.query);
        tracing::debug!(model = %self.def.name, sql = %sql, "fetching one");
        let rows = self.store.execute(&sql, self.query.binds()).await?;
        self.results = rows
            .into_iter()
            .next()
            .map(|row| Fetched::One(map_row(&entity, row)));
        Ok(self)
    }

    /// Count the rows the given clause set's filters select.
    pub async fn count(&self, query: &Query) -> WeftResult<i64> {
        let sql = statement::count_statement(&self.def.table, query);
        let rows = self.store.execute(&sql, query.binds()).await?;
        let total = rows
            .first()
            .and_then(|row| row.get("total"))
            .ok_or_else(|| WeftError::Execution("count returned no total column".to_string()))?;
        match total {
            Value::Int(n) => Ok(*n),
            Value::Float(f) => Ok(*f as i64),
            Value::Text(s) => s
                .parse()
                .map_err(|_| WeftError::Execution(format!("count returned '{}'", s))),
            _ => Err(WeftError::Execution("count returned no total column".to_string())),
        }
    }

    /// Fetch the rows whose `key_field` is in the given id set, in one
    /// statement. An empty id set fetches nothing.
    pub async fn related_with(
        &self,
        ids: impl Into<Ids>,
        key_field: &str,
    ) -> WeftResult<Vec<Record>> {
        let entity = self.registry.entity_for(&self.def)?;
        let ids = ids.into().into_vec();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let (sql, binds) = statement::related_statement(&self.def.table, key_field, &ids);
        tracing::debug!(model = %self.def.name, sql = %sql, "fetching related");
        let rows = self.store.execute(&sql, &binds).await?;
        Ok(rows.into_iter().map(|row| map_row(&entity, row)).collect())
    }

    /// Insert a record's scalar attributes as a new row.
    pub async fn create(&self, record: &Record) -> WeftResult<()> {
        let (sql, binds) = statement::insert_statement(&self.def.table, record);
        tracing::debug!(model = %self.def.name, sql = %sql, "inserting");
        self.store.execute(&sql, &binds).await?;
        Ok(())
    }

    /// The records the last fetch produced, if any.
    pub fn get(&self) -> Option<&Fetched> {
        self.results.as_ref()
    }

    /// Take ownership of the last fetch's records.
    pub fn take_results(&mut self) -> Option<Fetched> {
        self.results.take()
    }

    /// Resolve the given relationships against the last fetch's records,
    /// one batched query per relationship, and fold the attachments onto
    /// one result set.
    pub async fn make_relations_with(
        &mut self,
        specs: &[RelationSpec],
    ) -> WeftResult<Fetched> {
        let source = self.results.take().ok_or_else(|| {
            WeftError::config("fetch with all() or find() before making relations")
        })?;
        let mut created = Vec::with_capacity(specs.len());
        for spec in specs {
            let attached =
                relation::resolve(self.registry, self.store, &self.def, spec, source.clone())
                    .await?;
            created.push(attached);
        }
        if created.is_empty() {
            return Ok(source);
        }
        Ok(relation::merge(created))
    }
}

fn map_row(entity: &str, row: Row) -> Record {
    let mut record = Record::new(entity);
    for (name, value) in row {
        record.set(name, value);
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_normalizes_single_value() {
        let ids: Ids = Value::Int(3).into();
        assert_eq!(ids.into_vec(), vec![Value::Int(3)]);
    }

    #[test]
    fn test_fetched_into_records() {
        let record = Record::new("UserEntity");
        assert_eq!(Fetched::One(record.clone()).into_records().len(), 1);
        assert_eq!(Fetched::Many(vec![record; 3]).into_records().len(), 3);
        assert!(Fetched::Many(Vec::new()).is_empty());
    }

    #[test]
    fn test_map_row_preserves_column_order() {
        let mut row = Row::new();
        row.insert("id".to_string(), Value::Int(1));
        row.insert("name".to_string(), Value::Text("ada".into()));
        let record = map_row("UserEntity", row);
        let names: Vec<&String> = record.attributes().keys().collect();
        assert_eq!(names, ["id", "name"]);
        assert_eq!(record.entity(), "UserEntity");
    }
}
