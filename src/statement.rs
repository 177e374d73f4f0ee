//! Statement compiler: fixed-order assembly of final SQL strings.
//!
//! Fragment order is select–where–order–limit–offset, regardless of the
//! order clauses were added to the accumulator. This ordering is the
//! single source of truth for generated SQL.

use crate::query::{Part, Query};
use crate::record::{Attr, Record};
use crate::value::{Binds, Value};

/// Compile the multi-row fetch form.
pub fn select_statement(table: &str, query: &Query) -> String {
    let select = query
        .fragment(Part::Select)
        .unwrap_or_else(|| "*".to_string());
    format!(
        "select {} from {}{}{}{}{}",
        select,
        table,
        query.fragment(Part::Where).unwrap_or_default(),
        query.fragment(Part::Order).unwrap_or_default(),
        query.fragment(Part::Limit).unwrap_or_default(),
        query.fragment(Part::Offset).unwrap_or_default(),
    )
}

/// Compile the single-row fetch form: select and where fragments only.
pub fn find_statement(table: &str, query: &Query) -> String {
    let select = query
        .fragment(Part::Select)
        .unwrap_or_else(|| "*".to_string());
    format!(
        "select {} from {}{}",
        select,
        table,
        query.fragment(Part::Where).unwrap_or_default(),
    )
}

/// Compile the count form.
///
/// Select, order, limit and offset are ignored: only the filters restrict
/// the population being counted.
pub fn count_statement(table: &str, query: &Query) -> String {
    format!(
        "select count(*) as total from {}{}",
        table,
        query.fragment(Part::Where).unwrap_or_default(),
    )
}

/// Compile the batched-IN form used for relationship fetches, binding one
/// named parameter per id.
pub fn related_statement(table: &str, key_field: &str, ids: &[Value]) -> (String, Binds) {
    let mut binds = Binds::new();
    let mut placeholders = Vec::with_capacity(ids.len());
    for (i, id) in ids.iter().enumerate() {
        let name = format!("{}_{}", key_field, i);
        placeholders.push(format!(":{}", name));
        binds.insert(name, id.clone());
    }
    let sql = format!(
        "select * from {} where {} in ({})",
        table,
        key_field,
        placeholders.join(",")
    );
    (sql, binds)
}

/// Compile the insert form over a record's scalar attributes.
///
/// Relationship attachments are not columns and are skipped.
pub fn insert_statement(table: &str, record: &Record) -> (String, Binds) {
    let mut binds = Binds::new();
    let mut columns = Vec::new();
    for (name, attr) in record.attributes() {
        if let Attr::Value(value) = attr {
            columns.push(name.clone());
            binds.insert(name.clone(), value.clone());
        }
    }
    let placeholders: Vec<String> = columns.iter().map(|c| format!(":{}", c)).collect();
    let sql = format!(
        "insert into {}({}) values({})",
        table,
        columns.join(","),
        placeholders.join(",")
    );
    (sql, binds)
}
