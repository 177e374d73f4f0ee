//! Fluent clause accumulator.
//!
//! A [`Query`] collects select columns, filter predicates, ordering, limit
//! and offset for one logical statement, and renders each part to a SQL
//! fragment on demand. State is not cleared between uses; call
//! [`Query::reset`] to reuse an accumulator.

use crate::value::{Binds, Value};

/// Logical connective trailing a predicate, joining it to the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

impl std::fmt::Display for Connective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Connective::And => write!(f, "and"),
            Connective::Or => write!(f, "or"),
        }
    }
}

/// One renderable part of a clause set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    Select,
    Where,
    Order,
    Limit,
    Offset,
}

#[derive(Debug, Clone)]
struct Predicate {
    field: String,
    operator: String,
    connective: Option<Connective>,
}

impl Predicate {
    /// Render as `field operator :field` with an optional trailing connective.
    fn render(&self) -> String {
        match self.connective {
            Some(conn) => format!("{} {} :{} {}", self.field, self.operator, self.field, conn),
            None => format!("{} {} :{}", self.field, self.operator, self.field),
        }
    }
}

/// The mutable state of one clause accumulator.
#[derive(Debug, Clone, Default)]
pub struct Query {
    select: Option<Vec<String>>,
    wheres: Vec<Predicate>,
    binds: Binds,
    limit: Option<u64>,
    offset: Option<u64>,
    order: Option<String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the columns to select.
    pub fn select<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Append a filter predicate and bind its value under the field name.
    ///
    /// The placeholder is derived from the field name, so repeating a field
    /// overwrites the earlier bound value while still appending a second
    /// predicate clause. Callers must not reuse a field name within one
    /// query.
    pub fn where_(&mut self, field: &str, operator: &str, value: impl Into<Value>) -> &mut Self {
        self.push_where(field, operator, value.into(), None)
    }

    /// Like [`Query::where_`], with a trailing connective joining the
    /// predicate to the next one.
    pub fn where_with(
        &mut self,
        field: &str,
        operator: &str,
        value: impl Into<Value>,
        connective: Connective,
    ) -> &mut Self {
        self.push_where(field, operator, value.into(), Some(connective))
    }

    fn push_where(
        &mut self,
        field: &str,
        operator: &str,
        value: Value,
        connective: Option<Connective>,
    ) -> &mut Self {
        self.wheres.push(Predicate {
            field: field.to_string(),
            operator: operator.to_string(),
            connective,
        });
        self.binds.insert(field.to_string(), value);
        self
    }

    /// Set the maximum number of rows to fetch.
    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    /// Set the ordering expression, e.g. `"created_at desc"`.
    pub fn order(&mut self, order: impl Into<String>) -> &mut Self {
        self.order = Some(order.into());
        self
    }

    /// Set the starting row offset.
    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.offset = Some(offset);
        self
    }

    /// Clear all accumulated state for reuse.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The bound parameter values, keyed by placeholder name.
    pub fn binds(&self) -> &Binds {
        &self.binds
    }

    /// The per-page limit, if one was set.
    pub fn limit_value(&self) -> Option<u64> {
        self.limit
    }

    /// Render one part of the clause set to its SQL fragment.
    ///
    /// Returns `None` for unset parts; the `where` fragment carries its
    /// leading ` where `, and limit/offset/order carry their keywords, so
    /// the statement compiler can concatenate fragments directly.
    pub fn fragment(&self, part: Part) -> Option<String> {
        match part {
            Part::Select => self
                .select
                .as_ref()
                .map(|columns| columns.join(",")),
            Part::Where => {
                if self.wheres.is_empty() {
                    None
                } else {
                    let rendered: Vec<String> =
                        self.wheres.iter().map(Predicate::render).collect();
                    Some(format!(" where {}", rendered.join(" ")))
                }
            }
            Part::Order => self.order.as_ref().map(|o| format!(" order by {}", o)),
            Part::Limit => self.limit.map(|n| format!(" limit {}", n)),
            Part::Offset => self.offset.map(|n| format!(" offset {}", n)),
        }
    }

    /// Render several parts at once, in the order given.
    pub fn fragments(&self, parts: &[Part]) -> Vec<Option<String>> {
        parts.iter().map(|part| self.fragment(*part)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_where_renders_nothing() {
        let query = Query::new();
        assert_eq!(query.fragment(Part::Where), None);
    }

    #[test]
    fn test_where_fragment_has_leading_keyword() {
        let mut query = Query::new();
        query.where_("id", ">", 1);
        assert_eq!(
            query.fragment(Part::Where),
            Some(" where id > :id".to_string())
        );
    }

    #[test]
    fn test_where_with_connective() {
        let mut query = Query::new();
        query
            .where_with("id", ">", 1, Connective::And)
            .where_("age", "<", 30);
        assert_eq!(
            query.fragment(Part::Where),
            Some(" where id > :id and age < :age".to_string())
        );
        assert_eq!(query.binds().get("id"), Some(&Value::Int(1)));
        assert_eq!(query.binds().get("age"), Some(&Value::Int(30)));
    }

    #[test]
    fn test_repeated_field_overwrites_bind_but_appends_predicate() {
        let mut query = Query::new();
        query
            .where_with("id", ">", 1, Connective::And)
            .where_("id", "<", 9);
        // Two predicate clauses, one surviving bind value.
        assert_eq!(
            query.fragment(Part::Where),
            Some(" where id > :id and id < :id".to_string())
        );
        assert_eq!(query.binds().len(), 1);
        assert_eq!(query.binds().get("id"), Some(&Value::Int(9)));
    }

    #[test]
    fn test_select_joins_columns() {
        let mut query = Query::new();
        query.select(["id", "name"]);
        assert_eq!(query.fragment(Part::Select), Some("id,name".to_string()));
    }

    #[test]
    fn test_limit_offset_order() {
        let mut query = Query::new();
        query.limit(10).offset(20).order("id desc");
        assert_eq!(query.fragment(Part::Limit), Some(" limit 10".to_string()));
        assert_eq!(query.fragment(Part::Offset), Some(" offset 20".to_string()));
        assert_eq!(
            query.fragment(Part::Order),
            Some(" order by id desc".to_string())
        );
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut query = Query::new();
        query.select(["id"]).where_("id", "=", 1).limit(5);
        query.reset();
        assert_eq!(query.fragment(Part::Select), None);
        assert_eq!(query.fragment(Part::Where), None);
        assert_eq!(query.fragment(Part::Limit), None);
        assert!(query.binds().is_empty());
    }

    #[test]
    fn test_fragments_preserves_requested_order() {
        let mut query = Query::new();
        query.limit(3).where_("id", "=", 1);
        let parts = query.fragments(&[Part::Select, Part::Where, Part::Limit]);
        assert_eq!(
            parts,
            vec![
                None,
                Some(" where id = :id".to_string()),
                Some(" limit 3".to_string()),
            ]
        );
    }
}
