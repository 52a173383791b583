//! Query-boundary types.
//!
//! A [`BoundQuery`] is the unit handed to the execution collaborator:
//! SQL text with `:name`-style placeholders plus the named bind
//! values. [`QueryResult`] is what comes back. Both sides of the
//! boundary treat the SQL text as opaque; placeholder names and the
//! binding map correspond one-to-one by construction.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::Value;

/// Parameterized SQL text plus named bind values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundQuery {
    /// SQL text with `:name` placeholders.
    pub sql: String,
    /// Bind values keyed by placeholder name.
    pub bindings: HashMap<String, Value>,
}

impl BoundQuery {
    /// Creates a bound query with no bindings.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            bindings: HashMap::new(),
        }
    }

    /// Adds a bind value for the named placeholder.
    #[must_use]
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.bindings.insert(name.into(), value.into());
        self
    }

    /// Returns the bind value for the named placeholder, if any.
    pub fn binding(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }
}

/// A single row of values returned by a read query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    /// Creates a new row with the given values.
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Returns the value at the given column index.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Returns the number of columns in this row.
    pub fn num_columns(&self) -> usize {
        self.values.len()
    }

    /// Consumes the row, returning its values.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

/// Result of executing a bound query.
///
/// Reads populate `rows`; writes populate `rows_affected`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryResult {
    /// Rows returned by a read query.
    pub rows: Vec<Row>,
    /// Number of rows affected by a write query.
    pub rows_affected: u64,
}

impl QueryResult {
    /// Creates an empty result.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a read result from rows.
    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            rows_affected: 0,
        }
    }

    /// Creates a write acknowledgement.
    pub fn with_rows_affected(rows_affected: u64) -> Self {
        Self {
            rows: Vec::new(),
            rows_affected,
        }
    }

    /// Returns the number of rows in a read result.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_accumulates() {
        let query = BoundQuery::new("select toc from t where fromc = :fromc")
            .bind("fromc", 2i64);
        assert_eq!(query.binding("fromc"), Some(&Value::BigInt(2)));
        assert_eq!(query.binding("toc"), None);
    }

    #[test]
    fn test_bound_query_equality() {
        let a = BoundQuery::new("select 1").bind("x", 1i64).bind("y", "z");
        let b = BoundQuery::new("select 1").bind("y", "z").bind("x", 1i64);
        assert_eq!(a, b);
    }

    #[test]
    fn test_row_access() {
        let row = Row::new(vec![Value::BigInt(1), Value::string("a")]);
        assert_eq!(row.num_columns(), 2);
        assert_eq!(row.get(1), Some(&Value::string("a")));
        assert_eq!(row.get(2), None);
    }

    #[test]
    fn test_query_result_shapes() {
        let read = QueryResult::with_rows(vec![Row::new(vec![Value::BigInt(1)])]);
        assert_eq!(read.num_rows(), 1);
        let write = QueryResult::with_rows_affected(3);
        assert_eq!(write.rows_affected, 3);
        assert_eq!(write.num_rows(), 0);
    }
}
