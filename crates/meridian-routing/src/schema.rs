//! Keyspace schema configuration.
//!
//! A keyspace schema is a declarative JSON document naming the vindex
//! instances of a keyspace and binding table columns to them:
//!
//! ```json
//! {
//!   "vindexes": {
//!     "name_idx": {
//!       "type": "lookup_unique",
//!       "params": {"table": "name_idx", "from": "name", "to": "keyspace_id"}
//!     }
//!   },
//!   "tables": {
//!     "user": {"column_vindexes": [{"column": "name", "name": "name_idx"}]}
//!   }
//! }
//! ```
//!
//! [`KeyspaceSchema::build`] resolves the document against a
//! [`VindexRegistry`] into a [`Keyspace`] holding live vindex
//! instances. This layer only loads configuration; deciding which
//! vindex to use for a query is the planner's business.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{RoutingError, RoutingResult};
use crate::vindex::registry::{VindexParams, VindexRegistry};
use crate::vindex::Vindex;

/// Declarative schema document for one keyspace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyspaceSchema {
    /// Vindex definitions keyed by instance name.
    #[serde(default)]
    pub vindexes: HashMap<String, VindexDef>,
    /// Table definitions keyed by table name.
    #[serde(default)]
    pub tables: HashMap<String, TableDef>,
}

/// Definition of one vindex instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VindexDef {
    /// Registered vindex type name, e.g. `lookup_unique`.
    #[serde(rename = "type")]
    pub vindex_type: String,
    /// Type-specific configuration.
    #[serde(default)]
    pub params: VindexParams,
}

/// Definition of one table's vindex bindings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableDef {
    /// Column-to-vindex bindings, strongest first.
    #[serde(default)]
    pub column_vindexes: Vec<ColumnVindexDef>,
}

/// Binds a column to a vindex instance by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnVindexDef {
    /// The bound column.
    pub column: String,
    /// Name of a vindex defined in the schema's `vindexes` map.
    pub name: String,
}

impl KeyspaceSchema {
    /// Parses a schema document from JSON.
    pub fn from_json(json: &str) -> RoutingResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolves the document into live vindex instances.
    ///
    /// # Errors
    ///
    /// Propagates registry failures for each vindex definition, and
    /// raises [`RoutingError::UnknownVindex`] when a table binding
    /// names a vindex the document never defines.
    pub fn build(&self, registry: &VindexRegistry) -> RoutingResult<Keyspace> {
        let mut vindexes: HashMap<String, Arc<dyn Vindex>> = HashMap::new();
        for (name, def) in &self.vindexes {
            let vindex = registry.create(&def.vindex_type, name, &def.params)?;
            vindexes.insert(name.clone(), vindex);
        }

        let mut tables = HashMap::new();
        for (table_name, def) in &self.tables {
            let mut column_vindexes = Vec::with_capacity(def.column_vindexes.len());
            for binding in &def.column_vindexes {
                let vindex = vindexes.get(&binding.name).cloned().ok_or_else(|| {
                    RoutingError::UnknownVindex {
                        table: table_name.clone(),
                        name: binding.name.clone(),
                    }
                })?;
                column_vindexes.push(ColumnVindex {
                    column: binding.column.clone(),
                    name: binding.name.clone(),
                    vindex,
                });
            }
            tables.insert(
                table_name.clone(),
                Table {
                    name: table_name.clone(),
                    column_vindexes,
                },
            );
        }

        Ok(Keyspace { tables })
    }
}

/// A resolved keyspace: tables with live column-to-vindex bindings.
#[derive(Debug, Clone)]
pub struct Keyspace {
    tables: HashMap<String, Table>,
}

impl Keyspace {
    /// Returns the named table, if defined.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Returns the number of tables in the keyspace.
    pub fn num_tables(&self) -> usize {
        self.tables.len()
    }
}

/// A table with its column-to-vindex bindings.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    column_vindexes: Vec<ColumnVindex>,
}

impl Table {
    /// The table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All column bindings, in schema order.
    pub fn column_vindexes(&self) -> &[ColumnVindex] {
        &self.column_vindexes
    }

    /// Returns the vindex bound to the given column, if any.
    pub fn vindex_for_column(&self, column: &str) -> Option<&Arc<dyn Vindex>> {
        self.column_vindexes
            .iter()
            .find(|cv| cv.column == column)
            .map(|cv| &cv.vindex)
    }
}

/// A live column-to-vindex binding.
#[derive(Debug, Clone)]
pub struct ColumnVindex {
    /// The bound column.
    pub column: String,
    /// The vindex instance name.
    pub name: String,
    /// The resolved vindex.
    pub vindex: Arc<dyn Vindex>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"{
        "vindexes": {
            "name_idx": {
                "type": "lookup_unique",
                "params": {"table": "name_idx", "from": "name", "to": "keyspace_id"}
            },
            "email_idx": {
                "type": "lookup",
                "params": {"table": "email_idx", "from": "email", "to": "keyspace_id"}
            }
        },
        "tables": {
            "user": {
                "column_vindexes": [
                    {"column": "name", "name": "name_idx"},
                    {"column": "email", "name": "email_idx"}
                ]
            }
        }
    }"#;

    #[test]
    fn test_build_resolves_bindings() {
        let schema = KeyspaceSchema::from_json(SCHEMA).unwrap();
        let keyspace = schema.build(&VindexRegistry::with_builtins()).unwrap();
        assert_eq!(keyspace.num_tables(), 1);

        let user = keyspace.table("user").unwrap();
        assert_eq!(user.name(), "user");
        assert_eq!(user.column_vindexes().len(), 2);

        let name_idx = user.vindex_for_column("name").unwrap();
        assert_eq!(name_idx.name(), "name_idx");
        assert_eq!(name_idx.cost(), 10);

        let email_idx = user.vindex_for_column("email").unwrap();
        assert_eq!(email_idx.cost(), 20);
        assert!(email_idx.as_non_unique().is_some());

        assert!(user.vindex_for_column("id").is_none());
        assert!(keyspace.table("orders").is_none());
    }

    #[test]
    fn test_unknown_vindex_reference() {
        let schema = KeyspaceSchema::from_json(
            r#"{"tables": {"user": {"column_vindexes": [{"column": "name", "name": "ghost"}]}}}"#,
        )
        .unwrap();
        let err = schema.build(&VindexRegistry::with_builtins()).unwrap_err();
        assert_eq!(err.to_string(), "table user references unknown vindex: ghost");
    }

    #[test]
    fn test_vindex_definition_errors_propagate() {
        let schema = KeyspaceSchema::from_json(
            r#"{"vindexes": {"bad": {"type": "lookup", "params": {"from": "f", "to": "t"}}}}"#,
        )
        .unwrap();
        let err = schema.build(&VindexRegistry::with_builtins()).unwrap_err();
        assert_eq!(err.to_string(), "lookup: missing or empty param: table");
    }

    #[test]
    fn test_malformed_document() {
        let err = KeyspaceSchema::from_json("{not json").unwrap_err();
        assert!(err.to_string().starts_with("invalid keyspace schema:"));
    }
}
