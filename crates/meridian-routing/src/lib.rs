//! # meridian-routing
//!
//! Lookup-based routing resolvers (vindexes) for the Meridian
//! query-routing layer.
//!
//! A *vindex* translates column values into keyspace ids, the opaque
//! routing keys that place rows on physical storage partitions. The
//! lookup vindexes in this crate are backed by an auxiliary two-column
//! table (`from` → `to`) and expose the operations a query planner and
//! a write-path coordinator need:
//!
//! - **map** — translate column values into keyspace ids
//! - **verify** — check that (value, keyspace id) pairs are consistent
//!   with the lookup table before a scatter/gather operation
//! - **create** / **delete** — keep the lookup table in step with
//!   base-table writes
//!
//! Query execution is delegated to an injected [`QueryExecutor`]; the
//! resolvers themselves hold only immutable configuration and are safe
//! for concurrent use.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use meridian_routing::VindexRegistry;
//!
//! let registry = VindexRegistry::with_builtins();
//! let params: HashMap<String, String> = [
//!     ("table", "name_keyspace_idx"),
//!     ("from", "name"),
//!     ("to", "keyspace_id"),
//! ]
//! .into_iter()
//! .map(|(k, v)| (k.to_string(), v.to_string()))
//! .collect();
//! let vindex = registry.create("lookup_unique", "name_idx", &params).unwrap();
//! assert_eq!(vindex.cost(), 10);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod executor;
pub mod schema;
pub mod vindex;

pub use error::{RoutingError, RoutingResult};
pub use executor::{ExecuteError, QueryExecutor};
pub use schema::{Keyspace, KeyspaceSchema};
pub use vindex::registry::{VindexParams, VindexRegistry};
pub use vindex::{Lookup, NonUnique, Reversible, Unique, Vindex};
