//! # meridian-common
//!
//! Shared types for the Meridian query-routing layer.
//!
//! This crate provides the leaf types exchanged between the routing
//! resolvers and the rest of the system:
//!
//! - **Types**: [`KeyspaceId`] (validated routing keys) and [`Value`]
//!   (typed scalar column values used as bind parameters)
//! - **Query**: [`BoundQuery`], [`Row`], and [`QueryResult`] — the
//!   units of exchange at the query-execution boundary
//!
//! ## Example
//!
//! ```rust
//! use meridian_common::{BoundQuery, KeyspaceId, Value};
//!
//! let ksid = KeyspaceId::decode(b"\x16k@\xb4J\xbaK\xd6").unwrap();
//! let query = BoundQuery::new("select toc from t where fromc = :fromc")
//!     .bind("fromc", Value::from(1i64));
//! assert_eq!(query.bindings.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod query;
pub mod types;

pub use query::{BoundQuery, QueryResult, Row};
pub use types::{InvalidKeyspaceId, KeyspaceId, Value, MAX_KEYSPACE_ID_SIZE};
