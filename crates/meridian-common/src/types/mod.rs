//! Core types for the routing layer.

mod keyspace;
mod value;

pub use keyspace::{InvalidKeyspaceId, KeyspaceId, MAX_KEYSPACE_ID_SIZE};
pub use value::Value;
