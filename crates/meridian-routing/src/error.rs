//! Routing error types.
//!
//! Every error carries enough context to be logged and asserted on:
//! the display formats below are stable and external systems may
//! depend on them for log inspection.

use thiserror::Error;

use meridian_common::types::InvalidKeyspaceId;
use meridian_common::Value;

use crate::executor::ExecuteError;

/// Result type for routing operations.
pub type RoutingResult<T> = Result<T, RoutingError>;

/// Errors raised by the routing layer.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// Batch operation called with mismatched input slice lengths.
    #[error("{operation}:length of ids {ids} doesn't match length of ksids {ksids}")]
    LengthMismatch {
        /// Operation in progress, e.g. `lookup.verify`.
        operation: &'static str,
        /// Number of column values supplied.
        ids: usize,
        /// Number of keyspace ids supplied.
        ksids: usize,
    },

    /// A supplied or stored keyspace id failed codec validation.
    #[error("{operation}: {source}")]
    InvalidKeyspaceId {
        /// Operation in progress.
        operation: &'static str,
        /// The codec failure, including the hex dump of the bytes.
        #[source]
        source: InvalidKeyspaceId,
    },

    /// A unique vindex mapped one value to more than one keyspace id.
    #[error("{operation}: unexpected multiple results from table {table} for {id}")]
    MultipleResults {
        /// Operation in progress.
        operation: &'static str,
        /// The lookup table that returned the rows.
        table: String,
        /// The column value being mapped.
        id: Value,
    },

    /// Required configuration key absent or empty.
    #[error("{vindex_type}: missing or empty param: {param}")]
    MissingParam {
        /// Vindex type being constructed.
        vindex_type: &'static str,
        /// The missing configuration key.
        param: &'static str,
    },

    /// Registry has no builder for the requested type name.
    #[error("unknown vindex type: {0}")]
    UnknownVindexType(String),

    /// A table's column binding names a vindex the schema never defines.
    #[error("table {table} references unknown vindex: {name}")]
    UnknownVindex {
        /// Table carrying the binding.
        table: String,
        /// The undefined vindex name.
        name: String,
    },

    /// Keyspace schema document failed to parse.
    #[error("invalid keyspace schema: {source}")]
    InvalidSchema {
        /// The underlying parse failure.
        #[from]
        source: serde_json::Error,
    },

    /// Opaque failure from the query executor.
    #[error("{operation}: {cause}")]
    Execution {
        /// Operation in progress.
        operation: &'static str,
        /// The executor's error, propagated unchanged.
        cause: ExecuteError,
    },
}

impl RoutingError {
    /// Creates a length-mismatch error.
    pub fn length_mismatch(operation: &'static str, ids: usize, ksids: usize) -> Self {
        Self::LengthMismatch {
            operation,
            ids,
            ksids,
        }
    }

    /// Wraps a keyspace id codec failure with the operation name.
    pub fn invalid_keyspace_id(operation: &'static str, source: InvalidKeyspaceId) -> Self {
        Self::InvalidKeyspaceId { operation, source }
    }

    /// Wraps an executor failure with the operation name.
    pub fn execution(operation: &'static str, cause: ExecuteError) -> Self {
        Self::Execution { operation, cause }
    }

    /// Returns true if the error was caused by caller-supplied input
    /// rather than storage or configuration.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::LengthMismatch { .. } | Self::InvalidKeyspaceId { .. }
        )
    }
}
