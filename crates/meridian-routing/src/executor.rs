//! Query-execution boundary.
//!
//! The routing layer never owns a storage connection. Every operation
//! hands its [`BoundQuery`] to a [`QueryExecutor`] supplied by the
//! caller and interprets the returned [`QueryResult`]. Cancellation
//! and timeout semantics belong to the executor and pass through this
//! layer untouched.

use meridian_common::{BoundQuery, QueryResult};

/// Opaque error raised by a [`QueryExecutor`].
///
/// The routing layer propagates these unchanged, annotated with the
/// operation that was in progress.
pub type ExecuteError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Executes bound queries against physical storage.
///
/// Implementations must be safe for concurrent use; the routing layer
/// may be called from many request handlers sharing one executor.
pub trait QueryExecutor: Send + Sync {
    /// Executes the query, returning rows for reads or an
    /// acknowledgement with `rows_affected` for writes.
    fn execute(&self, query: &BoundQuery) -> Result<QueryResult, ExecuteError>;
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for &T {
    fn execute(&self, query: &BoundQuery) -> Result<QueryResult, ExecuteError> {
        (**self).execute(query)
    }
}
