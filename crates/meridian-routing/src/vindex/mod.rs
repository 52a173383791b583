//! Vindex trait and capability interfaces.
//!
//! A vindex is addressed through the base [`Vindex`] trait plus a
//! closed set of capability interfaces fixed at construction:
//! [`Unique`] or [`NonUnique`] for the mapping cardinality, [`Lookup`]
//! for write maintenance, and [`Reversible`] for keyspace-id →
//! column-value translation. Callers discover capabilities through the
//! `as_*` accessors rather than downcasting; the accessors default to
//! `None` and an implementation overrides exactly the ones it
//! supports.

pub mod lookup;
pub mod registry;

pub use lookup::{LookupNonUnique, LookupTable, LookupUnique};

use meridian_common::{KeyspaceId, Value};

use crate::error::RoutingResult;
use crate::executor::QueryExecutor;

/// A resolver translating column values to keyspace ids.
pub trait Vindex: std::fmt::Debug + Send + Sync {
    /// The instance name given at construction, returned verbatim.
    fn name(&self) -> &str;

    /// Relative cost for the planner; cheaper vindexes are preferred
    /// when several apply. This layer never compares costs itself.
    fn cost(&self) -> u32;

    /// Checks (value, keyspace id) pairs against the mapping.
    ///
    /// Requires `ids.len() == ksids.len()`. Keyspace ids are supplied
    /// in wire form and decoded here; malformed ids fail the call.
    /// The outcome is a single coarse-grained signal for the whole
    /// batch, replicated per pair: all true iff the backing query
    /// matched exactly one row per pair in total.
    fn verify(
        &self,
        executor: &dyn QueryExecutor,
        ids: &[Value],
        ksids: &[&[u8]],
    ) -> RoutingResult<Vec<bool>>;

    /// Returns the unique-mapping capability, if supported.
    fn as_unique(&self) -> Option<&dyn Unique> {
        None
    }

    /// Returns the non-unique-mapping capability, if supported.
    fn as_non_unique(&self) -> Option<&dyn NonUnique> {
        None
    }

    /// Returns the write-maintenance capability, if supported.
    fn as_lookup(&self) -> Option<&dyn Lookup> {
        None
    }

    /// Returns the reverse-mapping capability, if supported.
    fn as_reversible(&self) -> Option<&dyn Reversible> {
        None
    }
}

/// Mapping capability of vindexes with at most one keyspace id per
/// column value.
pub trait Unique: Vindex {
    /// Maps each value to its keyspace id, `None` where no mapping
    /// exists. Issues one query per value, in input order.
    fn map(
        &self,
        executor: &dyn QueryExecutor,
        ids: &[Value],
    ) -> RoutingResult<Vec<Option<KeyspaceId>>>;
}

/// Mapping capability of vindexes where a column value may own any
/// number of keyspace ids.
pub trait NonUnique: Vindex {
    /// Maps each value to all of its keyspace ids, possibly none.
    /// Issues one query per value, in input order.
    fn map(
        &self,
        executor: &dyn QueryExecutor,
        ids: &[Value],
    ) -> RoutingResult<Vec<Vec<KeyspaceId>>>;
}

/// Write-maintenance capability: keeps the backing mapping consistent
/// with base-table writes.
pub trait Lookup: Vindex {
    /// Inserts (value, keyspace id) pairs into the mapping.
    ///
    /// Requires `ids.len() == ksids.len()`. One write execution for
    /// the whole batch; atomicity across statements is the caller's
    /// responsibility.
    fn create(
        &self,
        executor: &dyn QueryExecutor,
        ids: &[Value],
        ksids: &[&[u8]],
    ) -> RoutingResult<()>;

    /// Removes the pairs formed by each value and the shared keyspace
    /// id, one delete per value.
    fn delete(
        &self,
        executor: &dyn QueryExecutor,
        ids: &[Value],
        ksid: &[u8],
    ) -> RoutingResult<()>;
}

/// Reverse-mapping capability: recovers column values from keyspace
/// ids without consulting storage. Lookup vindexes never support this;
/// the backing table only translates forward.
pub trait Reversible: Vindex {
    /// Maps each keyspace id back to a column value.
    fn reverse_map(&self, ksids: &[KeyspaceId]) -> RoutingResult<Vec<Value>>;
}
