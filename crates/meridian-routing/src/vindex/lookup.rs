//! Lookup vindexes backed by a two-column table.
//!
//! A lookup vindex maps arbitrary column values to keyspace ids
//! through an auxiliary table of two columns, `from` → `to`. The
//! [`LookupTable`] owns the table configuration and builds the four
//! query shapes; [`LookupUnique`] and [`LookupNonUnique`] wrap it with
//! the cardinality-specific result handling. External systems inspect
//! query logs for these exact SQL shapes, so the generated text and
//! bind-variable names are load-bearing and covered by tests.

use std::collections::HashMap;
use std::fmt::Write as _;

use tracing::debug;

use meridian_common::{BoundQuery, KeyspaceId, QueryResult, Value};

use super::{Lookup, NonUnique, Unique, Vindex};
use crate::error::{RoutingError, RoutingResult};
use crate::executor::QueryExecutor;

const OP_MAP: &str = "lookup.map";
const OP_VERIFY: &str = "lookup.verify";
const OP_CREATE: &str = "lookup.create";
const OP_DELETE: &str = "lookup.delete";

/// Configuration of the auxiliary table behind a lookup vindex, and
/// the builder for the queries issued against it.
///
/// The table and column names are fixed at construction and the
/// builder methods are pure: placeholder names derive from the column
/// names, with index suffixes whenever an operation batches more than
/// one (value, keyspace id) pair.
#[derive(Debug, Clone)]
pub struct LookupTable {
    table: String,
    from: String,
    to: String,
}

impl LookupTable {
    /// Creates the configuration. Names must be non-empty; the
    /// registry enforces this for vindexes built from params.
    pub fn new(
        table: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    /// Extracts and validates the `table`, `from`, and `to` params.
    pub fn from_params(
        vindex_type: &'static str,
        params: &HashMap<String, String>,
    ) -> RoutingResult<Self> {
        let table = required_param(vindex_type, params, "table")?;
        let from = required_param(vindex_type, params, "from")?;
        let to = required_param(vindex_type, params, "to")?;
        Ok(Self { table, from, to })
    }

    /// The backing table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The column holding caller-side values.
    pub fn from_column(&self) -> &str {
        &self.from
    }

    /// The column holding keyspace ids.
    pub fn to_column(&self) -> &str {
        &self.to
    }

    /// `select <to> from <table> where <from> = :<from>`
    pub fn map_query(&self, id: &Value) -> BoundQuery {
        let sql = format!(
            "select {} from {} where {} = :{}",
            self.to, self.table, self.from, self.from
        );
        BoundQuery::new(sql).bind(self.from.clone(), id.clone())
    }

    /// `select <from> from <table> where ((<from>=:<from>0 and <to>=:<to>0) or ...)`
    pub fn verify_query(&self, ids: &[Value], ksids: &[KeyspaceId]) -> BoundQuery {
        let mut sql = format!("select {} from {} where (", self.from, self.table);
        let mut query = BoundQuery::new(String::new());
        for (i, (id, ksid)) in ids.iter().zip(ksids).enumerate() {
            if i > 0 {
                sql.push_str(" or ");
            }
            let _ = write!(
                sql,
                "({}=:{}{} and {}=:{}{})",
                self.from, self.from, i, self.to, self.to, i
            );
            query = query
                .bind(format!("{}{}", self.from, i), id.clone())
                .bind(format!("{}{}", self.to, i), ksid);
        }
        sql.push(')');
        query.sql = sql;
        query
    }

    /// `insert into <table>(<from>,<to>) values(:<from>0,:<to>0),...`
    pub fn create_query(&self, ids: &[Value], ksids: &[KeyspaceId]) -> BoundQuery {
        let mut sql = format!("insert into {}({},{}) values", self.table, self.from, self.to);
        let mut query = BoundQuery::new(String::new());
        for (i, (id, ksid)) in ids.iter().zip(ksids).enumerate() {
            if i > 0 {
                sql.push(',');
            }
            let _ = write!(sql, "(:{}{},:{}{})", self.from, i, self.to, i);
            query = query
                .bind(format!("{}{}", self.from, i), id.clone())
                .bind(format!("{}{}", self.to, i), ksid);
        }
        query.sql = sql;
        query
    }

    /// `delete from <table> where <from> = :<from> and <to> = :<to>`
    pub fn delete_query(&self, id: &Value, ksid: &KeyspaceId) -> BoundQuery {
        let sql = format!(
            "delete from {} where {} = :{} and {} = :{}",
            self.table, self.from, self.from, self.to, self.to
        );
        BoundQuery::new(sql)
            .bind(self.from.clone(), id.clone())
            .bind(self.to.clone(), ksid)
    }

    fn verify(
        &self,
        executor: &dyn QueryExecutor,
        ids: &[Value],
        ksids: &[&[u8]],
    ) -> RoutingResult<Vec<bool>> {
        if ids.len() != ksids.len() {
            return Err(RoutingError::length_mismatch(
                OP_VERIFY,
                ids.len(),
                ksids.len(),
            ));
        }
        let ksids = decode_all(OP_VERIFY, ksids)?;
        let query = self.verify_query(ids, &ksids);
        debug!(sql = %query.sql, pairs = ids.len(), "verifying lookup pairs");
        let result = execute(OP_VERIFY, executor, &query)?;
        // One matched row per pair is the success signal for the
        // whole batch; per-pair outcomes are not distinguished.
        let ok = result.num_rows() == ids.len();
        Ok(vec![ok; ids.len()])
    }

    fn map_value(
        &self,
        executor: &dyn QueryExecutor,
        id: &Value,
    ) -> RoutingResult<Vec<KeyspaceId>> {
        let query = self.map_query(id);
        debug!(sql = %query.sql, "mapping value through lookup table");
        let result = execute(OP_MAP, executor, &query)?;
        result
            .rows
            .iter()
            .map(|row| decode_row_ksid(OP_MAP, row.get(0)))
            .collect()
    }

    fn create(
        &self,
        executor: &dyn QueryExecutor,
        ids: &[Value],
        ksids: &[&[u8]],
    ) -> RoutingResult<()> {
        if ids.len() != ksids.len() {
            return Err(RoutingError::length_mismatch(
                OP_CREATE,
                ids.len(),
                ksids.len(),
            ));
        }
        let ksids = decode_all(OP_CREATE, ksids)?;
        let query = self.create_query(ids, &ksids);
        debug!(sql = %query.sql, pairs = ids.len(), "creating lookup rows");
        execute(OP_CREATE, executor, &query)?;
        Ok(())
    }

    fn delete(
        &self,
        executor: &dyn QueryExecutor,
        ids: &[Value],
        ksid: &[u8],
    ) -> RoutingResult<()> {
        let ksid = KeyspaceId::decode(ksid)
            .map_err(|source| RoutingError::invalid_keyspace_id(OP_DELETE, source))?;
        for id in ids {
            let query = self.delete_query(id, &ksid);
            debug!(sql = %query.sql, "deleting lookup row");
            execute(OP_DELETE, executor, &query)?;
        }
        Ok(())
    }
}

fn required_param(
    vindex_type: &'static str,
    params: &HashMap<String, String>,
    param: &'static str,
) -> RoutingResult<String> {
    match params.get(param) {
        Some(value) if !value.is_empty() => Ok(value.clone()),
        _ => Err(RoutingError::MissingParam { vindex_type, param }),
    }
}

fn decode_all(operation: &'static str, ksids: &[&[u8]]) -> RoutingResult<Vec<KeyspaceId>> {
    ksids
        .iter()
        .map(|raw| {
            KeyspaceId::decode(raw)
                .map_err(|source| RoutingError::invalid_keyspace_id(operation, source))
        })
        .collect()
}

fn decode_row_ksid(operation: &'static str, value: Option<&Value>) -> RoutingResult<KeyspaceId> {
    // A non-bytes to-column value is corrupt routing metadata; dump
    // its textual bytes so the row can be found.
    let owned;
    let raw = match value.and_then(Value::as_bytes) {
        Some(bytes) => bytes,
        None => {
            owned = value.map(|v| v.to_string()).unwrap_or_default().into_bytes();
            &owned
        }
    };
    KeyspaceId::decode(raw).map_err(|source| RoutingError::invalid_keyspace_id(operation, source))
}

fn execute(
    operation: &'static str,
    executor: &dyn QueryExecutor,
    query: &BoundQuery,
) -> RoutingResult<QueryResult> {
    executor
        .execute(query)
        .map_err(|cause| RoutingError::execution(operation, cause))
}

/// Lookup vindex with at most one keyspace id per column value.
///
/// Its lower cost makes the planner prefer it over non-unique lookup
/// vindexes when both are applicable.
#[derive(Debug, Clone)]
pub struct LookupUnique {
    name: String,
    lookup: LookupTable,
}

impl LookupUnique {
    /// Creates a unique lookup vindex over the given table.
    pub fn new(name: impl Into<String>, lookup: LookupTable) -> Self {
        Self {
            name: name.into(),
            lookup,
        }
    }

    /// The backing table configuration.
    pub fn lookup_table(&self) -> &LookupTable {
        &self.lookup
    }
}

impl Vindex for LookupUnique {
    fn name(&self) -> &str {
        &self.name
    }

    fn cost(&self) -> u32 {
        10
    }

    fn verify(
        &self,
        executor: &dyn QueryExecutor,
        ids: &[Value],
        ksids: &[&[u8]],
    ) -> RoutingResult<Vec<bool>> {
        self.lookup.verify(executor, ids, ksids)
    }

    fn as_unique(&self) -> Option<&dyn Unique> {
        Some(self)
    }

    fn as_lookup(&self) -> Option<&dyn Lookup> {
        Some(self)
    }
}

impl Unique for LookupUnique {
    fn map(
        &self,
        executor: &dyn QueryExecutor,
        ids: &[Value],
    ) -> RoutingResult<Vec<Option<KeyspaceId>>> {
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            let mut ksids = self.lookup.map_value(executor, id)?;
            match ksids.len() {
                0 => out.push(None),
                1 => out.push(ksids.pop()),
                _ => {
                    return Err(RoutingError::MultipleResults {
                        operation: OP_MAP,
                        table: self.lookup.table.clone(),
                        id: id.clone(),
                    })
                }
            }
        }
        Ok(out)
    }
}

impl Lookup for LookupUnique {
    fn create(
        &self,
        executor: &dyn QueryExecutor,
        ids: &[Value],
        ksids: &[&[u8]],
    ) -> RoutingResult<()> {
        self.lookup.create(executor, ids, ksids)
    }

    fn delete(
        &self,
        executor: &dyn QueryExecutor,
        ids: &[Value],
        ksid: &[u8],
    ) -> RoutingResult<()> {
        self.lookup.delete(executor, ids, ksid)
    }
}

/// Lookup vindex where a column value may map to any number of
/// keyspace ids.
#[derive(Debug, Clone)]
pub struct LookupNonUnique {
    name: String,
    lookup: LookupTable,
}

impl LookupNonUnique {
    /// Creates a non-unique lookup vindex over the given table.
    pub fn new(name: impl Into<String>, lookup: LookupTable) -> Self {
        Self {
            name: name.into(),
            lookup,
        }
    }

    /// The backing table configuration.
    pub fn lookup_table(&self) -> &LookupTable {
        &self.lookup
    }
}

impl Vindex for LookupNonUnique {
    fn name(&self) -> &str {
        &self.name
    }

    fn cost(&self) -> u32 {
        20
    }

    fn verify(
        &self,
        executor: &dyn QueryExecutor,
        ids: &[Value],
        ksids: &[&[u8]],
    ) -> RoutingResult<Vec<bool>> {
        self.lookup.verify(executor, ids, ksids)
    }

    fn as_non_unique(&self) -> Option<&dyn NonUnique> {
        Some(self)
    }

    fn as_lookup(&self) -> Option<&dyn Lookup> {
        Some(self)
    }
}

impl NonUnique for LookupNonUnique {
    fn map(
        &self,
        executor: &dyn QueryExecutor,
        ids: &[Value],
    ) -> RoutingResult<Vec<Vec<KeyspaceId>>> {
        ids.iter()
            .map(|id| self.lookup.map_value(executor, id))
            .collect()
    }
}

impl Lookup for LookupNonUnique {
    fn create(
        &self,
        executor: &dyn QueryExecutor,
        ids: &[Value],
        ksids: &[&[u8]],
    ) -> RoutingResult<()> {
        self.lookup.create(executor, ids, ksids)
    }

    fn delete(
        &self,
        executor: &dyn QueryExecutor,
        ids: &[Value],
        ksid: &[u8],
    ) -> RoutingResult<()> {
        self.lookup.delete(executor, ids, ksid)
    }
}
