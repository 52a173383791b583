//! End-to-end lookup vindex flow against an in-memory lookup table.

use std::collections::HashMap;
use std::sync::Mutex;

use meridian_common::{BoundQuery, KeyspaceId, QueryResult, Row, Value};
use meridian_routing::{ExecuteError, QueryExecutor, VindexRegistry};

/// Interprets the four lookup query shapes over an in-memory table of
/// (from, to) rows with columns `fromc`/`toc`.
#[derive(Default)]
struct MemoryLookupStore {
    rows: Mutex<Vec<(Value, Vec<u8>)>>,
}

impl MemoryLookupStore {
    fn pair(query: &BoundQuery, index: Option<usize>) -> (Value, Vec<u8>) {
        let suffix = index.map(|i| i.to_string()).unwrap_or_default();
        let from = query
            .binding(&format!("fromc{}", suffix))
            .expect("missing fromc binding")
            .clone();
        let to = query
            .binding(&format!("toc{}", suffix))
            .expect("missing toc binding")
            .as_bytes()
            .expect("toc binding must be bytes")
            .to_vec();
        (from, to)
    }
}

impl QueryExecutor for MemoryLookupStore {
    fn execute(&self, query: &BoundQuery) -> Result<QueryResult, ExecuteError> {
        let mut rows = self.rows.lock().unwrap();
        if query.sql.starts_with("select toc") {
            let id = query.binding("fromc").expect("missing fromc binding");
            let matched = rows
                .iter()
                .filter(|(from, _)| from == id)
                .map(|(_, to)| Row::new(vec![Value::bytes(to.clone())]))
                .collect();
            Ok(QueryResult::with_rows(matched))
        } else if query.sql.starts_with("select fromc") {
            let pairs = query.bindings.len() / 2;
            let mut matched = Vec::new();
            for i in 0..pairs {
                let (from, to) = Self::pair(query, Some(i));
                if rows.iter().any(|(f, t)| *f == from && *t == to) {
                    matched.push(Row::new(vec![from.clone()]));
                }
            }
            Ok(QueryResult::with_rows(matched))
        } else if query.sql.starts_with("insert into") {
            let pairs = query.bindings.len() / 2;
            for i in 0..pairs {
                rows.push(Self::pair(query, Some(i)));
            }
            Ok(QueryResult::with_rows_affected(pairs as u64))
        } else if query.sql.starts_with("delete from") {
            let (from, to) = Self::pair(query, None);
            let before = rows.len();
            rows.retain(|(f, t)| !(*f == from && *t == to));
            Ok(QueryResult::with_rows_affected((before - rows.len()) as u64))
        } else {
            Err(format!("unexpected query: {}", query.sql).into())
        }
    }
}

fn lookup_params() -> HashMap<String, String> {
    [("table", "t"), ("from", "fromc"), ("to", "toc")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn unique_lookup_roundtrip() {
    let store = MemoryLookupStore::default();
    let registry = VindexRegistry::with_builtins();
    let vindex = registry
        .create("lookup_unique", "name_idx", &lookup_params())
        .unwrap();
    let lookup = vindex.as_lookup().unwrap();
    let unique = vindex.as_unique().unwrap();

    let alpha = KeyspaceId::from_hash(0x1000_0000_0000_0000);
    let beta = KeyspaceId::from_hash(0x9000_0000_0000_0000);
    lookup
        .create(
            &store,
            &[Value::from("alice"), Value::from("bob")],
            &[alpha.as_bytes(), beta.as_bytes()],
        )
        .unwrap();

    let mapped = unique
        .map(&store, &[Value::from("alice"), Value::from("bob"), Value::from("carol")])
        .unwrap();
    assert_eq!(mapped, vec![Some(alpha.clone()), Some(beta.clone()), None]);

    let verified = vindex
        .verify(
            &store,
            &[Value::from("alice"), Value::from("bob")],
            &[alpha.as_bytes(), beta.as_bytes()],
        )
        .unwrap();
    assert_eq!(verified, vec![true, true]);

    // A pair that was never created fails the batch check.
    let verified = vindex
        .verify(
            &store,
            &[Value::from("alice"), Value::from("carol")],
            &[alpha.as_bytes(), beta.as_bytes()],
        )
        .unwrap();
    assert_eq!(verified, vec![false, false]);

    lookup
        .delete(&store, &[Value::from("alice")], alpha.as_bytes())
        .unwrap();
    let mapped = unique
        .map(&store, &[Value::from("alice"), Value::from("bob")])
        .unwrap();
    assert_eq!(mapped, vec![None, Some(beta)]);
}

#[test]
fn non_unique_lookup_collects_all_keyspace_ids() {
    let store = MemoryLookupStore::default();
    let registry = VindexRegistry::with_builtins();
    let vindex = registry
        .create("lookup", "region_idx", &lookup_params())
        .unwrap();
    let lookup = vindex.as_lookup().unwrap();
    let non_unique = vindex.as_non_unique().unwrap();

    let east = KeyspaceId::from_hash(0x2000_0000_0000_0000);
    let west = KeyspaceId::from_hash(0xa000_0000_0000_0000);
    lookup
        .create(
            &store,
            &[Value::from("eu"), Value::from("eu")],
            &[east.as_bytes(), west.as_bytes()],
        )
        .unwrap();

    let mapped = non_unique.map(&store, &[Value::from("eu")]).unwrap();
    assert_eq!(mapped, vec![vec![east.clone(), west.clone()]]);

    // Fan-out delete removes one (value, ksid) pair at a time.
    lookup
        .delete(&store, &[Value::from("eu")], east.as_bytes())
        .unwrap();
    let mapped = non_unique.map(&store, &[Value::from("eu")]).unwrap();
    assert_eq!(mapped, vec![vec![west]]);
}

#[test]
fn schema_built_vindexes_share_the_store() {
    let store = MemoryLookupStore::default();
    let schema = meridian_routing::KeyspaceSchema::from_json(
        r#"{
            "vindexes": {
                "name_idx": {
                    "type": "lookup_unique",
                    "params": {"table": "t", "from": "fromc", "to": "toc"}
                }
            },
            "tables": {
                "user": {"column_vindexes": [{"column": "name", "name": "name_idx"}]}
            }
        }"#,
    )
    .unwrap();
    let keyspace = schema.build(&VindexRegistry::with_builtins()).unwrap();
    let vindex = keyspace
        .table("user")
        .unwrap()
        .vindex_for_column("name")
        .unwrap();

    let ksid = KeyspaceId::from_hash(42);
    vindex
        .as_lookup()
        .unwrap()
        .create(&store, &[Value::from("alice")], &[ksid.as_bytes()])
        .unwrap();
    let mapped = vindex
        .as_unique()
        .unwrap()
        .map(&store, &[Value::from("alice")])
        .unwrap();
    assert_eq!(mapped, vec![Some(ksid)]);
}
