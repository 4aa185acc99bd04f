use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use crate::error::HostError;
use crate::traits::{DocQuery, DocStore, FieldValue, RawDoc, SaveOpts};

/// SqliteDocStore is a DocStore implementation backed by rusqlite
/// (bundled SQLite).
///
/// Documents live in a single `documents` table as JSON text; filtered
/// queries go through `json_extract` over the document fields. Field
/// names in filters come from module code, never from request input.
pub struct SqliteDocStore {
    conn: Mutex<Connection>,
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS documents (
    doctype    TEXT NOT NULL,
    id         TEXT NOT NULL,
    version    INTEGER NOT NULL,
    data       TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (doctype, id)
);
";

impl SqliteDocStore {
    /// Open or create a document database at the given path.
    pub fn open(path: &Path) -> Result<Self, HostError> {
        let conn = Connection::open(path)
            .map_err(|e| HostError::Storage(e.to_string()))?;

        // Enable WAL mode for better concurrent read performance.
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|e| HostError::Storage(e.to_string()))?;

        Self::init(conn)
    }

    /// Create an in-memory document database (useful for tests).
    pub fn open_in_memory() -> Result<Self, HostError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| HostError::Storage(e.to_string()))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, HostError> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| HostError::Storage(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn encode(data: &serde_json::Value) -> Result<String, HostError> {
        serde_json::to_string(data).map_err(|e| HostError::Storage(e.to_string()))
    }
}

/// Convert a FieldValue to rusqlite's ToSql.
fn bind_field(value: &FieldValue) -> Box<dyn rusqlite::types::ToSql + '_> {
    match value {
        FieldValue::Text(s) => Box::new(s.as_str()),
        FieldValue::Integer(i) => Box::new(*i),
        FieldValue::Real(f) => Box::new(*f),
        // JSON booleans extract as 0/1 in SQLite.
        FieldValue::Bool(b) => Box::new(if *b { 1i64 } else { 0i64 }),
    }
}

/// Build the WHERE tail for field filters, appending bind values.
///
/// Placeholders continue from `start_idx` (1-based).
fn filter_sql<'a>(
    filters: &'a [(String, FieldValue)],
    start_idx: usize,
    params: &mut Vec<Box<dyn rusqlite::types::ToSql + 'a>>,
) -> String {
    let mut clauses = Vec::new();
    for (i, (field, value)) in filters.iter().enumerate() {
        clauses.push(format!(
            "json_extract(data, '$.{}') = ?{}",
            field,
            start_idx + i
        ));
        params.push(bind_field(value));
    }
    if clauses.is_empty() {
        String::new()
    } else {
        format!(" AND {}", clauses.join(" AND "))
    }
}

impl DocStore for SqliteDocStore {
    fn load(&self, doctype: &str, id: &str) -> Result<RawDoc, HostError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| HostError::Storage(e.to_string()))?;

        let mut stmt = conn
            .prepare("SELECT version, data FROM documents WHERE doctype = ?1 AND id = ?2")
            .map_err(|e| HostError::Storage(e.to_string()))?;

        let mut rows = stmt
            .query(rusqlite::params![doctype, id])
            .map_err(|e| HostError::Storage(e.to_string()))?;

        let row = rows
            .next()
            .map_err(|e| HostError::Storage(e.to_string()))?
            .ok_or_else(|| HostError::NotFound(format!("{}/{}", doctype, id)))?;

        let version: i64 = row.get(0).map_err(|e| HostError::Storage(e.to_string()))?;
        let data: String = row.get(1).map_err(|e| HostError::Storage(e.to_string()))?;
        let data = serde_json::from_str(&data)
            .map_err(|e| HostError::Storage(format!("corrupt document {}/{}: {}", doctype, id, e)))?;

        Ok(RawDoc {
            doctype: doctype.to_string(),
            id: id.to_string(),
            version,
            data,
        })
    }

    fn insert(&self, doc: &RawDoc) -> Result<(), HostError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| HostError::Storage(e.to_string()))?;

        let now = chrono::Utc::now().to_rfc3339();
        let json = Self::encode(&doc.data)?;

        conn.execute(
            "INSERT INTO documents (doctype, id, version, data, created_at, updated_at)
             VALUES (?1, ?2, 1, ?3, ?4, ?4)",
            rusqlite::params![doc.doctype, doc.id, json, now],
        )
        .map_err(|e| {
            let msg = e.to_string();
            if msg.contains("UNIQUE constraint") {
                HostError::Conflict(format!("{}/{} already exists", doc.doctype, doc.id))
            } else {
                HostError::Storage(msg)
            }
        })?;

        Ok(())
    }

    fn save(&self, doc: &RawDoc, _opts: SaveOpts) -> Result<i64, HostError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| HostError::Storage(e.to_string()))?;

        let now = chrono::Utc::now().to_rfc3339();
        let json = Self::encode(&doc.data)?;

        let affected = conn
            .execute(
                "UPDATE documents SET data = ?1, version = version + 1, updated_at = ?2
                 WHERE doctype = ?3 AND id = ?4 AND version = ?5",
                rusqlite::params![json, now, doc.doctype, doc.id, doc.version],
            )
            .map_err(|e| HostError::Storage(e.to_string()))?;

        if affected == 0 {
            // Distinguish a vanished document from a stale write.
            let exists: bool = conn
                .query_row(
                    "SELECT 1 FROM documents WHERE doctype = ?1 AND id = ?2",
                    rusqlite::params![doc.doctype, doc.id],
                    |_| Ok(true),
                )
                .unwrap_or(false);
            return if exists {
                Err(HostError::Conflict(format!(
                    "stale write to {}/{}: version {} is no longer current",
                    doc.doctype, doc.id, doc.version
                )))
            } else {
                Err(HostError::NotFound(format!("{}/{}", doc.doctype, doc.id)))
            };
        }

        Ok(doc.version + 1)
    }

    fn query(&self, doctype: &str, query: &DocQuery) -> Result<Vec<RawDoc>, HostError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| HostError::Storage(e.to_string()))?;

        let mut params: Vec<Box<dyn rusqlite::types::ToSql + '_>> =
            vec![Box::new(doctype.to_string())];
        let where_tail = filter_sql(&query.filters, 2, &mut params);

        let mut sql = format!(
            "SELECT id, version, data FROM documents WHERE doctype = ?1{}",
            where_tail
        );
        if let Some(ref field) = query.order_by {
            sql.push_str(&format!(
                " ORDER BY json_extract(data, '$.{}') {}",
                field,
                if query.descending { "DESC" } else { "ASC" }
            ));
        } else {
            sql.push_str(" ORDER BY created_at ASC");
        }
        if let Some(limit) = query.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        let param_refs: Vec<&dyn rusqlite::types::ToSql> =
            params.iter().map(|b| b.as_ref()).collect();

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| HostError::Storage(e.to_string()))?;

        let rows = stmt
            .query_map(param_refs.as_slice(), |row| {
                let id: String = row.get(0)?;
                let version: i64 = row.get(1)?;
                let data: String = row.get(2)?;
                Ok((id, version, data))
            })
            .map_err(|e| HostError::Storage(e.to_string()))?;

        let mut result = Vec::new();
        for row in rows {
            let (id, version, data) = row.map_err(|e| HostError::Storage(e.to_string()))?;
            let data = serde_json::from_str(&data)
                .map_err(|e| HostError::Storage(format!("corrupt document {}/{}: {}", doctype, id, e)))?;
            result.push(RawDoc {
                doctype: doctype.to_string(),
                id,
                version,
                data,
            });
        }
        Ok(result)
    }

    fn count(&self, doctype: &str, filters: &[(String, FieldValue)]) -> Result<u64, HostError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| HostError::Storage(e.to_string()))?;

        let mut params: Vec<Box<dyn rusqlite::types::ToSql + '_>> =
            vec![Box::new(doctype.to_string())];
        let where_tail = filter_sql(filters, 2, &mut params);
        let sql = format!(
            "SELECT COUNT(*) FROM documents WHERE doctype = ?1{}",
            where_tail
        );

        let param_refs: Vec<&dyn rusqlite::types::ToSql> =
            params.iter().map(|b| b.as_ref()).collect();

        let count: i64 = conn
            .query_row(&sql, param_refs.as_slice(), |row| row.get(0))
            .map_err(|e| HostError::Storage(e.to_string()))?;

        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(doctype: &str, id: &str, data: serde_json::Value) -> RawDoc {
        RawDoc {
            doctype: doctype.into(),
            id: id.into(),
            version: 0,
            data,
        }
    }

    #[test]
    fn insert_load_roundtrip() {
        let store = SqliteDocStore::open_in_memory().unwrap();
        store
            .insert(&doc("item", "WIDGET", serde_json::json!({"itemName": "Widget"})))
            .unwrap();

        let loaded = store.load("item", "WIDGET").unwrap();
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.data["itemName"], "Widget");
    }

    #[test]
    fn load_missing_is_not_found() {
        let store = SqliteDocStore::open_in_memory().unwrap();
        let err = store.load("item", "NOPE").unwrap_err();
        assert!(matches!(err, HostError::NotFound(_)));
        assert!(err.to_string().contains("item/NOPE"));
    }

    #[test]
    fn duplicate_insert_conflicts() {
        let store = SqliteDocStore::open_in_memory().unwrap();
        let d = doc("item", "W", serde_json::json!({}));
        store.insert(&d).unwrap();
        assert!(matches!(store.insert(&d), Err(HostError::Conflict(_))));
    }

    #[test]
    fn save_bumps_version() {
        let store = SqliteDocStore::open_in_memory().unwrap();
        store
            .insert(&doc("item", "W", serde_json::json!({"qty": 1})))
            .unwrap();

        let mut d = store.load("item", "W").unwrap();
        d.data = serde_json::json!({"qty": 2});
        let v = store.save(&d, SaveOpts::default()).unwrap();
        assert_eq!(v, 2);

        let reloaded = store.load("item", "W").unwrap();
        assert_eq!(reloaded.version, 2);
        assert_eq!(reloaded.data["qty"], 2);
    }

    #[test]
    fn stale_save_conflicts() {
        let store = SqliteDocStore::open_in_memory().unwrap();
        store
            .insert(&doc("item", "W", serde_json::json!({"qty": 1})))
            .unwrap();

        // Two readers load the same version.
        let first = store.load("item", "W").unwrap();
        let second = store.load("item", "W").unwrap();

        store.save(&first, SaveOpts::default()).unwrap();
        let err = store.save(&second, SaveOpts::default()).unwrap_err();
        assert!(matches!(err, HostError::Conflict(_)));
        assert!(err.to_string().contains("stale write"));
    }

    #[test]
    fn save_missing_is_not_found() {
        let store = SqliteDocStore::open_in_memory().unwrap();
        let err = store
            .save(&doc("item", "GONE", serde_json::json!({})), SaveOpts::default())
            .unwrap_err();
        assert!(matches!(err, HostError::NotFound(_)));
    }

    #[test]
    fn query_filters_and_orders() {
        let store = SqliteDocStore::open_in_memory().unwrap();
        for (id, status, seq) in [("A", "Open", 3), ("B", "Open", 1), ("C", "Completed", 2)] {
            store
                .insert(&doc(
                    "pick_list",
                    id,
                    serde_json::json!({"status": status, "seq": seq}),
                ))
                .unwrap();
        }

        let q = DocQuery::default()
            .filter("status", FieldValue::Text("Open".into()))
            .order_by("seq", false);
        let rows = store.query("pick_list", &q).unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
    }

    #[test]
    fn query_respects_limit() {
        let store = SqliteDocStore::open_in_memory().unwrap();
        for id in ["A", "B", "C"] {
            store
                .insert(&doc("bin", id, serde_json::json!({"qty": 1})))
                .unwrap();
        }
        let rows = store
            .query("bin", &DocQuery::default().limit(2))
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn count_with_filters() {
        let store = SqliteDocStore::open_in_memory().unwrap();
        for (id, status) in [("A", "Open"), ("B", "Open"), ("C", "Completed")] {
            store
                .insert(&doc("pick_list", id, serde_json::json!({"status": status})))
                .unwrap();
        }
        let n = store
            .count(
                "pick_list",
                &[("status".to_string(), FieldValue::Text("Open".into()))],
            )
            .unwrap();
        assert_eq!(n, 2);
    }

    #[test]
    fn bool_fields_filter_as_json_booleans() {
        let store = SqliteDocStore::open_in_memory().unwrap();
        store
            .insert(&doc("item", "A", serde_json::json!({"hasBatchNo": true})))
            .unwrap();
        store
            .insert(&doc("item", "B", serde_json::json!({"hasBatchNo": false})))
            .unwrap();

        let rows = store
            .query(
                "item",
                &DocQuery::default().filter("hasBatchNo", FieldValue::Bool(true)),
            )
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "A");
    }

    #[test]
    fn open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteDocStore::open(&dir.path().join("docs.sqlite")).unwrap();
        store.insert(&doc("item", "W", serde_json::json!({}))).unwrap();
        assert!(store.load("item", "W").is_ok());
    }
}
