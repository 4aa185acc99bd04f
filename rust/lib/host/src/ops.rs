use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::HostError;
use crate::traits::{DocQuery, DocStore, FieldValue, RawDoc, SaveOpts};

/// A typed, versioned document loaded through [`DocOps`].
///
/// Carry the `version` back into `save` unchanged — the platform uses it
/// to reject stale writes. Serializes flat (`{id, version, ...body}`)
/// for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct Doc<T> {
    pub id: String,
    pub version: i64,
    #[serde(flatten)]
    pub body: T,
}

/// Typed document operations over a `dyn DocStore` for one doctype.
///
/// Services hold one `DocOps` per document type they touch:
///
/// ```ignore
/// let pick_lists = DocOps::<PickList>::new(store.clone(), "pick_list");
/// let mut doc = pick_lists.get("PL-0001")?;
/// doc.body.status = DocStatus::Completed;
/// pick_lists.save(&mut doc, SaveOpts::default())?;
/// ```
pub struct DocOps<T> {
    store: Arc<dyn DocStore>,
    doctype: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for DocOps<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            doctype: self.doctype,
            _marker: PhantomData,
        }
    }
}

impl<T: Serialize + DeserializeOwned> DocOps<T> {
    pub fn new(store: Arc<dyn DocStore>, doctype: &'static str) -> Self {
        Self {
            store,
            doctype,
            _marker: PhantomData,
        }
    }

    fn decode(&self, raw: RawDoc) -> Result<Doc<T>, HostError> {
        let body = serde_json::from_value(raw.data).map_err(|e| {
            HostError::Storage(format!(
                "undecodable document {}/{}: {}",
                self.doctype, raw.id, e
            ))
        })?;
        Ok(Doc {
            id: raw.id,
            version: raw.version,
            body,
        })
    }

    /// Load a document. Fails `NotFound` if absent.
    pub fn get(&self, id: &str) -> Result<Doc<T>, HostError> {
        let raw = self.store.load(self.doctype, id)?;
        self.decode(raw)
    }

    /// Load a document, mapping absence to `None`.
    pub fn try_get(&self, id: &str) -> Result<Option<Doc<T>>, HostError> {
        match self.store.load(self.doctype, id) {
            Ok(raw) => Ok(Some(self.decode(raw)?)),
            Err(HostError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Insert a new document under `id`. Fails `Conflict` on duplicates.
    pub fn insert(&self, id: &str, body: &T) -> Result<Doc<T>, HostError> {
        let data = serde_json::to_value(body)
            .map_err(|e| HostError::Storage(e.to_string()))?;
        let raw = RawDoc {
            doctype: self.doctype.to_string(),
            id: id.to_string(),
            version: 0,
            data,
        };
        self.store.insert(&raw)?;
        self.decode(RawDoc { version: 1, ..raw })
    }

    /// Save a loaded document; bumps `doc.version` on success.
    pub fn save(&self, doc: &mut Doc<T>, opts: SaveOpts) -> Result<(), HostError> {
        let data = serde_json::to_value(&doc.body)
            .map_err(|e| HostError::Storage(e.to_string()))?;
        let raw = RawDoc {
            doctype: self.doctype.to_string(),
            id: doc.id.clone(),
            version: doc.version,
            data,
        };
        doc.version = self.store.save(&raw, opts)?;
        Ok(())
    }

    /// Run an equality-filtered query, returning typed documents.
    pub fn query(&self, query: &DocQuery) -> Result<Vec<Doc<T>>, HostError> {
        let raws = self.store.query(self.doctype, query)?;
        raws.into_iter().map(|raw| self.decode(raw)).collect()
    }

    /// Count documents matching the filters.
    pub fn count(&self, filters: &[(String, FieldValue)]) -> Result<u64, HostError> {
        self.store.count(self.doctype, filters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::SqliteDocStore;
    use serde::Deserialize;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Widget {
        name: String,
        qty: i64,
    }

    fn ops() -> DocOps<Widget> {
        let store: Arc<dyn DocStore> = Arc::new(SqliteDocStore::open_in_memory().unwrap());
        DocOps::new(store, "widget")
    }

    #[test]
    fn typed_roundtrip() {
        let ops = ops();
        let inserted = ops
            .insert("W1", &Widget { name: "Widget".into(), qty: 3 })
            .unwrap();
        assert_eq!(inserted.version, 1);

        let loaded = ops.get("W1").unwrap();
        assert_eq!(loaded.body, Widget { name: "Widget".into(), qty: 3 });
    }

    #[test]
    fn save_bumps_local_version() {
        let ops = ops();
        ops.insert("W1", &Widget { name: "Widget".into(), qty: 3 }).unwrap();

        let mut doc = ops.get("W1").unwrap();
        doc.body.qty = 5;
        ops.save(&mut doc, SaveOpts::default()).unwrap();
        assert_eq!(doc.version, 2);

        // A second save from the refreshed handle succeeds.
        doc.body.qty = 7;
        ops.save(&mut doc, SaveOpts::default()).unwrap();
        assert_eq!(ops.get("W1").unwrap().body.qty, 7);
    }

    #[test]
    fn try_get_missing_is_none() {
        let ops = ops();
        assert!(ops.try_get("NOPE").unwrap().is_none());
    }

    #[test]
    fn query_typed() {
        let ops = ops();
        ops.insert("A", &Widget { name: "a".into(), qty: 1 }).unwrap();
        ops.insert("B", &Widget { name: "b".into(), qty: 2 }).unwrap();

        let docs = ops
            .query(&DocQuery::default().filter("qty", FieldValue::Integer(2)))
            .unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].body.name, "b");
    }
}
