use crate::error::HostError;

/// A document as held by the platform: a versioned JSON body under a
/// `(doctype, id)` key.
///
/// `version` starts at 1 on insert and is bumped by every successful
/// save. A save whose version no longer matches the stored one is
/// rejected — this is the platform-side write-conflict detection the
/// module relies on instead of doing its own compare-and-swap.
#[derive(Debug, Clone)]
pub struct RawDoc {
    pub doctype: String,
    pub id: String,
    pub version: i64,
    pub data: serde_json::Value,
}

/// Options accepted by the platform's save path.
#[derive(Debug, Clone, Copy, Default)]
pub struct SaveOpts {
    /// Skip the platform's permission checks. The embedded store applies
    /// none; a real platform honours this the way its own save API does.
    pub bypass_permissions: bool,
}

/// A typed filter value for document-field queries.
#[derive(Debug, Clone)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Real(f64),
    Bool(bool),
}

/// An equality-filtered projection query over one doctype.
///
/// Field names address the JSON document fields (camelCase, as
/// serialized), e.g. `status` or `pickList`.
#[derive(Debug, Clone, Default)]
pub struct DocQuery {
    pub filters: Vec<(String, FieldValue)>,
    /// Field to order by, ascending unless `descending` is set.
    pub order_by: Option<String>,
    pub descending: bool,
    pub limit: Option<usize>,
}

impl DocQuery {
    pub fn filter(mut self, field: &str, value: FieldValue) -> Self {
        self.filters.push((field.to_string(), value));
        self
    }

    pub fn order_by(mut self, field: &str, descending: bool) -> Self {
        self.order_by = Some(field.to_string());
        self.descending = descending;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// DocStore is the platform's document layer: load/save/query of
/// versioned JSON documents.
///
/// All module state lives behind this seam; the module performs no
/// caching of its own beyond read-through calls.
pub trait DocStore: Send + Sync {
    /// Load a document. Fails `NotFound` if absent.
    fn load(&self, doctype: &str, id: &str) -> Result<RawDoc, HostError>;

    /// Insert a new document. Fails `Conflict` if the id already exists.
    /// The stored version is 1 regardless of `doc.version`.
    fn insert(&self, doc: &RawDoc) -> Result<(), HostError>;

    /// Save an existing document. Fails `Conflict` when `doc.version` is
    /// stale, `NotFound` when the document is gone. Returns the new
    /// version.
    fn save(&self, doc: &RawDoc, opts: SaveOpts) -> Result<i64, HostError>;

    /// Run an equality-filtered projection query over one doctype.
    fn query(&self, doctype: &str, query: &DocQuery) -> Result<Vec<RawDoc>, HostError>;

    /// Count documents matching the filters.
    fn count(&self, doctype: &str, filters: &[(String, FieldValue)]) -> Result<u64, HostError>;
}
