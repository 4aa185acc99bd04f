//! Host-platform collaborator contract.
//!
//! The warehouse module does not own persistence or realtime delivery —
//! the surrounding ERP platform does. This crate defines the seams the
//! module consumes (`DocStore` for versioned JSON documents, `EventSink`
//! for fire-and-forget user notifications) plus an embedded SQLite-backed
//! reference implementation so the service runs and tests without an
//! external platform.

pub mod error;
pub mod events;
pub mod ops;
pub mod sqlite;
pub mod traits;

pub use error::HostError;
pub use events::{Event, EventHub, EventSink, NullSink};
pub use ops::{Doc, DocOps};
pub use sqlite::SqliteDocStore;
pub use traits::{DocQuery, DocStore, FieldValue, RawDoc, SaveOpts};
