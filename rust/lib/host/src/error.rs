use thiserror::Error;

/// Errors surfaced by the host platform's document layer.
///
/// Messages are passed through to callers verbatim — the platform's
/// original error text is part of the contract.
#[derive(Debug, Error)]
pub enum HostError {
    /// Document does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Write rejected: duplicate id on insert, or stale version on save.
    #[error("{0}")]
    Conflict(String),

    /// Underlying storage failure.
    #[error("{0}")]
    Storage(String),
}
