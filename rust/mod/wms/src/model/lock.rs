use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Locks older than this are stale and may be taken over.
///
/// This window is a business rule, not a tunable: operators expect an
/// abandoned pick to become available again after half an hour.
pub const LOCK_TTL_MINUTES: i64 = 30;

/// Exclusive editing lock on a work document.
///
/// At most one non-expired lock exists per document. The `session` is an
/// opaque per-client id (one per browser tab); a request from the same
/// session renews the lock, a different session of the same user is
/// treated like any other contender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocLock {
    /// User currently picking/packing.
    pub holder: String,
    /// Client session that acquired the lock.
    pub session: String,
    /// Acquisition time (RFC 3339). Renewal resets this.
    pub locked_at: String,
}

impl DocLock {
    pub fn new(holder: &str, session: &str, now: DateTime<Utc>) -> Self {
        Self {
            holder: holder.to_string(),
            session: session.to_string(),
            locked_at: now.to_rfc3339(),
        }
    }

    /// Whether the lock is stale at `now`.
    ///
    /// An unparseable timestamp counts as expired so a corrupt lock can
    /// never wedge a document.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match DateTime::parse_from_rfc3339(&self.locked_at) {
            Ok(at) => now - at.with_timezone(&Utc) >= Duration::minutes(LOCK_TTL_MINUTES),
            Err(_) => true,
        }
    }

    pub fn is_session(&self, session: &str) -> bool {
        self.session == session
    }
}

/// Work documents that support exclusive editing locks.
pub trait Lockable {
    fn lock(&self) -> Option<&DocLock>;
    fn lock_mut(&mut self) -> &mut Option<DocLock>;

    /// Human label used in conflict messages ("pick list", "delivery note").
    fn kind() -> &'static str;
}
