use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use openwms_host::{DocOps, SaveOpts};

use crate::model::{DocLock, Lockable};
use super::{Actor, WmsError, WmsService};

/// Outcome of a granted lock request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockGrant {
    pub holder: String,
    /// True when this was a renewal from the session already holding the
    /// lock (the expiry clock was reset, no new holder was installed).
    pub same_session: bool,
    /// RFC 3339 acquisition time now on the document.
    pub locked_at: String,
}

/// Outcome of a release request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockRelease {
    /// False when the requester was not the holder (no-op).
    pub released: bool,
}

/// What to do with an acquisition request against the current lock state.
#[derive(Debug, PartialEq, Eq)]
enum LockDecision {
    Grant { renewal: bool },
    Deny { holder: String, same_user: bool },
}

/// Decide an acquisition without touching the document.
///
/// Grant when there is no lock, the lock is stale, or the request comes
/// from the session that holds it (idempotent renewal). Deny otherwise.
fn evaluate(lock: Option<&DocLock>, actor: &Actor, now: DateTime<Utc>) -> LockDecision {
    match lock {
        None => LockDecision::Grant { renewal: false },
        Some(l) if l.is_session(&actor.session) => LockDecision::Grant { renewal: true },
        Some(l) if l.is_expired(now) => LockDecision::Grant { renewal: false },
        Some(l) => LockDecision::Deny {
            holder: l.holder.clone(),
            same_user: l.holder == actor.user,
        },
    }
}

impl WmsService {
    // ── Pick list ──

    pub fn lock_pick_list(&self, id: &str, actor: &Actor) -> Result<LockGrant, WmsError> {
        Self::lock_doc(&self.pick_lists, id, actor)
    }

    pub fn unlock_pick_list(&self, id: &str, actor: &Actor) -> Result<LockRelease, WmsError> {
        Self::unlock_doc(&self.pick_lists, id, actor)
    }

    // ── Delivery note ──

    pub fn lock_delivery_note(&self, id: &str, actor: &Actor) -> Result<LockGrant, WmsError> {
        Self::lock_doc(&self.delivery_notes, id, actor)
    }

    pub fn unlock_delivery_note(&self, id: &str, actor: &Actor) -> Result<LockRelease, WmsError> {
        Self::unlock_doc(&self.delivery_notes, id, actor)
    }

    // ── Generic over lockable work documents ──

    fn lock_doc<T>(ops: &DocOps<T>, id: &str, actor: &Actor) -> Result<LockGrant, WmsError>
    where
        T: Lockable + Serialize + DeserializeOwned,
    {
        let mut doc = ops.get(id)?;
        let now = Utc::now();

        match evaluate(doc.body.lock(), actor, now) {
            LockDecision::Deny { holder, same_user } => {
                let message = if same_user {
                    format!(
                        "you already have this {} open in another session",
                        T::kind()
                    )
                } else {
                    format!("this {} is currently being worked on by {}", T::kind(), holder)
                };
                Err(WmsError::LockConflict { holder, message })
            }
            LockDecision::Grant { renewal } => {
                let lock = DocLock::new(&actor.user, &actor.session, now);
                let locked_at = lock.locked_at.clone();
                *doc.body.lock_mut() = Some(lock);
                // The host may restrict who edits these documents; lock
                // bookkeeping writes go through regardless.
                ops.save(&mut doc, SaveOpts { bypass_permissions: true })?;
                Ok(LockGrant {
                    holder: actor.user.clone(),
                    same_session: renewal,
                    locked_at,
                })
            }
        }
    }

    fn unlock_doc<T>(ops: &DocOps<T>, id: &str, actor: &Actor) -> Result<LockRelease, WmsError>
    where
        T: Lockable + Serialize + DeserializeOwned,
    {
        let mut doc = ops.get(id)?;

        let held_by_requester = doc
            .body
            .lock()
            .is_some_and(|l| l.holder == actor.user);
        if !held_by_requester {
            return Ok(LockRelease { released: false });
        }

        *doc.body.lock_mut() = None;
        ops.save(&mut doc, SaveOpts { bypass_permissions: true })?;
        Ok(LockRelease { released: true })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use crate::service::testutil::*;
    use super::*;

    fn seeded() -> (std::sync::Arc<WmsService>, String) {
        let (service, _) = make_service();
        let doc = service
            .pick_lists
            .insert("PL-1", &pick_list(vec![location(1, "WIDGET-01", 2.0, "WH-A")]))
            .unwrap();
        (service, doc.id)
    }

    #[test]
    fn acquire_on_unlocked_document() {
        let (service, id) = seeded();
        let actor = Actor::new("alice", "s1");

        let grant = service.lock_pick_list(&id, &actor).unwrap();
        assert_eq!(grant.holder, "alice");
        assert!(!grant.same_session);

        let stored = service.pick_lists.get(&id).unwrap().body.lock.unwrap();
        assert_eq!(stored.holder, "alice");
        assert_eq!(stored.session, "s1");
    }

    #[test]
    fn concurrent_session_is_denied_and_told_the_holder() {
        let (service, id) = seeded();
        service.lock_pick_list(&id, &Actor::new("alice", "s1")).unwrap();

        let err = service
            .lock_pick_list(&id, &Actor::new("bob", "s2"))
            .unwrap_err();
        match err {
            WmsError::LockConflict { holder, message } => {
                assert_eq!(holder, "alice");
                assert!(message.contains("alice"));
            }
            other => panic!("expected LockConflict, got {:?}", other),
        }

        // The stored lock is untouched.
        let stored = service.pick_lists.get(&id).unwrap().body.lock.unwrap();
        assert_eq!(stored.holder, "alice");
    }

    #[test]
    fn same_user_other_tab_is_denied() {
        let (service, id) = seeded();
        service.lock_pick_list(&id, &Actor::new("alice", "tab-1")).unwrap();

        let err = service
            .lock_pick_list(&id, &Actor::new("alice", "tab-2"))
            .unwrap_err();
        match err {
            WmsError::LockConflict { holder, message } => {
                assert_eq!(holder, "alice");
                assert!(message.contains("another session"));
            }
            other => panic!("expected LockConflict, got {:?}", other),
        }
    }

    #[test]
    fn same_session_renews_and_resets_the_clock() {
        let (service, id) = seeded();
        let actor = Actor::new("alice", "s1");
        service.lock_pick_list(&id, &actor).unwrap();

        // Backdate the stored lock close to expiry.
        let mut doc = service.pick_lists.get(&id).unwrap();
        let old = (Utc::now() - Duration::minutes(29)).to_rfc3339();
        doc.body.lock.as_mut().unwrap().locked_at = old.clone();
        service.pick_lists.save(&mut doc, SaveOpts::default()).unwrap();

        let grant = service.lock_pick_list(&id, &actor).unwrap();
        assert!(grant.same_session);

        let stored = service.pick_lists.get(&id).unwrap().body.lock.unwrap();
        assert_ne!(stored.locked_at, old);
        assert_eq!(stored.session, "s1");
    }

    #[test]
    fn stale_lock_is_taken_over() {
        let (service, id) = seeded();
        service.lock_pick_list(&id, &Actor::new("alice", "s1")).unwrap();

        let mut doc = service.pick_lists.get(&id).unwrap();
        doc.body.lock.as_mut().unwrap().locked_at =
            (Utc::now() - Duration::minutes(31)).to_rfc3339();
        service.pick_lists.save(&mut doc, SaveOpts::default()).unwrap();

        let grant = service
            .lock_pick_list(&id, &Actor::new("bob", "s2"))
            .unwrap();
        assert_eq!(grant.holder, "bob");
        assert!(!grant.same_session);

        let stored = service.pick_lists.get(&id).unwrap().body.lock.unwrap();
        assert_eq!(stored.holder, "bob");
        assert_eq!(stored.session, "s2");
    }

    #[test]
    fn release_by_holder_clears_the_lock() {
        let (service, id) = seeded();
        let actor = Actor::new("alice", "s1");
        service.lock_pick_list(&id, &actor).unwrap();

        let release = service.unlock_pick_list(&id, &actor).unwrap();
        assert!(release.released);
        assert!(service.pick_lists.get(&id).unwrap().body.lock.is_none());
    }

    #[test]
    fn release_by_non_holder_is_a_noop() {
        let (service, id) = seeded();
        service.lock_pick_list(&id, &Actor::new("alice", "s1")).unwrap();

        let release = service
            .unlock_pick_list(&id, &Actor::new("bob", "s2"))
            .unwrap();
        assert!(!release.released);
        assert_eq!(
            service.pick_lists.get(&id).unwrap().body.lock.unwrap().holder,
            "alice"
        );
    }

    #[test]
    fn release_without_lock_is_a_noop() {
        let (service, id) = seeded();
        let release = service
            .unlock_pick_list(&id, &Actor::new("alice", "s1"))
            .unwrap();
        assert!(!release.released);
    }

    #[test]
    fn lock_missing_document_is_not_found() {
        let (service, _) = make_service();
        let err = service
            .lock_pick_list("NOPE", &Actor::new("alice", "s1"))
            .unwrap_err();
        assert!(matches!(err, WmsError::NotFound(_)));
    }

    #[test]
    fn delivery_notes_lock_independently() {
        let (service, _) = make_service();
        service
            .delivery_notes
            .insert("DN-1", &delivery_note(vec![delivery_item(1, "WIDGET-01", 1.0)]))
            .unwrap();

        let grant = service
            .lock_delivery_note("DN-1", &Actor::new("alice", "s1"))
            .unwrap();
        assert_eq!(grant.holder, "alice");

        let err = service
            .lock_delivery_note("DN-1", &Actor::new("bob", "s2"))
            .unwrap_err();
        assert!(matches!(err, WmsError::LockConflict { .. }));
    }

    #[test]
    fn locking_does_not_emit_events() {
        let (service, sink) = make_service();
        service
            .pick_lists
            .insert("PL-1", &pick_list(vec![location(1, "WIDGET-01", 2.0, "WH-A")]))
            .unwrap();

        service.lock_pick_list("PL-1", &Actor::new("alice", "s1")).unwrap();
        service.unlock_pick_list("PL-1", &Actor::new("alice", "s1")).unwrap();
        assert!(sink.take().is_empty());
    }

    #[test]
    fn evaluate_decision_table() {
        let now = Utc::now();
        let alice = Actor::new("alice", "s1");

        assert_eq!(evaluate(None, &alice, now), LockDecision::Grant { renewal: false });

        let lock = DocLock::new("alice", "s1", now);
        assert_eq!(
            evaluate(Some(&lock), &alice, now),
            LockDecision::Grant { renewal: true }
        );

        let bob = Actor::new("bob", "s2");
        assert_eq!(
            evaluate(Some(&lock), &bob, now),
            LockDecision::Deny { holder: "alice".into(), same_user: false }
        );

        let stale = DocLock::new("alice", "s1", now - Duration::minutes(30));
        assert_eq!(
            evaluate(Some(&stale), &bob, now),
            LockDecision::Grant { renewal: false }
        );
    }
}
