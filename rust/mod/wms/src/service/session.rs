use openwms_core::{new_id, now_rfc3339};
use openwms_host::Doc;

use crate::model::{PickSession, SessionStatus};
use super::{Actor, WmsError, WmsService};

impl WmsService {
    /// Start a picking session for a pick list.
    ///
    /// Fails `NotFound` when the pick list doesn't exist.
    pub fn create_pick_session(
        &self,
        pick_list_id: &str,
        actor: &Actor,
        scan_mode: bool,
    ) -> Result<Doc<PickSession>, WmsError> {
        // The pick list must exist before a session can run on it.
        self.pick_lists.get(pick_list_id)?;

        let session = PickSession {
            pick_list: pick_list_id.to_string(),
            picker: actor.user.clone(),
            scan_mode,
            status: SessionStatus::InProgress,
            start_time: now_rfc3339(),
        };
        Ok(self.sessions.insert(&new_id(), &session)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::service::testutil::*;
    use super::*;

    #[test]
    fn creates_a_running_session() {
        let (service, _) = make_service();
        service
            .pick_lists
            .insert("PL-1", &pick_list(vec![location(1, "A", 1.0, "WH-A")]))
            .unwrap();

        let session = service
            .create_pick_session("PL-1", &Actor::new("alice", "s1"), true)
            .unwrap();
        assert_eq!(session.body.pick_list, "PL-1");
        assert_eq!(session.body.picker, "alice");
        assert!(session.body.scan_mode);
        assert_eq!(session.body.status, SessionStatus::InProgress);
    }

    #[test]
    fn missing_pick_list_is_not_found() {
        let (service, _) = make_service();
        let err = service
            .create_pick_session("NOPE", &Actor::new("alice", "s1"), false)
            .unwrap_err();
        assert!(matches!(err, WmsError::NotFound(_)));
    }
}
