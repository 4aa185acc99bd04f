use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;

use openwms_host::Event;

use crate::service::Actor;
use super::WmsState;

pub fn routes() -> Router<WmsState> {
    Router::new().route("/events/poll", get(poll))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PollQuery {
    #[serde(default = "default_timeout")]
    timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PollResult {
    /// The next event addressed to the caller, or null on timeout.
    event: Option<Event>,
}

/// Long-poll: wait up to `timeoutSecs` for the next event addressed to
/// the acting user (or broadcast). Returns `{"event": null}` on timeout.
async fn poll(
    State(state): State<WmsState>,
    Query(query): Query<PollQuery>,
    actor: Actor,
) -> Json<PollResult> {
    let mut rx = state.hub.subscribe();
    let timeout = Duration::from_secs(query.timeout_secs.min(120));

    let next = async {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let addressed = event
                        .user
                        .as_deref()
                        .is_none_or(|user| user == actor.user);
                    if addressed {
                        break Some(event);
                    }
                }
                // Dropped behind the buffer — keep waiting for fresh events.
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break None,
            }
        }
    };

    let event = tokio::time::timeout(timeout, next).await.unwrap_or(None);
    Json(PollResult { event })
}
