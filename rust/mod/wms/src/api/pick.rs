use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::Deserialize;

use openwms_host::Doc;

use crate::model::{PickList, PickLocation, PickSession};
use crate::service::Actor;
use crate::service::fulfill::ComposeResult;
use crate::service::lock::{LockGrant, LockRelease};
use crate::service::progress::ProgressOverrides;
use crate::service::query::PickListDetails;
use crate::service::route::RouteSummary;
use super::{ApiError, WmsState, ok_json};

pub fn routes() -> Router<WmsState> {
    Router::new()
        .route("/pick-lists/{id}/lock", post(lock))
        .route("/pick-lists/{id}/unlock", post(unlock))
        .route("/pick-lists/{id}/optimize-route", post(optimize_route))
        .route("/pick-lists/{id}/progress", post(progress))
        .route("/pick-lists/{id}/details", get(details))
        .route("/pick-lists/{id}/submit", post(submit))
        .route("/pick-lists/{id}/cancel", post(cancel))
        .route("/pick-lists/{id}/sessions", post(create_session))
        .route("/pick-lists/{id}/delivery-notes", post(create_delivery_notes))
}

async fn lock(
    State(state): State<WmsState>,
    Path(id): Path<String>,
    actor: Actor,
) -> Result<Json<LockGrant>, ApiError> {
    ok_json(state.service.lock_pick_list(&id, &actor))
}

async fn unlock(
    State(state): State<WmsState>,
    Path(id): Path<String>,
    actor: Actor,
) -> Result<Json<LockRelease>, ApiError> {
    ok_json(state.service.unlock_pick_list(&id, &actor))
}

async fn optimize_route(
    State(state): State<WmsState>,
    Path(id): Path<String>,
) -> Result<Json<RouteSummary>, ApiError> {
    ok_json(state.service.optimize_pick_route(&id))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PickProgressBody {
    row_idx: u32,
    picked_qty: f64,
    #[serde(flatten)]
    overrides: ProgressOverrides,
}

async fn progress(
    State(state): State<WmsState>,
    Path(id): Path<String>,
    actor: Actor,
    Json(body): Json<PickProgressBody>,
) -> Result<Json<PickLocation>, ApiError> {
    ok_json(state.service.record_pick_progress(
        &id,
        body.row_idx,
        body.picked_qty,
        body.overrides,
        &actor,
    ))
}

async fn details(
    State(state): State<WmsState>,
    Path(id): Path<String>,
) -> Result<Json<PickListDetails>, ApiError> {
    ok_json(state.service.pick_list_details(&id))
}

async fn submit(
    State(state): State<WmsState>,
    Path(id): Path<String>,
    actor: Actor,
) -> Result<Json<PickList>, ApiError> {
    ok_json(state.service.submit_pick_list(&id, &actor))
}

async fn cancel(
    State(state): State<WmsState>,
    Path(id): Path<String>,
) -> Result<Json<PickList>, ApiError> {
    ok_json(state.service.cancel_pick_list(&id))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionBody {
    #[serde(default)]
    scan_mode: bool,
}

async fn create_session(
    State(state): State<WmsState>,
    Path(id): Path<String>,
    actor: Actor,
    Json(body): Json<CreateSessionBody>,
) -> Result<Json<Doc<PickSession>>, ApiError> {
    ok_json(state.service.create_pick_session(&id, &actor, body.scan_mode))
}

async fn create_delivery_notes(
    State(state): State<WmsState>,
    Path(id): Path<String>,
    actor: Actor,
) -> Result<Json<ComposeResult>, ApiError> {
    ok_json(state.service.create_delivery_notes(&id, &actor))
}
