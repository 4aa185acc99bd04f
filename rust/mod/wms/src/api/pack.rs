use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use openwms_core::{ListParams, ListResult};

use crate::model::{DeliveryItem, DeliveryNote, PackagePlan, PlannedPackage};
use crate::service::Actor;
use crate::service::lock::{LockGrant, LockRelease};
use crate::service::progress::ProgressOverrides;
use crate::service::query::{DeliveryNoteDetails, UnpackedNote};
use super::{ApiError, WmsState, ok_json};

pub fn routes() -> Router<WmsState> {
    Router::new()
        .route("/delivery-notes/unpacked", get(unpacked))
        .route("/delivery-notes/{id}/details", get(details))
        .route("/delivery-notes/{id}/lock", post(lock))
        .route("/delivery-notes/{id}/unlock", post(unlock))
        .route("/delivery-notes/{id}/pack-plan", post(pack_plan))
        .route("/delivery-notes/{id}/progress", post(progress))
        .route("/delivery-notes/{id}/submit", post(submit))
        .route("/delivery-notes/{id}/shipments", post(create_shipment))
}

async fn unpacked(
    State(state): State<WmsState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResult<UnpackedNote>>, ApiError> {
    ok_json(state.service.unpacked_delivery_notes(&params))
}

async fn details(
    State(state): State<WmsState>,
    Path(id): Path<String>,
) -> Result<Json<DeliveryNoteDetails>, ApiError> {
    ok_json(state.service.delivery_note_details(&id))
}

async fn lock(
    State(state): State<WmsState>,
    Path(id): Path<String>,
    actor: Actor,
) -> Result<Json<LockGrant>, ApiError> {
    ok_json(state.service.lock_delivery_note(&id, &actor))
}

async fn unlock(
    State(state): State<WmsState>,
    Path(id): Path<String>,
    actor: Actor,
) -> Result<Json<LockRelease>, ApiError> {
    ok_json(state.service.unlock_delivery_note(&id, &actor))
}

async fn pack_plan(
    State(state): State<WmsState>,
    Path(id): Path<String>,
) -> Result<Json<PackagePlan>, ApiError> {
    ok_json(state.service.optimize_packing(&id))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackProgressBody {
    row_idx: u32,
    packed_qty: f64,
    #[serde(flatten)]
    overrides: ProgressOverrides,
}

async fn progress(
    State(state): State<WmsState>,
    Path(id): Path<String>,
    actor: Actor,
    Json(body): Json<PackProgressBody>,
) -> Result<Json<DeliveryItem>, ApiError> {
    ok_json(state.service.record_pack_progress(
        &id,
        body.row_idx,
        body.packed_qty,
        body.overrides,
        &actor,
    ))
}

async fn submit(
    State(state): State<WmsState>,
    Path(id): Path<String>,
) -> Result<Json<DeliveryNote>, ApiError> {
    ok_json(state.service.submit_delivery_note(&id))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateShipmentBody {
    #[serde(default)]
    packages: Vec<PlannedPackage>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateShipmentResponse {
    shipment: String,
}

async fn create_shipment(
    State(state): State<WmsState>,
    Path(id): Path<String>,
    actor: Actor,
    Json(body): Json<CreateShipmentBody>,
) -> Result<Json<CreateShipmentResponse>, ApiError> {
    ok_json(
        state
            .service
            .create_shipment(&id, body.packages, &actor)
            .map(|shipment| CreateShipmentResponse { shipment }),
    )
}
