use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use serde::Serialize;

use crate::model::WmsSettings;
use super::{ApiError, WmsState, ok_json};

pub fn routes() -> Router<WmsState> {
    Router::new()
        .route("/settings", get(get_settings).patch(update_settings))
        .route("/settings/packing-location", get(packing_location))
}

async fn get_settings(
    State(state): State<WmsState>,
) -> Result<Json<WmsSettings>, ApiError> {
    ok_json(state.service.get_settings())
}

async fn update_settings(
    State(state): State<WmsState>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<WmsSettings>, ApiError> {
    ok_json(state.service.update_settings(patch))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PackingLocationResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
}

/// Packing station suggested for new packing work.
async fn packing_location(
    State(state): State<WmsState>,
) -> Result<Json<PackingLocationResponse>, ApiError> {
    ok_json(
        state
            .service
            .default_packing_location()
            .map(|location| PackingLocationResponse { location }),
    )
}
