use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::Deserialize;

use crate::service::scan::{BinLocation, ScanResult, StockCheck};
use super::{ApiError, WmsState, ok_json};

pub fn routes() -> Router<WmsState> {
    Router::new()
        .route("/scan", post(scan))
        .route("/items/{item_code}/location", get(item_location))
        .route("/stock-entries/{id}/verify", post(verify_stock_entry))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScanBody {
    barcode: String,
}

async fn scan(
    State(state): State<WmsState>,
    Json(body): Json<ScanBody>,
) -> Result<Json<ScanResult>, ApiError> {
    ok_json(state.service.scan_barcode(&body.barcode))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocationQuery {
    warehouse: String,
}

async fn item_location(
    State(state): State<WmsState>,
    Path(item_code): Path<String>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<Option<BinLocation>>, ApiError> {
    ok_json(state.service.item_location(&item_code, &query.warehouse))
}

async fn verify_stock_entry(
    State(state): State<WmsState>,
    Path(id): Path<String>,
) -> Result<Json<StockCheck>, ApiError> {
    ok_json(state.service.verify_stock_entry(&id))
}
