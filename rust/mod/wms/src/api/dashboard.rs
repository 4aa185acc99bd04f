use axum::{Json, Router, extract::State, routing::get};

use crate::service::dashboard::DashboardData;
use super::{ApiError, WmsState, ok_json};

pub fn routes() -> Router<WmsState> {
    Router::new().route("/dashboard", get(dashboard))
}

async fn dashboard(State(state): State<WmsState>) -> Result<Json<DashboardData>, ApiError> {
    ok_json(state.service.dashboard())
}
