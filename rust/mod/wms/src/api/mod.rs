pub mod dashboard;
pub mod events;
pub mod pack;
pub mod pick;
pub mod scan;
pub mod settings;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use openwms_core::ServiceError;
use openwms_host::EventHub;

use crate::service::{Actor, WmsError, WmsService};

/// Shared application state.
#[derive(Clone)]
pub struct WmsState {
    pub service: Arc<WmsService>,
    pub hub: Arc<EventHub>,
}

/// Build the WMS API router.
pub fn router(service: Arc<WmsService>, hub: Arc<EventHub>) -> Router {
    let state = WmsState { service, hub };
    Router::new()
        .nest("/wms/v1", api_routes())
        .with_state(state)
}

fn api_routes() -> Router<WmsState> {
    Router::new()
        .merge(pick::routes())
        .merge(pack::routes())
        .merge(scan::routes())
        .merge(dashboard::routes())
        .merge(settings::routes())
        .merge(events::routes())
}

/// Standard API error response body.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: u16,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(serde_json::json!({
            "error": {
                "code": self.code,
                "message": self.message,
            }
        }));
        (status, body).into_response()
    }
}

impl From<WmsError> for ApiError {
    fn from(err: WmsError) -> Self {
        let err: ServiceError = err.into();
        ApiError {
            code: err.status_code().as_u16(),
            message: err.to_string(),
        }
    }
}

/// Wrap a Result<T, WmsError> into an API response.
pub(crate) fn ok_json<T: Serialize>(result: Result<T, WmsError>) -> Result<Json<T>, ApiError> {
    result.map(Json).map_err(ApiError::from)
}

/// Extract the acting identity from the host-edge headers.
///
/// The host platform authenticates the request and injects `x-wms-user`
/// (required) and `x-wms-session` (optional; one id per client tab —
/// falls back to the user id for single-session clients).
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get("x-wms-user")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if user.is_empty() {
            return Err(ApiError {
                code: 401,
                message: "missing x-wms-user header".into(),
            });
        }

        let session = parts
            .headers
            .get("x-wms-session")
            .and_then(|v| v.to_str().ok())
            .filter(|s| !s.is_empty())
            .unwrap_or(&user)
            .to_string();

        Ok(Actor { user, session })
    }
}
