//! Router for the status API

use axum::{Router, extract::State, response::Json, routing::get};
use chrono::Utc;

use super::public::StatusResponse;
use crate::api::SharedState;

/// Report server health, version, and uptime
async fn status_handler(State(state): State<SharedState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}

/// Create the status router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", get(status_handler))
}
