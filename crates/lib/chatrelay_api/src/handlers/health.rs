//! Health endpoint.

use axum::Json;
use axum::extract::State;
use chatrelay_core::models::chat::HealthResponse;

use crate::AppState;

/// `GET /api/health`: reports version, model and whether an API key is configured.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let gemini = state.gemini.config();
    Json(HealthResponse {
        status: "ok".into(),
        version: chatrelay_core::version().to_string(),
        model: gemini.model.clone(),
        upstream_configured: gemini.has_api_key(),
    })
}
