//! # chatrelay_api
//!
//! HTTP gateway library for chatrelay.

pub mod config;
pub mod error;
pub mod handlers;

use axum::Router;
use axum::routing::{get, post};
use chatrelay_core::gemini::GeminiClient;
use chatrelay_core::routes;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ApiConfig;
use crate::handlers::{chat, health};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: ApiConfig,
    /// Upstream client built from `config.gemini`.
    pub gemini: GeminiClient,
}

impl AppState {
    pub fn new(config: ApiConfig) -> Self {
        let gemini = GeminiClient::new(config.gemini.clone());
        Self { config, gemini }
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(routes::GET_API_HEALTH, get(health::health_handler))
        .route(routes::POST_API_CHAT, post(chat::chat_handler))
        .layer(cors)
        .with_state(state)
}
