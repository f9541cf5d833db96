//! Chat handler: forwards a prompt upstream, buffered or streamed.
//!
//! Single endpoint `POST /api/chat`; the `stream` flag in the body picks the mode:
//! - buffered: one upstream round-trip, reply `{ "response": text }`
//! - streaming: upstream SSE relayed as NDJSON (`application/x-ndjson`),
//!   one upstream record per line; an upstream failure mid-stream aborts
//!   the body instead of ending it cleanly

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use chatrelay_core::models::chat::{ChatRequest, ChatResponse, NDJSON_CONTENT_TYPE};
use chatrelay_core::relay;
use tracing::{debug, info};

use crate::AppState;
use crate::error::{AppError, AppResult};

/// `POST /api/chat`: send one prompt upstream.
pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    if request.is_blank() {
        return Err(AppError::Validation(
            "messages must be a non-empty string".into(),
        ));
    }

    info!(
        streaming = request.streaming,
        prompt_len = request.prompt.len(),
        "chat request"
    );

    if request.streaming {
        stream_chat(&state, &request.prompt).await
    } else {
        buffered_chat(&state, &request.prompt)
            .await
            .map(IntoResponse::into_response)
    }
}

async fn buffered_chat(state: &AppState, prompt: &str) -> AppResult<Json<ChatResponse>> {
    let response = state.gemini.generate_text(prompt).await?;
    debug!(response_len = response.len(), "buffered reply ready");
    Ok(Json(ChatResponse { response }))
}

async fn stream_chat(state: &AppState, prompt: &str) -> AppResult<Response> {
    // Upstream rejections surface here, before any frame is written.
    let upstream = state.gemini.stream_generate(prompt).await?;

    let frames = relay::relay_frames(upstream);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, NDJSON_CONTENT_TYPE)
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(frames))
        .map_err(|e| AppError::Internal(format!("Response build failed: {e}")))
}
