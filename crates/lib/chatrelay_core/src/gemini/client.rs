//! Gemini `generateContent` client.
//!
//! One POST per call, no retries. Non-2xx replies become
//! [`RelayError::Upstream`] carrying the status and the raw body.

use bytes::Bytes;
use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, error};

use super::config::{API_KEY_HEADER, GeminiConfig};
use crate::error::{RelayError, RelayResult};
use crate::models::chat::NO_RESPONSE_PLACEHOLDER;
use crate::models::gemini::{GenerateContentRequest, GenerateContentResponse};

/// Upstream client. Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Create a client around an existing reqwest client.
    pub fn with_client(client: Client, config: GeminiConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Buffered call: one round-trip, whole reply parsed at once.
    pub async fn generate(&self, prompt: &str) -> RelayResult<GenerateContentResponse> {
        let url = self.config.generate_url();
        debug!(url = %url, model = %self.config.model, "buffered generateContent");

        let response = self.post(&url, prompt).send().await?;
        let response = ensure_success(response).await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            error!(status, error = %e, "unparseable generateContent body");
            RelayError::Upstream { status, body }
        })
    }

    /// Buffered call reduced to the reply text, or the placeholder when the
    /// upstream produced none.
    pub async fn generate_text(&self, prompt: &str) -> RelayResult<String> {
        let reply = self.generate(prompt).await?;
        Ok(reply
            .first_text()
            .unwrap_or(NO_RESPONSE_PLACEHOLDER)
            .to_string())
    }

    /// Streaming call with SSE output.
    ///
    /// Fails before yielding anything if the upstream rejects the request;
    /// otherwise returns the raw body as it arrives.
    pub async fn stream_generate(
        &self,
        prompt: &str,
    ) -> RelayResult<BoxStream<'static, Result<Bytes, reqwest::Error>>> {
        let url = self.config.stream_url();
        debug!(url = %url, model = %self.config.model, "streaming streamGenerateContent");

        let response = self
            .post(&url, prompt)
            .query(&[("alt", "sse")])
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await?;
        let response = ensure_success(response).await?;

        Ok(response.bytes_stream().boxed())
    }

    fn post(&self, url: &str, prompt: &str) -> RequestBuilder {
        let mut builder = self
            .client
            .post(url)
            .json(&GenerateContentRequest::from_prompt(prompt));
        if let Some(key) = &self.config.api_key {
            builder = builder.header(API_KEY_HEADER, key);
        }
        builder
    }
}

async fn ensure_success(response: Response) -> RelayResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<no body>".to_string());
    error!(status = status.as_u16(), body = %body, "upstream rejected request");
    Err(RelayError::Upstream {
        status: status.as_u16(),
        body,
    })
}
