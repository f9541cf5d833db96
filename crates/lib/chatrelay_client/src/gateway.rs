//! HTTP client for the chatrelay gateway.

use bytes::Bytes;
use chatrelay_core::models::chat::{ChatRequest, ChatResponse, ErrorResponse};
use chatrelay_core::routes;
use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use reqwest::{Client, Response};
use url::Url;

use crate::error::{ClientError, ClientResult};

pub const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    chat_url: Url,
}

impl GatewayClient {
    /// Create a client for the gateway rooted at `base_url`.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> ClientResult<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        let chat_url = base
            .join(routes::POST_API_CHAT)
            .map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        Ok(Self { client, chat_url })
    }

    pub fn chat_url(&self) -> &Url {
        &self.chat_url
    }

    /// Buffered chat: returns the gateway's `response` field.
    pub async fn chat(&self, prompt: &str) -> ClientResult<String> {
        let response = self.send(&ChatRequest::new(prompt, false)).await?;
        let body: ChatResponse = response.json().await?;
        Ok(body.response)
    }

    /// Streaming chat: returns the raw NDJSON body as it arrives.
    pub async fn chat_stream(
        &self,
        prompt: &str,
    ) -> ClientResult<BoxStream<'static, Result<Bytes, reqwest::Error>>> {
        let response = self.send(&ChatRequest::new(prompt, true)).await?;
        Ok(response.bytes_stream().boxed())
    }

    async fn send(&self, request: &ChatRequest) -> ClientResult<Response> {
        let response = self
            .client
            .post(self.chat_url.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(err) if err.details.is_empty() => err.error,
            Ok(err) => format!("{} ({})", err.error, err.details),
            Err(_) => body,
        };
        Err(ClientError::Gateway {
            status: status.as_u16(),
            message,
        })
    }
}
