use crate::error::ChatError;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Body posted to the chat endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

/// Successful reply from the chat endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Markdown text
    pub response: String,
}

/// Backend that turns one user message into one bot reply
#[allow(async_fn_in_trait)]
pub trait ChatApi {
    async fn send(&self, message: &str) -> Result<String, ChatError>;
}

/// Chat backend reached over HTTP
///
/// No request timeout is configured: a request only fails when the transport
/// gives up or the server answers with an error status.
#[derive(Debug, Clone)]
pub struct HttpChatApi {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpChatApi {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Use a preconfigured client (proxy, TLS or header settings)
    pub fn with_client(endpoint: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }
}

impl ChatApi for HttpChatApi {
    async fn send(&self, message: &str) -> Result<String, ChatError> {
        debug!(endpoint = %self.endpoint, "posting chat message");

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(&ChatRequest { message })
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        // The body is decoded before the status is looked at, so an
        // unreadable body is a transport failure whatever the status.
        let data: serde_json::Value = serde_json::from_slice(&body)?;

        if status.is_success() {
            let reply: ChatResponse = serde_json::from_value(data)?;
            Ok(reply.response)
        } else {
            let detail = data
                .get("error")
                .and_then(|e| e.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| data.to_string());
            Err(ChatError::Application {
                status: status.as_u16(),
                detail,
            })
        }
    }
}
