use thiserror::Error;

/// Failure of a single chat request
#[derive(Debug, Error)]
pub enum ChatError {
    /// Backend answered with a non-success status and a JSON payload
    #[error("chat endpoint returned {status}: {detail}")]
    Application { status: u16, detail: String },

    /// Request could not complete, or the reply body could not be decoded
    #[error("chat request failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::Transport(format!("invalid response body: {err}"))
    }
}
