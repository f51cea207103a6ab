//! Minimal chat client: posts user messages to a chat endpoint and renders
//! the Markdown replies.

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod markdown;
pub mod ui;
pub mod widget;

pub use api::{ChatApi, HttpChatApi};
pub use config::Config;
pub use error::ChatError;
pub use widget::{ChatWidget, SubmitOutcome};
