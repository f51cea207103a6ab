use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// Terminal events forwarded from the input reader thread
#[derive(Debug, Clone)]
pub enum TuiEvent {
    /// Key press event
    Key(crossterm::event::KeyEvent),

    /// Paste event
    Paste(String),

    /// Terminal resize
    Resize(u16, u16),
}

/// Author of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// Icon class used for the avatar in page markup
    pub fn icon_class(&self) -> &'static str {
        match self {
            Sender::User => "fa-solid fa-user",
            Sender::Bot => "fa-solid fa-robot",
        }
    }

    /// Glyph used for the avatar in the terminal
    pub fn glyph(&self) -> &'static str {
        match self {
            Sender::User => "👤",
            Sender::Bot => "🤖",
        }
    }
}

/// One turn of the conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEntry {
    content: String,
    sender: Sender,
    created_at: DateTime<Utc>,
}

impl MessageEntry {
    pub fn new(content: impl Into<String>, sender: Sender) -> Self {
        Self {
            content: content.into(),
            sender,
            created_at: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(content, Sender::User)
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(content, Sender::Bot)
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_names_match_css_classes() {
        assert_eq!(Sender::User.as_ref(), "user");
        assert_eq!(Sender::Bot.to_string(), "bot");
        assert_ne!(Sender::User.icon_class(), Sender::Bot.icon_class());
    }

    #[test]
    fn entry_constructors_set_sender() {
        let entry = MessageEntry::user("Hello");
        assert_eq!(entry.sender(), Sender::User);
        assert_eq!(entry.content(), "Hello");
        assert_eq!(MessageEntry::bot("Hi").sender(), Sender::Bot);
    }
}
