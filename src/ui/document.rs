//! In-memory model of the host page the widget is bound to

use crate::events::{MessageEntry, Sender};
use crate::markdown::escape_text;
use crate::ui::typing::TypingIndicator;

/// Stable identifiers of the page elements the widget drives
pub mod ids {
    pub const CHAT_FORM: &str = "chat-form";
    pub const USER_INPUT: &str = "user-input";
    pub const SEND_BUTTON: &str = "send-btn";
    pub const CHAT_HISTORY: &str = "chat-history";
    pub const TYPING_INDICATOR: &str = "typing-indicator";
    pub const WELCOME_MESSAGE: &str = "welcome-message";
    pub const CHAT_AREA: &str = "chat-area";
}

/// Text input of the chat form
#[derive(Debug, Clone, Default)]
pub struct InputField {
    value: String,
    /// Byte offset, always on a char boundary
    cursor: usize,
    disabled: bool,
    focused: bool,
}

impl InputField {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn insert_char(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        self.value.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    /// Delete the char before the cursor
    pub fn backspace(&mut self) -> bool {
        match self.value[..self.cursor].chars().next_back() {
            Some(c) => {
                self.cursor -= c.len_utf8();
                self.value.remove(self.cursor);
                true
            }
            None => false,
        }
    }

    /// Delete the char under the cursor
    pub fn delete(&mut self) -> bool {
        if self.cursor < self.value.len() {
            self.value.remove(self.cursor);
            true
        } else {
            false
        }
    }

    pub fn move_left(&mut self) {
        if let Some(c) = self.value[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(c) = self.value[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.value.len();
    }
}

/// Content block of a rendered row
#[derive(Debug, Clone, PartialEq)]
pub enum RowContent {
    /// Shown verbatim, never interpreted as markup
    Text(String),
    /// Markup produced by the Markdown renderer
    Html(String),
}

/// One materialized message in the history container
#[derive(Debug, Clone)]
pub struct MessageRow {
    entry: MessageEntry,
    content: RowContent,
}

impl MessageRow {
    pub fn new(entry: MessageEntry, content: RowContent) -> Self {
        Self { entry, content }
    }

    pub fn entry(&self) -> &MessageEntry {
        &self.entry
    }

    pub fn sender(&self) -> Sender {
        self.entry.sender()
    }

    pub fn content(&self) -> &RowContent {
        &self.content
    }

    pub fn avatar_class(&self) -> &'static str {
        self.entry.sender().icon_class()
    }

    /// Markup of the row as it appears in the history container
    pub fn to_html(&self) -> String {
        let body = match &self.content {
            RowContent::Text(text) => escape_text(text),
            RowContent::Html(html) => html.clone(),
        };
        format!(
            r#"<div class="message {sender}"><div class="message-avatar"><i class="{icon}"></i></div><div class="message-content">{body}</div></div>"#,
            sender = self.sender(),
            icon = self.avatar_class(),
        )
    }
}

/// Append-only list of rendered rows
#[derive(Debug, Clone, Default)]
pub struct ConversationView {
    rows: Vec<MessageRow>,
}

impl ConversationView {
    pub fn push(&mut self, row: MessageRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[MessageRow] {
        &self.rows
    }

    pub fn entries(&self) -> impl Iterator<Item = &MessageEntry> {
        self.rows.iter().map(MessageRow::entry)
    }

    pub fn last(&self) -> Option<&MessageRow> {
        self.rows.last()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Scrollable container around the history, measured in rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChatArea {
    scroll_top: usize,
    scroll_height: usize,
}

impl ChatArea {
    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    pub fn scroll_height(&self) -> usize {
        self.scroll_height
    }

    pub fn is_at_bottom(&self) -> bool {
        self.scroll_top >= self.scroll_height
    }

    pub fn scroll_up(&mut self, rows: usize) {
        self.scroll_top = self.scroll_top.min(self.scroll_height).saturating_sub(rows);
    }

    pub fn scroll_down(&mut self, rows: usize) {
        self.scroll_top = (self.scroll_top + rows).min(self.scroll_height);
    }

    fn set_scroll_height(&mut self, height: usize) {
        self.scroll_height = height;
        self.scroll_top = self.scroll_top.min(height);
    }

    fn scroll_to_max(&mut self) {
        self.scroll_top = self.scroll_height;
    }
}

#[derive(Debug, Clone)]
struct Welcome {
    text: String,
    visible: bool,
}

/// The page surface: form controls, history, typing indicator, welcome
/// placeholder and the scrolling chat area.
#[derive(Debug, Clone, Default)]
pub struct ChatDocument {
    input: InputField,
    send_disabled: bool,
    history: ConversationView,
    typing: TypingIndicator,
    welcome: Option<Welcome>,
    chat_area: ChatArea,
}

impl ChatDocument {
    pub fn new(welcome: Option<String>) -> Self {
        let mut document = Self {
            welcome: welcome.map(|text| Welcome { text, visible: true }),
            ..Self::default()
        };
        document.measure();
        document
    }

    pub fn input(&self) -> &InputField {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputField {
        &mut self.input
    }

    pub fn is_send_disabled(&self) -> bool {
        self.send_disabled
    }

    /// Disable or enable both the input field and the send control.
    /// A disabled input loses focus; enabling does not give it back.
    pub fn set_controls_disabled(&mut self, disabled: bool) {
        self.input.set_disabled(disabled);
        if disabled {
            self.input.blur();
        }
        self.send_disabled = disabled;
    }

    /// Welcome text, while it is still displayed
    pub fn welcome(&self) -> Option<&str> {
        self.welcome
            .as_ref()
            .filter(|w| w.visible)
            .map(|w| w.text.as_str())
    }

    pub fn hide_welcome(&mut self) {
        if let Some(welcome) = self.welcome.as_mut() {
            welcome.visible = false;
            self.measure();
        }
    }

    pub fn history(&self) -> &ConversationView {
        &self.history
    }

    pub fn append_row(&mut self, row: MessageRow) {
        self.history.push(row);
        self.measure();
    }

    pub fn typing(&self) -> &TypingIndicator {
        &self.typing
    }

    /// Show the typing indicator and bring it into view
    pub fn show_typing(&mut self) {
        self.typing.show();
        self.measure();
        self.scroll_to_bottom();
    }

    pub fn hide_typing(&mut self) {
        self.typing.hide();
        self.measure();
    }

    pub fn chat_area(&self) -> &ChatArea {
        &self.chat_area
    }

    pub fn chat_area_mut(&mut self) -> &mut ChatArea {
        &mut self.chat_area
    }

    pub fn scroll_to_bottom(&mut self) {
        self.chat_area.scroll_to_max();
    }

    /// Markup of the history container
    pub fn history_html(&self) -> String {
        let rows: String = self.history.rows().iter().map(MessageRow::to_html).collect();
        format!(r#"<div id="{}">{rows}</div>"#, ids::CHAT_HISTORY)
    }

    fn measure(&mut self) {
        let height = self.history.len()
            + usize::from(self.typing.is_visible())
            + usize::from(self.welcome().is_some());
        self.chat_area.set_scroll_height(height);
    }
}
