use crate::events::{MessageEntry, Sender};
use crate::markdown;
use crate::ui::document::{ChatDocument, MessageRow, RowContent};

/// Materializes message entries into the history container
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Build the row for an entry. Bot content is Markdown, user content is
    /// kept as literal text.
    pub fn build_row(&self, entry: MessageEntry) -> MessageRow {
        let content = match entry.sender() {
            Sender::Bot => RowContent::Html(markdown::to_html(entry.content())),
            Sender::User => RowContent::Text(entry.content().to_string()),
        };
        MessageRow::new(entry, content)
    }

    /// Append an entry to the history and keep the newest row in view
    pub fn render(&self, document: &mut ChatDocument, entry: MessageEntry) {
        let row = self.build_row(entry);
        document.append_row(row);
        document.scroll_to_bottom();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_markup_stays_literal() {
        let mut document = ChatDocument::new(None);
        let payload = "<img src=x onerror=alert(1)>";
        Renderer::new().render(&mut document, MessageEntry::user(payload));

        let row = document.history().last().unwrap();
        assert_eq!(row.content(), &RowContent::Text(payload.to_string()));
        let html = document.history_html();
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
    }

    #[test]
    fn test_bot_markdown_becomes_html() {
        let mut document = ChatDocument::new(None);
        Renderer::new().render(&mut document, MessageEntry::bot("**bold** and `code`"));

        match document.history().last().unwrap().content() {
            RowContent::Html(html) => {
                assert!(html.contains("<strong>bold</strong>"));
                assert!(html.contains("<code>code</code>"));
            }
            other => panic!("expected html content, got {other:?}"),
        }
        assert!(document.history_html().contains("fa-solid fa-robot"));
    }

    #[test]
    fn test_every_append_scrolls_to_bottom() {
        let mut document = ChatDocument::new(None);
        let renderer = Renderer::new();

        renderer.render(&mut document, MessageEntry::user("one"));
        document.chat_area_mut().scroll_up(1);
        renderer.render(&mut document, MessageEntry::bot("two"));

        assert_eq!(document.history().len(), 2);
        assert!(document.chat_area().is_at_bottom());
        assert_eq!(document.chat_area().scroll_top(), 2);
    }
}
