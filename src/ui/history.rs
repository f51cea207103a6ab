//! Conversation history display component

use crate::events::Sender;
use crate::ui::document::{ChatDocument, MessageRow};
use crate::ui::markdown;
use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};
use std::mem;

/// Terminal view of the history container
pub struct HistoryView<'a> {
    document: &'a ChatDocument,
    show_timestamps: bool,
}

impl<'a> HistoryView<'a> {
    pub fn new(document: &'a ChatDocument, show_timestamps: bool) -> Self {
        Self {
            document,
            show_timestamps,
        }
    }

    /// All lines of the history wrapped to `width`, with the index of the
    /// first line of each row
    pub fn lines(&self, width: u16) -> (Vec<Line<'static>>, Vec<usize>) {
        let mut lines = Vec::new();
        let mut row_starts = Vec::with_capacity(self.document.history().len());

        for row in self.document.history().rows() {
            row_starts.push(lines.len());
            lines.extend(self.render_row(row, width));
            // spacing between messages
            lines.push(Line::default());
        }

        (lines, row_starts)
    }

    fn render_row(&self, row: &MessageRow, width: u16) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        let sender = row.sender();

        let mut header = vec![Span::styled(
            format!("{} {}", sender.glyph(), display_name(sender)),
            Style::default().fg(header_color(sender)),
        )];
        if self.show_timestamps {
            let timestamp = row.entry().created_at().with_timezone(&Local);
            header.push(Span::styled(
                format!(" {}", timestamp.format("%H:%M:%S")),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from(header));

        let content_width = usize::from(width.saturating_sub(2));
        let content_lines = match sender {
            Sender::Bot => markdown::to_lines(row.entry().content()),
            Sender::User => row
                .entry()
                .content()
                .lines()
                .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::Blue))))
                .collect(),
        };

        for line in content_lines {
            for wrapped in wrap_line(line, content_width) {
                let mut spans = vec![Span::raw("  ")];
                spans.extend(wrapped.spans);
                lines.push(Line::from(spans));
            }
        }

        lines
    }

    fn welcome_lines(text: &str) -> Vec<Line<'static>> {
        vec![
            Line::from(Span::styled(text.to_string(), Style::default().fg(Color::Green))),
            Line::default(),
            Line::from(Span::styled(
                "Press Enter to send, Esc to quit.",
                Style::default().fg(Color::DarkGray),
            )),
        ]
    }
}

impl Widget for HistoryView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("💬 Conversation");

        let inner_area = block.inner(area);
        block.render(area, buf);

        // First line of each element the chat area counts in its scroll
        // height: welcome, then history rows. The typing row is drawn below
        // the history and has no line here.
        let mut all_lines = Vec::new();
        let mut element_starts = Vec::new();
        if let Some(text) = self.document.welcome() {
            element_starts.push(0);
            all_lines.extend(Self::welcome_lines(text));
            all_lines.push(Line::default());
        }
        let offset = all_lines.len();
        let (lines, row_starts) = self.lines(inner_area.width);
        element_starts.extend(row_starts.into_iter().map(|s| s + offset));
        all_lines.extend(lines);

        let height = inner_area.height as usize;
        let total = all_lines.len();
        let chat_area = self.document.chat_area();

        // Scrolled up: the element at `scroll_top` is the first one shown.
        // Otherwise, or past the last history row, the tail is shown.
        let bottom = total.saturating_sub(height);
        let start = if chat_area.is_at_bottom() {
            bottom
        } else {
            element_starts
                .get(chat_area.scroll_top())
                .map_or(bottom, |&s| s.min(bottom))
        };

        for (i, line) in all_lines.iter().skip(start).take(height).enumerate() {
            buf.set_line(inner_area.x, inner_area.y + i as u16, line, inner_area.width);
        }
    }
}

fn display_name(sender: Sender) -> &'static str {
    match sender {
        Sender::User => "You",
        Sender::Bot => "Bot",
    }
}

fn header_color(sender: Sender) -> Color {
    match sender {
        Sender::User => Color::Blue,
        Sender::Bot => Color::Green,
    }
}

/// Word-wrap a styled line to fit within `width` columns
fn wrap_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    if width == 0 || line.width() <= width {
        return vec![line];
    }

    let mut out = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut current_width = 0;

    for span in line.spans {
        let style = span.style;
        for word in span.content.split_inclusive(' ') {
            let piece = Span::styled(word.to_string(), style);
            let piece_width = piece.width();
            if current_width + piece_width > width && current_width > 0 {
                out.push(Line::from(mem::take(&mut current)));
                current_width = 0;
            }
            current_width += piece_width;
            current.push(piece);
        }
    }

    if !current.is_empty() {
        out.push(Line::from(current));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MessageEntry;
    use crate::ui::renderer::Renderer;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn buffer_text(buf: &Buffer, area: Rect) -> String {
        let mut out = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                out.push_str(buf.get(x, y).symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_wrap_line_breaks_on_words() {
        let wrapped = wrap_line(Line::from("alpha beta gamma"), 11);
        let rendered: Vec<String> = wrapped.iter().map(text).collect();
        assert_eq!(rendered, vec!["alpha beta ", "gamma"]);
    }

    #[test]
    fn test_rows_have_header_and_indented_content() {
        let mut document = ChatDocument::new(None);
        let renderer = Renderer::new();
        renderer.render(&mut document, MessageEntry::user("Hello"));
        renderer.render(&mut document, MessageEntry::bot("Hi **there**"));

        let view = HistoryView::new(&document, false);
        let (lines, row_starts) = view.lines(40);
        let rendered: Vec<String> = lines.iter().map(text).collect();

        assert_eq!(row_starts, vec![0, 3]);
        assert_eq!(rendered[0], "👤 You");
        assert_eq!(rendered[1], "  Hello");
        assert_eq!(rendered[3], "🤖 Bot");
        assert_eq!(rendered[4], "  Hi there");
    }

    #[test]
    fn test_welcome_shown_until_hidden() {
        let document = ChatDocument::new(Some("Ask me anything".to_string()));
        let area = Rect::new(0, 0, 40, 8);
        let mut buf = Buffer::empty(area);
        HistoryView::new(&document, false).render(area, &mut buf);
        assert!(buffer_text(&buf, area).contains("Ask me anything"));
    }

    #[test]
    fn test_newest_row_visible_when_at_bottom() {
        let mut document = ChatDocument::new(None);
        let renderer = Renderer::new();
        for i in 0..10 {
            renderer.render(&mut document, MessageEntry::user(format!("message {i}")));
        }

        let area = Rect::new(0, 0, 30, 6);
        let mut buf = Buffer::empty(area);
        HistoryView::new(&document, false).render(area, &mut buf);
        let screen = buffer_text(&buf, area);
        assert!(screen.contains("message 9"));
        assert!(!screen.contains("message 0"));
    }

    #[test]
    fn test_scrolling_past_typing_row_keeps_tail_in_view() {
        let mut document = ChatDocument::new(None);
        let renderer = Renderer::new();
        for i in 0..10 {
            renderer.render(&mut document, MessageEntry::user(format!("message {i}")));
        }
        document.show_typing();
        document.chat_area_mut().scroll_up(1);
        assert_eq!(document.chat_area().scroll_top(), 10);

        let area = Rect::new(0, 0, 30, 6);
        let mut buf = Buffer::empty(area);
        HistoryView::new(&document, false).render(area, &mut buf);
        let screen = buffer_text(&buf, area);
        assert!(screen.contains("message 9"));
        assert!(!screen.contains("message 0"));

        document.chat_area_mut().scroll_up(3);
        let mut buf = Buffer::empty(area);
        HistoryView::new(&document, false).render(area, &mut buf);
        let screen = buffer_text(&buf, area);
        assert!(screen.contains("message 7"));
        assert!(!screen.contains("message 9"));
    }
}
