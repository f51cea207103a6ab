//! Markdown to styled terminal lines for bot rows

use crate::markdown::markdown_options;
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Parser, Tag, TagEnd};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use std::mem;

/// Render Markdown source into terminal lines (unwrapped)
pub fn to_lines(source: &str) -> Vec<Line<'static>> {
    let mut builder = LineBuilder::default();
    for event in Parser::new_ext(source, markdown_options()) {
        builder.handle(event);
    }
    builder.finish()
}

#[derive(Default)]
struct LineBuilder {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    styles: Vec<Style>,
    /// Next number for ordered lists, `None` for bullets
    lists: Vec<Option<u64>>,
    pending_bullet: Option<String>,
    link_targets: Vec<String>,
    quote_depth: usize,
    in_code_block: bool,
}

impl LineBuilder {
    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if self.in_code_block {
                    self.code_block_text(&text);
                } else {
                    self.push_span(text.into_string(), self.style());
                }
            }
            Event::Code(code) => {
                self.push_span(code.into_string(), Style::default().fg(Color::Yellow));
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                self.push_span(html.into_string(), Style::default().fg(Color::DarkGray));
            }
            Event::SoftBreak => self.push_span(" ".to_string(), self.style()),
            Event::HardBreak => self.flush_line(),
            Event::Rule => {
                self.flush_line();
                self.lines.push(Line::from(Span::styled(
                    "─".repeat(24),
                    Style::default().fg(Color::DarkGray),
                )));
                self.push_blank();
            }
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.push_span(marker.to_string(), Style::default().fg(Color::Cyan));
            }
            Event::FootnoteReference(name) => {
                self.push_span(format!("[^{name}]"), Style::default().fg(Color::DarkGray));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush_line();
                let color = if level == HeadingLevel::H1 { Color::Magenta } else { Color::Cyan };
                self.styles.push(Style::default().fg(color).add_modifier(Modifier::BOLD));
            }
            Tag::BlockQuote => {
                self.flush_line();
                self.quote_depth += 1;
            }
            Tag::CodeBlock(kind) => {
                self.flush_line();
                self.in_code_block = true;
                if let CodeBlockKind::Fenced(lang) = kind {
                    if !lang.is_empty() {
                        self.lines.push(Line::from(Span::styled(
                            format!("  {lang}"),
                            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                        )));
                    }
                }
            }
            Tag::List(start) => {
                self.flush_line();
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush_line();
                let depth = self.lists.len().saturating_sub(1);
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.pending_bullet = Some(format!("{}{}", "  ".repeat(depth), marker));
            }
            Tag::Emphasis => self.push_modifier(Modifier::ITALIC),
            Tag::Strong => self.push_modifier(Modifier::BOLD),
            Tag::Strikethrough => self.push_modifier(Modifier::CROSSED_OUT),
            Tag::Link { dest_url, .. } => {
                self.link_targets.push(dest_url.into_string());
                let style = self.style().fg(Color::Blue).add_modifier(Modifier::UNDERLINED);
                self.styles.push(style);
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush_line();
                if self.lists.is_empty() {
                    self.push_blank();
                }
            }
            TagEnd::Heading(_) => {
                self.styles.pop();
                self.flush_line();
                self.push_blank();
            }
            TagEnd::BlockQuote => {
                self.flush_line();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.push_blank();
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.push_blank();
            }
            TagEnd::List(_) => {
                self.flush_line();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.push_blank();
                }
            }
            TagEnd::Item => self.flush_line(),
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.styles.pop();
            }
            TagEnd::Link => {
                self.styles.pop();
                if let Some(url) = self.link_targets.pop() {
                    self.push_span(format!(" ({url})"), Style::default().fg(Color::DarkGray));
                }
            }
            _ => {}
        }
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn push_modifier(&mut self, modifier: Modifier) {
        let style = self.style().add_modifier(modifier);
        self.styles.push(style);
    }

    fn push_span(&mut self, content: String, style: Style) {
        if self.current.is_empty() {
            if self.quote_depth > 0 {
                self.current.push(Span::styled(
                    "│ ".repeat(self.quote_depth),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            if let Some(bullet) = self.pending_bullet.take() {
                self.current.push(Span::styled(bullet, Style::default().fg(Color::Cyan)));
            }
        }
        self.current.push(Span::styled(content, style));
    }

    fn code_block_text(&mut self, text: &str) {
        let style = Style::default().fg(Color::Yellow);
        for line in text.lines() {
            self.lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(line.to_string(), style),
            ]));
        }
    }

    fn flush_line(&mut self) {
        if !self.current.is_empty() {
            let spans = mem::take(&mut self.current);
            self.lines.push(Line::from(spans));
        }
    }

    fn push_blank(&mut self) {
        let last_is_blank = self.lines.last().map_or(true, |l| l.spans.is_empty());
        if !last_is_blank {
            self.lines.push(Line::default());
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush_line();
        while self.lines.last().is_some_and(|l| l.spans.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_strong_text_is_bold() {
        let lines = to_lines("Hi **there**");
        assert_eq!(lines.len(), 1);
        assert_eq!(text(&lines[0]), "Hi there");

        let bold = lines[0].spans.iter().find(|s| s.content == "there").unwrap();
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_lists_get_markers() {
        let lines = to_lines("- one\n- two\n\n1. first\n2. second");
        let rendered: Vec<String> = lines.iter().map(text).collect();
        assert_eq!(rendered, vec!["• one", "• two", "", "1. first", "2. second"]);
    }

    #[test]
    fn test_code_block_lines_are_indented() {
        let lines = to_lines("```rust\nfn main() {}\n```");
        let rendered: Vec<String> = lines.iter().map(text).collect();
        assert_eq!(rendered, vec!["  rust", "  fn main() {}"]);
    }

    #[test]
    fn test_links_show_target() {
        let lines = to_lines("[docs](https://example.com)");
        assert_eq!(text(&lines[0]), "docs (https://example.com)");
    }
}
