use crate::events::Sender;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Shown while a bot reply is awaited
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypingIndicator {
    visible: bool,
}

impl TypingIndicator {
    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Terminal rendering of the indicator; `frame` drives the dot animation
pub struct TypingIndicatorView {
    indicator: TypingIndicator,
    frame: u64,
}

impl TypingIndicatorView {
    pub fn new(indicator: TypingIndicator, frame: u64) -> Self {
        Self { indicator, frame }
    }

    fn dots(&self) -> &'static str {
        match self.frame % 4 {
            0 => ".",
            1 => "..",
            2 => "...",
            _ => "   ",
        }
    }
}

impl Widget for TypingIndicatorView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.indicator.is_visible() || area.height == 0 {
            return;
        }

        let line = Line::from(vec![
            Span::styled(format!("{} ", Sender::Bot.glyph()), Style::default().fg(Color::Green)),
            Span::styled("typing", Style::default().fg(Color::Green)),
            Span::styled(self.dots(), Style::default().fg(Color::Yellow)),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
