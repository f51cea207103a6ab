use crate::ui::document::InputField;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

/// Result of routing a key to the composer
#[derive(Debug, PartialEq, Eq)]
pub enum ComposerResult {
    /// Enter pressed: submit the form
    Submit,
    /// Scroll the chat area by rows (negative is up)
    Scroll(isize),
    Quit,
    None,
}

/// Route a key press to the input field.
///
/// Editing keys are ignored while the field is disabled; Enter always
/// reaches the form so the processing guard decides what happens.
pub fn handle_key(input: &mut InputField, key: KeyEvent) -> ComposerResult {
    if key.kind != KeyEventKind::Press {
        return ComposerResult::None;
    }

    match key.code {
        KeyCode::Esc => return ComposerResult::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return ComposerResult::Quit;
        }
        KeyCode::Enter => return ComposerResult::Submit,
        KeyCode::PageUp => return ComposerResult::Scroll(-1),
        KeyCode::PageDown => return ComposerResult::Scroll(1),
        _ => {}
    }

    if input.is_disabled() {
        return ComposerResult::None;
    }

    match key.code {
        KeyCode::Char(c) => input.insert_char(c),
        KeyCode::Backspace => {
            input.backspace();
        }
        KeyCode::Delete => {
            input.delete();
        }
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        _ => {}
    }

    ComposerResult::None
}

/// Insert pasted text, flattened to one line
pub fn handle_paste(input: &mut InputField, text: &str) {
    if input.is_disabled() {
        return;
    }
    let flattened = text.replace(['\r', '\n'], " ");
    input.insert_str(&flattened);
}

/// Terminal rendering of the chat form: input field plus send control
pub struct ComposerView<'a> {
    input: &'a InputField,
    send_disabled: bool,
    placeholder: &'a str,
}

impl<'a> ComposerView<'a> {
    pub fn new(input: &'a InputField, send_disabled: bool, placeholder: &'a str) -> Self {
        Self {
            input,
            send_disabled,
            placeholder,
        }
    }
}

impl Widget for ComposerView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.input.is_disabled() {
            Style::default().fg(Color::DarkGray)
        } else if self.input.is_focused() {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Gray)
        };
        let title = if self.send_disabled { "Waiting for reply" } else { "Message ⏎ Send" };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .style(border_style);

        let inner_area = block.inner(area);
        block.render(area, buf);

        let line = if self.input.value().is_empty() {
            Line::from(Span::styled(
                self.placeholder.to_string(),
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            let mut content = self.input.value().to_string();
            if self.input.is_focused() && !self.input.is_disabled() {
                content.insert(self.input.cursor().min(content.len()), '▌');
            }
            Line::from(Span::raw(content))
        };
        buf.set_line(inner_area.x, inner_area.y, &line, inner_area.width);
    }
}
