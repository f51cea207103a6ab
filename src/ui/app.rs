//! Terminal front end driving a [`ChatWidget`]

use crate::api::ChatApi;
use crate::config::UiConfig;
use crate::events::TuiEvent;
use crate::ui::composer::{self, ComposerResult, ComposerView};
use crate::ui::history::HistoryView;
use crate::ui::typing::TypingIndicatorView;
use crate::widget::{ChatWidget, SubmitOutcome};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::future::{LocalBoxFuture, OptionFuture};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

type ChatTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Interactive chat in the terminal
pub struct ChatApp<A> {
    widget: ChatWidget<A>,
    ui: UiConfig,
}

impl<A: ChatApi> ChatApp<A> {
    pub fn new(widget: ChatWidget<A>, ui: UiConfig) -> Self {
        Self { widget, ui }
    }

    /// Take over the terminal until the user quits
    pub async fn run(&self) -> Result<()> {
        let mut terminal = setup_terminal()?;
        info!("chat session started");
        let result = self.event_loop(&mut terminal).await;
        restore_terminal(&mut terminal)?;
        info!("chat session ended");
        result
    }

    async fn event_loop(&self, terminal: &mut ChatTerminal) -> Result<()> {
        let mut events = spawn_event_reader();
        let mut ticker = tokio::time::interval(Duration::from_millis(300));
        let mut frame: u64 = 0;
        let mut pending: Option<LocalBoxFuture<'_, SubmitOutcome>> = None;

        loop {
            terminal
                .draw(|f| self.draw(f, frame))
                .context("Failed to draw frame")?;

            tokio::select! {
                Some(outcome) = OptionFuture::from(pending.as_mut()), if pending.is_some() => {
                    debug!(?outcome, "submission resolved");
                    pending = None;
                }
                _ = ticker.tick() => {
                    frame = frame.wrapping_add(1);
                }
                event = events.recv() => {
                    let Some(event) = event else {
                        warn!("terminal event reader stopped");
                        break;
                    };
                    match event {
                        TuiEvent::Key(key) => {
                            let result = composer::handle_key(self.widget.document_mut().input_mut(), key);
                            match result {
                                ComposerResult::Submit => match self.widget.accept_form() {
                                    Ok(submission) => pending = Some(Box::pin(submission.complete())),
                                    Err(reason) => debug!(?reason, "submission skipped"),
                                },
                                ComposerResult::Scroll(rows) => self.scroll(rows),
                                ComposerResult::Quit => break,
                                ComposerResult::None => {}
                            }
                        }
                        TuiEvent::Paste(text) => {
                            composer::handle_paste(self.widget.document_mut().input_mut(), &text);
                        }
                        TuiEvent::Resize(..) => {}
                    }
                }
            }
        }

        Ok(())
    }

    fn scroll(&self, rows: isize) {
        let mut document = self.widget.document_mut();
        let area = document.chat_area_mut();
        if rows < 0 {
            area.scroll_up(rows.unsigned_abs());
        } else {
            area.scroll_down(rows.unsigned_abs());
        }
    }

    fn draw(&self, frame: &mut Frame, tick: u64) {
        let document = self.widget.document();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),    // History
                Constraint::Length(1), // Typing indicator
                Constraint::Length(3), // Composer
            ])
            .split(frame.size());

        frame.render_widget(HistoryView::new(&document, self.ui.show_timestamps), chunks[0]);
        frame.render_widget(TypingIndicatorView::new(*document.typing(), tick), chunks[1]);
        frame.render_widget(
            ComposerView::new(
                document.input(),
                document.is_send_disabled(),
                &self.ui.input_placeholder,
            ),
            chunks[2],
        );
    }
}

/// Forward crossterm events from a blocking reader thread
fn spawn_event_reader() -> mpsc::UnboundedReceiver<TuiEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || loop {
        let event = match event::read() {
            Ok(event) => event,
            Err(err) => {
                warn!(error = %err, "failed to read terminal event");
                break;
            }
        };

        let forwarded = match event {
            Event::Key(key) => TuiEvent::Key(key),
            Event::Paste(text) => TuiEvent::Paste(text),
            Event::Resize(width, height) => TuiEvent::Resize(width, height),
            _ => continue,
        };

        if tx.send(forwarded).is_err() {
            break;
        }
    });

    rx
}

fn setup_terminal() -> Result<ChatTerminal> {
    terminal::enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)
        .context("Failed to enter alternate screen")?;
    Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")
}

fn restore_terminal(terminal: &mut ChatTerminal) -> Result<()> {
    terminal::disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableBracketedPaste)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}
