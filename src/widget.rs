//! Submission controller: gates and sequences one request/response cycle per
//! user submission.

use crate::api::ChatApi;
use crate::error::ChatError;
use crate::events::MessageEntry;
use crate::ui::document::ChatDocument;
use crate::ui::renderer::Renderer;
use std::cell::{Cell, Ref, RefCell, RefMut};
use tracing::{debug, error, info};

/// Bot entry shown when the backend answers with an error status
pub const HTTP_ERROR_FALLBACK: &str = "Sorry, something went wrong. Please try again.";

/// Bot entry shown when the request could not complete
pub const NETWORK_ERROR_FALLBACK: &str = "Network error. Please check your connection.";

/// Why a submission was dropped without any effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Input was empty after trimming
    Empty,
    /// A request is already in flight
    Busy,
}

/// Result of one call to [`ChatWidget::submit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Skipped(SkipReason),
    /// Bot reply rendered
    Replied,
    /// Backend returned an error status; fallback rendered
    ApplicationError,
    /// Request failed in transport; fallback rendered
    TransportError,
}

impl SubmitOutcome {
    /// True when a fallback bot entry was rendered instead of a reply
    pub fn is_failure(&self) -> bool {
        matches!(self, SubmitOutcome::ApplicationError | SubmitOutcome::TransportError)
    }
}

/// Chat controller bound to a document and a chat backend.
///
/// All methods take `&self`: the widget lives on a single task and a pending
/// submission keeps a shared borrow of it while other events are handled.
/// Document borrows are never held across an await.
pub struct ChatWidget<A> {
    api: A,
    document: RefCell<ChatDocument>,
    renderer: Renderer,
    processing: Cell<bool>,
}

impl<A> ChatWidget<A> {
    /// True exactly while a request is in flight
    pub fn is_processing(&self) -> bool {
        self.processing.get()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn document(&self) -> Ref<'_, ChatDocument> {
        self.document.borrow()
    }

    pub fn document_mut(&self) -> RefMut<'_, ChatDocument> {
        self.document.borrow_mut()
    }

    /// Restore interactive state after a request, whatever its outcome
    fn release(&self) {
        self.processing.set(false);
        let mut document = self.document.borrow_mut();
        // Only still visible when the submission was dropped mid-request
        document.hide_typing();
        document.set_controls_disabled(false);
        document.input_mut().focus();
    }
}

impl<A: ChatApi> ChatWidget<A> {
    pub fn new(api: A, mut document: ChatDocument) -> Self {
        document.input_mut().focus();
        Self {
            api,
            document: RefCell::new(document),
            renderer: Renderer::new(),
            processing: Cell::new(false),
        }
    }

    /// Validate a submission and apply its synchronous UI effects.
    ///
    /// On success the processing guard is held by the returned
    /// [`Submission`] until it is completed or dropped.
    pub fn accept(&self, raw: &str) -> Result<Submission<'_, A>, SkipReason> {
        let message = raw.trim();
        if message.is_empty() {
            debug!("ignoring empty submission");
            return Err(SkipReason::Empty);
        }
        if self.processing.get() {
            debug!("ignoring submission while a request is in flight");
            return Err(SkipReason::Busy);
        }

        self.processing.set(true);
        {
            let mut document = self.document.borrow_mut();
            document.set_controls_disabled(true);
            document.input_mut().clear();
            document.hide_welcome();
            self.renderer.render(&mut document, MessageEntry::user(message));
            document.show_typing();
        }
        info!(chars = message.chars().count(), "submitting chat message");

        Ok(Submission {
            widget: self,
            message: message.to_string(),
        })
    }

    /// Accept whatever is currently typed in the input field
    pub fn accept_form(&self) -> Result<Submission<'_, A>, SkipReason> {
        let raw = self.document.borrow().input().value().to_string();
        self.accept(&raw)
    }

    /// Run one full request/response cycle for `raw`
    pub async fn submit(&self, raw: &str) -> SubmitOutcome {
        match self.accept(raw) {
            Ok(submission) => submission.complete().await,
            Err(reason) => SubmitOutcome::Skipped(reason),
        }
    }

    /// Submit the form: the input field's current value
    pub async fn submit_form(&self) -> SubmitOutcome {
        match self.accept_form() {
            Ok(submission) => submission.complete().await,
            Err(reason) => SubmitOutcome::Skipped(reason),
        }
    }

    fn finish(&self, result: Result<String, ChatError>) -> SubmitOutcome {
        let mut document = self.document.borrow_mut();
        document.hide_typing();

        match result {
            Ok(reply) => {
                self.renderer.render(&mut document, MessageEntry::bot(reply));
                SubmitOutcome::Replied
            }
            Err(ChatError::Application { status, detail }) => {
                error!(status, error = %detail, "chat endpoint returned an error");
                self.renderer
                    .render(&mut document, MessageEntry::bot(HTTP_ERROR_FALLBACK));
                SubmitOutcome::ApplicationError
            }
            Err(ChatError::Transport(reason)) => {
                error!(error = %reason, "network error");
                self.renderer
                    .render(&mut document, MessageEntry::bot(NETWORK_ERROR_FALLBACK));
                SubmitOutcome::TransportError
            }
        }
    }
}

/// An accepted submission holding the processing guard.
///
/// Dropping it, completed or not, releases the guard and re-enables the
/// input field and send control.
pub struct Submission<'a, A> {
    widget: &'a ChatWidget<A>,
    message: String,
}

impl<A> Submission<'_, A> {
    /// Trimmed text that will be posted
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl<A: ChatApi> Submission<'_, A> {
    /// Post the message and render the reply or a fallback entry
    pub async fn complete(self) -> SubmitOutcome {
        let result = self.widget.api.send(&self.message).await;
        self.widget.finish(result)
    }
}

impl<A> Drop for Submission<'_, A> {
    fn drop(&mut self) {
        self.widget.release();
    }
}
