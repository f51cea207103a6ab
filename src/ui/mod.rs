//! Page model and terminal front end

pub mod app;
pub mod composer;
pub mod document;
pub mod history;
pub mod markdown;
pub mod renderer;
pub mod typing;

pub use app::ChatApp;
pub use document::ChatDocument;
pub use renderer::Renderer;
pub use typing::TypingIndicator;
