//! AI terminal: conversation state and the input panel.

mod panel;
mod session;

pub use panel::{ChatPanel, HELP_TEXT, PanelAction, PanelCommand, parse_command};
pub use session::{ChatMessage, ChatSession, Role, Ticket};
