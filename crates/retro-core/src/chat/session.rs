//! Chat history and in-flight request bookkeeping.

use std::time::SystemTime;

use crate::net::{HistoryTurn, TurnRole};

/// Reply text when the model call fails.
const ERROR_PREFIX: &str = "ERROR: CONNECTION INTERRUPTED.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    /// Monotonic within a session.
    pub id: u64,
    pub role: Role,
    pub text: String,
    pub created_at: SystemTime,
    pub is_error: bool,
}

/// Claim on a pending remote call. Stale once the session is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

/// Append-only conversation with the remote model.
#[derive(Debug, Default)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    next_id: u64,
    generation: u64,
    pending: usize,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// A remote call is outstanding ("PROCESSING...").
    pub fn is_busy(&self) -> bool {
        self.pending > 0
    }

    fn push(&mut self, role: Role, text: String, is_error: bool) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id,
            role,
            text,
            created_at: SystemTime::now(),
            is_error,
        });
        id
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> u64 {
        self.push(Role::User, text.into(), false)
    }

    pub fn push_model(&mut self, text: impl Into<String>) -> u64 {
        self.push(Role::Model, text.into(), false)
    }

    /// Record a failed call as an error-flagged model message.
    pub fn push_error(&mut self, reason: &str) -> u64 {
        let text = if reason.is_empty() {
            ERROR_PREFIX.to_string()
        } else {
            format!("{ERROR_PREFIX} ({reason})")
        };
        self.push(Role::Model, text, true)
    }

    /// Record a local failure verbatim as an error-flagged model message.
    pub fn push_error_text(&mut self, text: impl Into<String>) -> u64 {
        self.push(Role::Model, text.into(), true)
    }

    /// Prior messages as remote history turns.
    pub fn history_turns(&self) -> Vec<HistoryTurn> {
        self.messages
            .iter()
            .map(|m| HistoryTurn {
                role: match m.role {
                    Role::Model => TurnRole::Model,
                    Role::User => TurnRole::User,
                },
                text: m.text.clone(),
            })
            .collect()
    }

    /// Mark a remote call as started.
    pub fn begin(&mut self) -> Ticket {
        self.pending += 1;
        Ticket {
            generation: self.generation,
        }
    }

    /// Mark a remote call as finished. `false` if the ticket is stale and
    /// its result must be dropped.
    pub fn finish(&mut self, ticket: Ticket) -> bool {
        if ticket.generation != self.generation {
            log::debug!("Dropping response for a cleared chat session");
            return false;
        }
        self.pending = self.pending.saturating_sub(1);
        true
    }

    /// Forget everything and invalidate outstanding tickets.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.pending = 0;
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic() {
        let mut s = ChatSession::new();
        let a = s.push_user("a");
        let b = s.push_model("b");
        let c = s.push_error("x");
        assert!(a < b && b < c);
    }

    #[test]
    fn ids_keep_growing_after_reset() {
        let mut s = ChatSession::new();
        let a = s.push_user("a");
        s.reset();
        let b = s.push_user("b");
        assert!(b > a);
        assert_eq!(s.messages().len(), 1);
    }

    #[test]
    fn history_tags_roles() {
        let mut s = ChatSession::new();
        s.push_user("hello");
        s.push_model("GREETINGS.");
        s.push_error("timeout");
        let turns = s.history_turns();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0].role, TurnRole::User);
        assert_eq!(turns[1].role, TurnRole::Model);
        assert_eq!(turns[2].role, TurnRole::Model);
        assert_eq!(turns[1].text, "GREETINGS.");
    }

    #[test]
    fn error_message_format() {
        let mut s = ChatSession::new();
        s.push_error("network error: TCP connect failed");
        let m = &s.messages()[0];
        assert!(m.is_error);
        assert_eq!(m.role, Role::Model);
        assert_eq!(
            m.text,
            "ERROR: CONNECTION INTERRUPTED. (network error: TCP connect failed)"
        );
        s.push_error("");
        assert_eq!(s.messages()[1].text, "ERROR: CONNECTION INTERRUPTED.");
    }

    #[test]
    fn busy_tracks_pending_calls() {
        let mut s = ChatSession::new();
        assert!(!s.is_busy());
        let t1 = s.begin();
        let t2 = s.begin();
        assert!(s.is_busy());
        assert!(s.finish(t1));
        assert!(s.is_busy());
        assert!(s.finish(t2));
        assert!(!s.is_busy());
    }

    #[test]
    fn reset_makes_tickets_stale() {
        let mut s = ChatSession::new();
        let t = s.begin();
        s.reset();
        assert!(!s.is_busy());
        assert!(!s.finish(t));
        let fresh = s.begin();
        assert!(s.finish(fresh));
    }
}
