//! Conversation transcript
//!
//! Append-only record of completed question/answer exchanges. Tool traffic
//! inside a turn is never stored here.

use crate::core::Message;

/// Ordered user/assistant message pairs for one conversation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Create an empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed exchange
    pub fn record_exchange(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.messages.push(Message::user(question));
        self.messages.push(Message::assistant(answer));
    }

    /// All messages in order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages (twice the number of exchanges)
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of completed exchanges
    pub fn exchanges(&self) -> usize {
        self.messages.len() / 2
    }

    /// Get the last assistant message
    pub fn last_assistant_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.is_assistant())
    }
}
