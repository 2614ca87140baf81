//! # Transcript
//!
//! The ordered, in-memory record of every message in the active session.
//!
//! ```text
//! Transcript
//! └── messages: Vec<Message>   // append order == display order
//!     ├── role: Role           // user | assistant
//!     ├── content: String      // raw text (rendered later)
//!     ├── timestamp            // when it was appended
//!     ├── id                   // uuid v4
//!     └── is_error: bool       // synthesized failure reply
//! ```
//!
//! Messages are never edited or removed one at a time. The only way to drop
//! content is [`Transcript::clear`], which replaces the whole sequence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub id: Option<String>,
    #[serde(default)]
    pub is_error: bool,
}

impl Message {
    /// A message submitted by the user.
    pub fn user(content: impl Into<String>) -> Self {
        Self::stamped(Role::User, content.into(), false)
    }

    /// A reply from the backend.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::stamped(Role::Assistant, content.into(), false)
    }

    /// An assistant-role bubble standing in for a failed exchange.
    pub fn error(content: impl Into<String>) -> Self {
        Self::stamped(Role::Assistant, content.into(), true)
    }

    fn stamped(role: Role, content: String, is_error: bool) -> Self {
        Self {
            role,
            content,
            timestamp: Some(Utc::now()),
            id: Some(uuid::Uuid::new_v4().to_string()),
            is_error,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message. Messages are never edited or removed one by one.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Drops every message at once.
    pub fn clear(&mut self) {
        self.messages = Vec::new();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_preserves_insertion_order() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("first"));
        transcript.push(Message::assistant("second"));
        transcript.push(Message::user("third"));

        let contents: Vec<&str> = transcript.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[test]
    fn constructors_stamp_id_and_timestamp() {
        let msg = Message::user("hello");
        assert_eq!(msg.role, Role::User);
        assert!(msg.timestamp.is_some());
        assert!(msg.id.is_some());
        assert!(!msg.is_error);

        let other = Message::user("hello");
        assert_ne!(msg.id, other.id, "ids must be unique per message");
    }

    #[test]
    fn error_message_is_assistant_role() {
        let msg = Message::error("Sorry");
        assert_eq!(msg.role, Role::Assistant);
        assert!(msg.is_error);
    }

    #[test]
    fn clear_empties_everything() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("a"));
        transcript.push(Message::assistant("b"));
        transcript.clear();
        assert!(transcript.is_empty());
        assert_eq!(transcript.len(), 0);
        assert!(transcript.last().is_none());
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }
}
