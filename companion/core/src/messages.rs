//! Chat Message Types
//!
//! Identifiers and turns shared by the conversation simulator and surfaces.

use serde::{Deserialize, Serialize};

/// Chat turn identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnId(pub String);

impl TurnId {
    /// Generate a new unique turn ID
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        Self(format!("turn_{id}"))
    }
}

impl Default for TurnId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TurnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Note identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteId(pub String);

impl NoteId {
    /// Generate a new unique note ID
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        Self(format!("note_{id}"))
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who produced a chat turn
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    /// The person using the app
    User,
    /// The simulated assistant
    Assistant,
}

/// One entry in the chat log
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Unique turn identifier
    pub id: TurnId,
    /// Who produced it
    pub speaker: Speaker,
    /// Turn text; grows word by word while an assistant reply streams
    pub text: String,
}

impl ChatTurn {
    /// Create a user turn
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: TurnId::new(),
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    /// Create an assistant turn
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            id: TurnId::new(),
            speaker: Speaker::Assistant,
            text: text.into(),
        }
    }

    /// Whether the user produced this turn
    #[must_use]
    pub fn is_user(&self) -> bool {
        self.speaker == Speaker::User
    }
}
