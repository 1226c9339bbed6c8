//! Notes page log
//!
//! Newest-last list of free-text notes, each stamped with the local time of
//! day it was written (`9:05 PM`).

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::messages::NoteId;

/// Timestamp format shown next to each note
pub const NOTE_TIME_FORMAT: &str = "%-I:%M %p";

/// One written note
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique note identifier
    pub id: NoteId,
    /// Formatted time of day, e.g. `9:05 PM`
    pub timestamp: String,
    /// Note body as entered
    pub text: String,
}

/// Append-only collection of notes
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoteBook {
    notes: Vec<Note>,
}

impl NoteBook {
    /// Create an empty notebook
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a notebook holding earlier notes
    #[must_use]
    pub fn with_notes(notes: Vec<Note>) -> Self {
        Self { notes }
    }

    /// Append a note written at `at`
    ///
    /// Blank text is rejected and leaves the notebook unchanged.
    pub fn add_note<Tz>(&mut self, text: &str, at: DateTime<Tz>) -> Option<NoteId>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        if text.trim().is_empty() {
            return None;
        }
        let note = Note {
            id: NoteId::new(),
            timestamp: at.format(NOTE_TIME_FORMAT).to_string(),
            text: text.to_string(),
        };
        let id = note.id.clone();
        debug!(%id, timestamp = %note.timestamp, "Note added");
        self.notes.push(note);
        Some(id)
    }

    /// Append a note stamped with the current local time
    pub fn add_note_now(&mut self, text: &str) -> Option<NoteId> {
        self.add_note(text, Local::now())
    }

    /// All notes, oldest first
    #[must_use]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Number of notes
    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Whether there are no notes yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}
