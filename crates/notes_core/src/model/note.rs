//! Note domain model.
//!
//! # Responsibility
//! - Define the single stored record: an identified title/description pair.
//! - Provide the title validation used by the command surface.
//!
//! # Invariants
//! - `id == 0` means "not persisted yet; assign a new identifier".
//! - Persisted identifiers are strictly positive and never change.
//! - Updates replace the whole record; there is no partial-field update.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Row identifier assigned by storage.
pub type NoteId = i64;

/// Sentinel id carried by notes that have not been inserted yet.
pub const NEW_NOTE_ID: NoteId = 0;

/// Stored note record.
///
/// Equality compares every field, so list consumers can match items by `id`
/// first and then detect content changes with `==`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    /// Required, non-empty once it passes [`Note::validate`].
    pub title: String,
    /// Free text; empty when the user left it blank.
    pub description: String,
}

/// Validation failure for note input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    EmptyTitle,
    NegativeId(NoteId),
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "note title must not be empty"),
            Self::NegativeId(id) => write!(f, "note id must not be negative, got {id}"),
        }
    }
}

impl Error for NoteValidationError {}

impl Note {
    /// Creates an unsaved note; storage assigns the id on insert.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_id(NEW_NOTE_ID, title, description)
    }

    /// Creates a note carrying an existing identifier.
    pub fn with_id(id: NoteId, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Returns whether storage still has to assign an identifier.
    pub fn is_new(&self) -> bool {
        self.id == NEW_NOTE_ID
    }

    /// Checks user-facing invariants before a note is handed to storage.
    ///
    /// # Errors
    /// - `EmptyTitle` when the title is blank after trimming.
    /// - `NegativeId` when the id can never have been assigned by storage.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.id < 0 {
            return Err(NoteValidationError::NegativeId(self.id));
        }
        if self.title.trim().is_empty() {
            return Err(NoteValidationError::EmptyTitle);
        }
        Ok(())
    }
}
