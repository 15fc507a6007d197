//! Note use-case service: the command surface a UI talks to.
//!
//! # Responsibility
//! - Validate and normalize user input before it reaches storage.
//! - Turn raw search text into a title pattern.
//! - Provide the user-visible messages for command outcomes.
//!
//! # Invariants
//! - Empty titles never reach the repository.
//! - Title and description are trimmed before persistence.

use crate::live::LiveQuery;
use crate::model::note::{Note, NoteValidationError};
use crate::repo::note_repo::NoteRepository;
use crate::repo::RepoError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Shown after a note was saved.
pub const NOTE_ADDED_MESSAGE: &str = "Note Added Successfully!";
/// Shown when the user submits a note without a title.
pub const EMPTY_TITLE_MESSAGE: &str = "Please enter Note title!";
/// Shown when the note handed back by the UI carries an impossible id.
pub const INVALID_NOTE_MESSAGE: &str = "This note is no longer valid. Please reopen it.";
/// Shown when storage rejects a command.
pub const STORAGE_FAILURE_MESSAGE: &str = "Could not save notes. Please try again.";

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    Validation(NoteValidationError),
    Repo(RepoError),
}

impl ServiceError {
    /// Short transient message suitable for a toast.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Validation(NoteValidationError::EmptyTitle) => EMPTY_TITLE_MESSAGE,
            Self::Validation(NoteValidationError::NegativeId(_)) => INVALID_NOTE_MESSAGE,
            Self::Repo(_) => STORAGE_FAILURE_MESSAGE,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<NoteValidationError> for ServiceError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Use-case service over any [`NoteRepository`].
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a note from form input and returns it with its assigned id.
    ///
    /// # Errors
    /// - `Validation(EmptyTitle)` when `title` is blank; nothing is stored.
    pub async fn add_note(&self, title: &str, description: &str) -> ServiceResult<Note> {
        let mut note = Note::new(title.trim(), description.trim());
        if let Err(err) = note.validate() {
            warn!("event=note_add module=service status=rejected reason={err}");
            return Err(err.into());
        }

        note.id = self.repo.add_note(&note).await?;
        info!("event=note_add module=service status=ok note_id={}", note.id);
        Ok(note)
    }

    /// Replaces an existing note after the same normalization as `add_note`.
    ///
    /// Returns `false` when no row had that id.
    pub async fn update_note(&self, note: &Note) -> ServiceResult<bool> {
        let normalized = Note::with_id(note.id, note.title.trim(), note.description.trim());
        normalized.validate()?;
        let changed = self.repo.update_note(&normalized).await?;
        Ok(changed > 0)
    }

    /// Deletes a note; deleting an absent note is not an error.
    ///
    /// Returns `false` when nothing was removed.
    pub async fn delete_note(&self, note: &Note) -> ServiceResult<bool> {
        let removed = self.repo.delete_note(note).await?;
        Ok(removed > 0)
    }

    /// Live view over every note.
    pub fn all_notes(&self) -> LiveQuery {
        self.repo.get_all_notes()
    }

    /// Live view over notes whose title contains `raw_text`.
    pub fn search_notes(&self, raw_text: &str) -> LiveQuery {
        self.repo.search_note(&search_pattern(raw_text))
    }
}

/// Wraps raw user text as a `LIKE` substring pattern.
///
/// `%` and `_` typed by the user keep their wildcard meaning.
pub fn search_pattern(raw_text: &str) -> String {
    format!("%{raw_text}%")
}
