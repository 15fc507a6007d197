//! Repository layer: SQLite storage engine and the façade over it.
//!
//! # Responsibility
//! - [`note_dao`] owns the SQL for the `notes` table and publishes table
//!   invalidations after each committed write.
//! - [`note_repo`] exposes domain operations without knowing the engine type.
//!
//! # Invariants
//! - Deleting or updating a missing row is a no-op, never `NotFound`.
//! - Storage failures are returned as-is; there are no partial results.

use crate::db::DbError;
use crate::model::note::NoteId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod note_dao;
pub mod note_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Identifier storage could never have assigned.
    InvalidId(NoteId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidId(id) => write!(f, "invalid note id: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidId(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
