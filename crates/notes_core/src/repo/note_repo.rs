//! Note repository contract and its storage-engine implementation.
//!
//! # Responsibility
//! - Give callers domain operations without exposing the engine type.
//!
//! # Invariants
//! - Implementations add no validation or transformation; every call maps
//!   to exactly one storage operation.

use crate::live::LiveQuery;
use crate::model::note::{Note, NoteId};
use crate::repo::note_dao::NoteDao;
use crate::repo::RepoResult;
use std::future::Future;

/// Repository interface for note operations.
pub trait NoteRepository {
    /// Upserts a note; returns its persisted id.
    fn add_note(&self, note: &Note) -> impl Future<Output = RepoResult<NoteId>> + Send;
    /// Full-record replace by id; returns rows changed.
    fn update_note(&self, note: &Note) -> impl Future<Output = RepoResult<usize>> + Send;
    /// Deletes by id; returns rows removed.
    fn delete_note(&self, note: &Note) -> impl Future<Output = RepoResult<usize>> + Send;
    fn get_all_notes(&self) -> LiveQuery;
    /// `pattern` must already contain its `%` wildcards.
    fn search_note(&self, pattern: &str) -> LiveQuery;
}

/// Repository backed by [`NoteDao`].
#[derive(Clone)]
pub struct DaoNoteRepository {
    dao: NoteDao,
}

impl DaoNoteRepository {
    pub fn new(dao: NoteDao) -> Self {
        Self { dao }
    }
}

impl NoteRepository for DaoNoteRepository {
    fn add_note(&self, note: &Note) -> impl Future<Output = RepoResult<NoteId>> + Send {
        self.dao.insert(note)
    }

    fn update_note(&self, note: &Note) -> impl Future<Output = RepoResult<usize>> + Send {
        self.dao.update(note)
    }

    fn delete_note(&self, note: &Note) -> impl Future<Output = RepoResult<usize>> + Send {
        self.dao.delete(note)
    }

    fn get_all_notes(&self) -> LiveQuery {
        self.dao.query_all()
    }

    fn search_note(&self, pattern: &str) -> LiveQuery {
        self.dao.search(pattern)
    }
}
