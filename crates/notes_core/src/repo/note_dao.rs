//! Storage engine for the `notes` table.
//!
//! # Responsibility
//! - Upsert, update, delete and query note rows.
//! - Hand out [`LiveQuery`] handles for list and title search views.
//! - Publish a table invalidation after every write that changed rows.
//!
//! # Invariants
//! - Inserting a note with `id == 0` assigns a fresh positive id; any other
//!   id replaces the row with that id (upsert).
//! - Query results are ordered by `id ASC`, which is insertion order for
//!   autoincrement ids.
//! - Search matches `title` only, with SQLite `LIKE` semantics
//!   (case-insensitive for ASCII). Callers supply the wildcards.

use crate::db::NoteDatabase;
use crate::live::query::LiveQuery;
use crate::model::note::{Note, NoteId};
use crate::repo::{RepoError, RepoResult};
use log::{debug, info};
use rusqlite::{params, Connection, Row};

pub const NOTES_TABLE: &str = "notes";

const NOTE_SELECT_SQL: &str = "SELECT id, title, description FROM notes";

/// Read queries a [`LiveQuery`] can re-run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteQuery {
    All,
    /// `title LIKE pattern`; the pattern carries its own `%` wildcards.
    TitleLike(String),
}

impl NoteQuery {
    /// Runs the query once on `conn`.
    pub fn execute(&self, conn: &Connection) -> RepoResult<Vec<Note>> {
        match self {
            Self::All => query_all_notes(conn),
            Self::TitleLike(pattern) => search_notes(conn, pattern),
        }
    }
}

/// Async storage engine bound to one shared database.
#[derive(Clone)]
pub struct NoteDao {
    db: NoteDatabase,
}

impl NoteDao {
    pub fn new(db: NoteDatabase) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &NoteDatabase {
        &self.db
    }

    /// Inserts or replaces `note` and returns its persisted id.
    ///
    /// The invalidation is published by the blocking job itself, so observers
    /// learn about the commit even if this future is dropped early.
    pub async fn insert(&self, note: &Note) -> RepoResult<NoteId> {
        let note = note.clone();
        let db = self.db.clone();
        self.db
            .run_blocking(move |conn| -> RepoResult<NoteId> {
                let id = insert_note(conn, &note)?;
                db.tracker().notify(NOTES_TABLE);
                Ok(id)
            })
            .await
    }

    /// Replaces every field of the row with `note.id`.
    ///
    /// Returns the number of rows changed (0 or 1).
    pub async fn update(&self, note: &Note) -> RepoResult<usize> {
        let note = note.clone();
        let db = self.db.clone();
        self.db
            .run_blocking(move |conn| -> RepoResult<usize> {
                let changed = update_note(conn, &note)?;
                if changed > 0 {
                    db.tracker().notify(NOTES_TABLE);
                }
                Ok(changed)
            })
            .await
    }

    /// Deletes the row matching `note.id`; a missing row is a no-op.
    ///
    /// Returns the number of rows removed (0 or 1).
    pub async fn delete(&self, note: &Note) -> RepoResult<usize> {
        let id = note.id;
        let db = self.db.clone();
        self.db
            .run_blocking(move |conn| -> RepoResult<usize> {
                let removed = delete_note(conn, id)?;
                if removed > 0 {
                    db.tracker().notify(NOTES_TABLE);
                }
                Ok(removed)
            })
            .await
    }

    /// Live view over every note.
    pub fn query_all(&self) -> LiveQuery {
        LiveQuery::new(self.db.clone(), NoteQuery::All)
    }

    /// Live view over notes whose title matches `pattern`.
    pub fn search(&self, pattern: impl Into<String>) -> LiveQuery {
        LiveQuery::new(self.db.clone(), NoteQuery::TitleLike(pattern.into()))
    }
}

/// Upserts one row.
///
/// # Errors
/// - `InvalidId` for negative ids.
pub fn insert_note(conn: &Connection, note: &Note) -> RepoResult<NoteId> {
    if note.id < 0 {
        return Err(RepoError::InvalidId(note.id));
    }

    let requested_id = (!note.is_new()).then_some(note.id);
    conn.execute(
        "INSERT OR REPLACE INTO notes (id, title, description) VALUES (?1, ?2, ?3);",
        params![requested_id, note.title.as_str(), note.description.as_str()],
    )?;

    let id = requested_id.unwrap_or_else(|| conn.last_insert_rowid());
    info!(
        "event=note_insert module=repo status=ok note_id={id} assigned={}",
        requested_id.is_none()
    );
    Ok(id)
}

/// Full-record replace of an existing row. Returns rows changed.
pub fn update_note(conn: &Connection, note: &Note) -> RepoResult<usize> {
    if note.id < 0 {
        return Err(RepoError::InvalidId(note.id));
    }

    let changed = conn.execute(
        "UPDATE notes SET title = ?2, description = ?3 WHERE id = ?1;",
        params![note.id, note.title.as_str(), note.description.as_str()],
    )?;
    info!(
        "event=note_update module=repo status=ok note_id={} changed={changed}",
        note.id
    );
    Ok(changed)
}

/// Deletes by id. Returns rows removed.
pub fn delete_note(conn: &Connection, id: NoteId) -> RepoResult<usize> {
    let removed = conn.execute("DELETE FROM notes WHERE id = ?1;", [id])?;
    info!("event=note_delete module=repo status=ok note_id={id} removed={removed}");
    Ok(removed)
}

pub fn query_all_notes(conn: &Connection) -> RepoResult<Vec<Note>> {
    let mut stmt = conn.prepare_cached(&format!("{NOTE_SELECT_SQL} ORDER BY id ASC;"))?;
    let notes = stmt
        .query_map([], parse_note_row)?
        .collect::<Result<Vec<_>, _>>()?;
    debug!("event=note_query module=repo status=ok rows={}", notes.len());
    Ok(notes)
}

pub fn search_notes(conn: &Connection, pattern: &str) -> RepoResult<Vec<Note>> {
    let mut stmt = conn.prepare_cached(&format!(
        "{NOTE_SELECT_SQL} WHERE title LIKE ?1 ORDER BY id ASC;"
    ))?;
    let notes = stmt
        .query_map([pattern], parse_note_row)?
        .collect::<Result<Vec<_>, _>>()?;
    // Pattern is user text; log its size only.
    debug!(
        "event=note_search module=repo status=ok pattern_len={} rows={}",
        pattern.chars().count(),
        notes.len()
    );
    Ok(notes)
}

fn parse_note_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row
            .get::<_, Option<String>>("description")?
            .unwrap_or_default(),
    })
}
