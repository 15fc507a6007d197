//! Shared database handle and its lazy provider.
//!
//! # Responsibility
//! - Own the one SQLite connection and the table invalidation tracker.
//! - Run blocking SQL on tokio's blocking pool so async callers never block.
//! - Build the handle once, on first use, even under concurrent first calls.
//!
//! # Invariants
//! - Statements are serialized by the connection mutex.
//! - All clones of a [`NoteDatabase`] share the same connection.
//! - A failed construction leaves the provider empty; nothing is cached.

use super::open::{open_db_in_memory, open_db_with_timeout};
use super::{DbError, DbResult};
use crate::config::NotesConfig;
use crate::live::tracker::InvalidationTracker;
use log::info;
use once_cell::sync::OnceCell;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// Cheap-to-clone handle to the notes database.
#[derive(Debug, Clone)]
pub struct NoteDatabase {
    inner: Arc<DatabaseInner>,
}

#[derive(Debug)]
struct DatabaseInner {
    conn: Mutex<Connection>,
    tracker: InvalidationTracker,
}

impl NoteDatabase {
    /// Opens the database described by `config`, creating directory, file and
    /// schema as needed.
    pub fn open(config: &NotesConfig) -> DbResult<Self> {
        config.validate().map_err(DbError::InvalidConfig)?;
        let conn = match config.database_path() {
            Some(path) => {
                if let Some(dir) = path.parent() {
                    std::fs::create_dir_all(dir)?;
                }
                open_db_with_timeout(&path, config.busy_timeout())?
            }
            None => open_db_in_memory()?,
        };
        Ok(Self::from_connection(conn))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            inner: Arc::new(DatabaseInner {
                conn: Mutex::new(conn),
                tracker: InvalidationTracker::new(),
            }),
        }
    }

    pub fn tracker(&self) -> &InvalidationTracker {
        &self.inner.tracker
    }

    /// Returns whether both handles share one underlying connection.
    pub fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Runs `job` against the connection on the blocking thread pool.
    ///
    /// Must be awaited inside a tokio runtime.
    pub async fn run_blocking<T, E, F>(&self, job: F) -> Result<T, E>
    where
        F: FnOnce(&mut Connection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<DbError> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let mut conn = inner.conn.lock().map_err(|_| DbError::ConnectionPoisoned)?;
            job(&mut conn)
        })
        .await
        .map_err(DbError::from)?
    }

    /// Runs `job` against the connection on the calling thread.
    pub fn with_connection<T, E, F>(&self, job: F) -> Result<T, E>
    where
        F: FnOnce(&mut Connection) -> Result<T, E>,
        E: From<DbError>,
    {
        let mut conn = self
            .inner
            .conn
            .lock()
            .map_err(|_| DbError::ConnectionPoisoned)?;
        job(&mut conn)
    }
}

/// Lazily builds the shared [`NoteDatabase`] on first request.
///
/// Owned by the application root and passed to consumers explicitly.
pub struct DatabaseProvider {
    config: NotesConfig,
    database: OnceCell<NoteDatabase>,
}

impl DatabaseProvider {
    pub fn new(config: NotesConfig) -> Self {
        Self {
            config,
            database: OnceCell::new(),
        }
    }

    /// Returns the shared database, opening it if this is the first call.
    ///
    /// Concurrent first callers block until exactly one of them finishes
    /// construction; all receive the same instance.
    ///
    /// # Errors
    /// - Propagates open/migration failures. The next call tries again.
    pub fn get(&self) -> DbResult<NoteDatabase> {
        self.database
            .get_or_try_init(|| {
                let database = NoteDatabase::open(&self.config)?;
                info!(
                    "event=db_provider_init module=db status=ok mode={}",
                    if self.config.data_dir.is_some() { "file" } else { "memory" }
                );
                Ok(database)
            })
            .cloned()
    }

    pub fn is_initialized(&self) -> bool {
        self.database.get().is_some()
    }

    pub fn config(&self) -> &NotesConfig {
        &self.config
    }
}
