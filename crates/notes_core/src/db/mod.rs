//! SQLite storage bootstrap, connection ownership and schema migrations.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the notes core.
//! - Own the single shared connection per process ([`NoteDatabase`]) and
//!   build it lazily on first use ([`DatabaseProvider`]).
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - No note data is read or written before migrations succeed.
//! - Every consumer receives the database handle explicitly; there is no
//!   process-global connection.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod database;
pub mod migrations;
mod open;

pub use database::{DatabaseProvider, NoteDatabase};
pub use open::{open_db, open_db_in_memory, open_db_with_timeout, DEFAULT_BUSY_TIMEOUT};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    Io(std::io::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    InvalidConfig(String),
    /// A previous holder of the connection lock panicked.
    ConnectionPoisoned,
    /// The blocking worker running a statement was cancelled or panicked.
    Worker(tokio::task::JoinError),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "storage i/o failed: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::InvalidConfig(message) => write!(f, "invalid database config: {message}"),
            Self::ConnectionPoisoned => write!(f, "database connection lock is poisoned"),
            Self::Worker(err) => write!(f, "database worker failed: {err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Worker(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. }
            | Self::InvalidConfig(_)
            | Self::ConnectionPoisoned => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<std::io::Error> for DbError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<tokio::task::JoinError> for DbError {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::Worker(value)
    }
}
