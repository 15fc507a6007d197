//! Core storage and observation pipeline for a local notes app.
//! UI layers issue commands through [`NoteService`] and subscribe to
//! [`LiveQuery`] results; everything below that is owned here.

pub mod config;
pub mod db;
pub mod live;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{NotesConfig, DEFAULT_DATABASE_NAME};
pub use db::{DatabaseProvider, DbError, DbResult, NoteDatabase};
pub use live::{LiveQuery, Subscription};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::note::{Note, NoteId, NoteValidationError, NEW_NOTE_ID};
pub use repo::note_dao::{NoteDao, NoteQuery};
pub use repo::note_repo::{DaoNoteRepository, NoteRepository};
pub use repo::{RepoError, RepoResult};
pub use service::note_service::{
    search_pattern, NoteService, ServiceError, ServiceResult, EMPTY_TITLE_MESSAGE,
    INVALID_NOTE_MESSAGE, NOTE_ADDED_MESSAGE,
};

/// Wires the standard stack on top of an opened database.
pub fn note_service(db: NoteDatabase) -> NoteService<DaoNoteRepository> {
    NoteService::new(DaoNoteRepository::new(NoteDao::new(db)))
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
