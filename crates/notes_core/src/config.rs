//! Storage configuration.
//!
//! # Responsibility
//! - Describe where the notes database lives and how it is opened.
//! - Load from any serde source; every field has a default.
//!
//! # Invariants
//! - `database_name` is a bare file name, never a path.
//! - `data_dir = None` selects a private in-memory database.

use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Fixed local database name used by the notes app.
pub const DEFAULT_DATABASE_NAME: &str = "note_db";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesConfig {
    /// Directory holding the database file. Created on open when missing.
    pub data_dir: Option<PathBuf>,
    pub database_name: String,
    pub busy_timeout_ms: u64,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            log_level: default_log_level().to_string(),
        }
    }
}

impl NotesConfig {
    /// Config for a database file named [`DEFAULT_DATABASE_NAME`] under `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(dir.into()),
            ..Self::default()
        }
    }

    /// Config for a throwaway in-memory database.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Full path of the database file, or `None` for in-memory storage.
    pub fn database_path(&self) -> Option<PathBuf> {
        self.data_dir
            .as_ref()
            .map(|dir| dir.join(&self.database_name))
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    /// Rejects configs that cannot name a database file.
    pub fn validate(&self) -> Result<(), String> {
        let name = self.database_name.trim();
        if name.is_empty() {
            return Err("database_name cannot be empty".to_string());
        }
        if name.contains(['/', '\\']) {
            return Err(format!(
                "database_name must be a file name, got `{}`",
                self.database_name
            ));
        }
        Ok(())
    }
}
