//! Re-runnable note queries.
//!
//! # Responsibility
//! - Run a [`NoteQuery`] once ([`LiveQuery::fetch`]) or keep it running and
//!   deliver fresh results on every table change ([`LiveQuery::observe`]).
//!
//! # Invariants
//! - Observers receive the full result sequence, never a diff.
//! - The first result is always delivered; later ones only when they differ
//!   from the last delivered sequence.
//! - A query that starts after a write committed sees that write.

use super::subscription::{deliver, Callback, CallbackSlot, SharedCallback, Subscription};
use crate::db::NoteDatabase;
use crate::model::note::Note;
use crate::repo::note_dao::NoteQuery;
use crate::repo::RepoResult;
use log::{debug, error};
use std::sync::Arc;

#[derive(Clone)]
pub struct LiveQuery {
    db: NoteDatabase,
    query: NoteQuery,
}

impl LiveQuery {
    pub fn new(db: NoteDatabase, query: NoteQuery) -> Self {
        Self { db, query }
    }

    pub fn query(&self) -> &NoteQuery {
        &self.query
    }

    /// Runs the query once on the blocking pool.
    pub async fn fetch(&self) -> RepoResult<Vec<Note>> {
        let query = self.query.clone();
        self.db.run_blocking(move |conn| query.execute(conn)).await
    }

    /// Starts observing on the current tokio runtime.
    ///
    /// `on_change` runs on a runtime worker, one call at a time. It may cancel
    /// or drop its own [`Subscription`].
    ///
    /// # Panics
    /// - When called outside a tokio runtime.
    pub fn observe<F>(&self, on_change: F) -> Subscription
    where
        F: FnMut(Vec<Note>) + Send + 'static,
    {
        let on_change: Callback = Box::new(on_change);
        let callback = CallbackSlot::new(on_change);
        let task = tokio::spawn(self.clone().run_observer(Arc::clone(&callback)));
        Subscription::new(task, callback)
    }

    async fn run_observer(self, callback: SharedCallback) {
        let mut changes = self.db.tracker().subscribe();
        let mut last_delivered: Option<Vec<Note>> = None;

        loop {
            // Mark the version seen before querying so a write racing with
            // the query still wakes us afterwards.
            let version = *changes.borrow_and_update();

            let notes = match self.fetch().await {
                Ok(notes) => notes,
                Err(err) => {
                    error!(
                        "event=live_query module=live status=error query={} error={err}",
                        query_kind(&self.query)
                    );
                    return;
                }
            };

            if last_delivered.as_ref() != Some(&notes) {
                debug!(
                    "event=live_query module=live status=emit query={} version={version} rows={}",
                    query_kind(&self.query),
                    notes.len()
                );
                if !deliver(&callback, notes.clone()) {
                    return;
                }
                last_delivered = Some(notes);
            }

            if changes.changed().await.is_err() {
                return;
            }
        }
    }
}

fn query_kind(query: &NoteQuery) -> &'static str {
    match query {
        NoteQuery::All => "all",
        NoteQuery::TitleLike(_) => "title_like",
    }
}
