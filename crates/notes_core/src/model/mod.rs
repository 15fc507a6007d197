//! Domain model for locally stored notes.
//!
//! # Responsibility
//! - Define the flat single-table record shared by storage and callers.
//!
//! # Invariants
//! - Notes are hard-deleted; there are no tombstones.

pub mod note;
