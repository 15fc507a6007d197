//! Reactive read models over the notes table.
//!
//! # Responsibility
//! - Track table invalidations published by writers.
//! - Re-run subscribed queries after each committed change and push the full
//!   result sequence to the subscriber.
//!
//! # Invariants
//! - A write always commits before the invalidation it triggers.
//! - No callback fires after its [`Subscription`] is cancelled or dropped.

pub mod query;
pub mod subscription;
pub mod tracker;

pub use query::LiveQuery;
pub use subscription::Subscription;
pub use tracker::InvalidationTracker;
