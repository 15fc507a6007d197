//! Scoped observation handles.

use crate::model::note::Note;
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, ThreadId};
use tokio::task::JoinHandle;

pub(crate) type Callback = Box<dyn FnMut(Vec<Note>) + Send>;

/// Callback state shared by a subscription and its observer task.
///
/// Delivery holds `callback` while the user callback runs. `cancelled` is
/// set without taking that lock, so cancelling from inside the callback
/// cannot wait on itself.
pub(crate) struct CallbackSlot {
    callback: Mutex<Option<Callback>>,
    cancelled: AtomicBool,
    delivering_on: Mutex<Option<ThreadId>>,
}

pub(crate) type SharedCallback = Arc<CallbackSlot>;

impl CallbackSlot {
    pub(crate) fn new(callback: Callback) -> SharedCallback {
        Arc::new(Self {
            callback: Mutex::new(Some(callback)),
            cancelled: AtomicBool::new(false),
            delivering_on: Mutex::new(None),
        })
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn delivering_on_current_thread(&self) -> bool {
        *self
            .delivering_on
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            == Some(thread::current().id())
    }

    fn set_delivering_on(&self, thread: Option<ThreadId>) {
        *self
            .delivering_on
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = thread;
    }
}

/// Handle to a running observation.
///
/// Dropping the handle cancels the observation.
#[must_use = "dropping a Subscription cancels it immediately"]
pub struct Subscription {
    task: Option<JoinHandle<()>>,
    slot: SharedCallback,
}

impl Subscription {
    pub(crate) fn new(task: JoinHandle<()>, slot: SharedCallback) -> Self {
        Self {
            task: Some(task),
            slot,
        }
    }

    /// Stops the observation. Idempotent.
    ///
    /// From another thread this waits for an in-flight callback to return;
    /// from inside the callback it returns at once. Either way no further
    /// callback starts afterwards.
    pub fn cancel(&mut self) {
        self.slot.cancelled.store(true, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("event=live_cancel module=live status=ok");
        }
        if self.slot.delivering_on_current_thread() {
            // `deliver` drops the callback once it returns.
            return;
        }

        let released = self
            .slot
            .callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(released);
    }

    /// Returns whether callbacks can still fire.
    pub fn is_active(&self) -> bool {
        !self.slot.is_cancelled()
            && self
                .task
                .as_ref()
                .is_some_and(|task| !task.is_finished())
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Marks the current thread as delivering until dropped, even on unwind.
struct DeliveringGuard<'a>(&'a CallbackSlot);

impl<'a> DeliveringGuard<'a> {
    fn enter(slot: &'a CallbackSlot) -> Self {
        slot.set_delivering_on(Some(thread::current().id()));
        Self(slot)
    }
}

impl Drop for DeliveringGuard<'_> {
    fn drop(&mut self) {
        self.0.set_delivering_on(None);
    }
}

/// Invokes the callback if the subscription is still live.
///
/// Returns `false` once the subscription was cancelled.
pub(crate) fn deliver(slot: &CallbackSlot, notes: Vec<Note>) -> bool {
    let mut guard = slot.callback.lock().unwrap_or_else(PoisonError::into_inner);
    if !slot.is_cancelled() {
        if let Some(on_change) = guard.as_mut() {
            let _delivering = DeliveringGuard::enter(slot);
            on_change(notes);
        }
    }
    if !slot.is_cancelled() && guard.is_some() {
        return true;
    }

    // Drop outside the lock: the callback may own its own Subscription.
    let released = guard.take();
    drop(guard);
    drop(released);
    false
}
