//! Single-slot reactive cell with replay-one semantics.
//!
//! A [`ReactiveCell`] always holds a current value. [`subscribe()`](ReactiveCell::subscribe)
//! invokes the callback immediately with that value and again on every
//! [`set()`](ReactiveCell::set). Propagation is synchronous: `set()` does not
//! return until every subscriber (and anything they trigger downstream) has run.
//!
//! # Invariants
//!
//! 1. Subscribers are notified in registration order.
//! 2. A subscriber removed during a notification pass is not called again, even
//!    if it was part of the snapshot taken at the start of that pass.
//! 3. After [`complete()`](ReactiveCell::complete) the cell keeps its last value
//!    for readers, but `set()` is ignored and `subscribe()` returns an inert
//!    [`Subscription`] without invoking the callback.
//!
//! Re-entrant writes are allowed. A subscriber may `set()` the cell it is
//! observing; the nested pass runs to completion before the outer pass resumes
//! with the remaining subscribers.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

struct Subscriber<T> {
    id: u64,
    active: Cell<bool>,
    callback: Box<dyn Fn(&T)>,
}

struct Slot<T> {
    value: T,
    subscribers: Vec<Rc<Subscriber<T>>>,
    next_id: u64,
    completed: bool,
}

/// A shared single-value container that pushes every write to its subscribers.
///
/// Cloning a `ReactiveCell` clones the handle, not the value: both handles
/// observe and mutate the same slot.
pub struct ReactiveCell<T> {
    slot: Rc<RefCell<Slot<T>>>,
}

impl<T> Clone for ReactiveCell<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T: Clone + 'static> ReactiveCell<T> {
    /// Creates a cell holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Slot {
                value,
                subscribers: Vec::new(),
                next_id: 0,
                completed: false,
            })),
        }
    }

    /// Returns a clone of the current value.
    pub fn get(&self) -> T {
        self.slot.borrow().value.clone()
    }

    /// Runs `f` against the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.slot.borrow().value)
    }

    /// Stores `value` and notifies every current subscriber with it.
    ///
    /// Ignored once the cell is completed.
    pub fn set(&self, value: T) {
        let snapshot = {
            let mut slot = self.slot.borrow_mut();
            if slot.completed {
                tracing::trace!("cell_set: ignored, cell completed");
                return;
            }
            slot.value = value.clone();
            slot.subscribers.clone()
        };
        for subscriber in snapshot {
            if subscriber.active.get() {
                (subscriber.callback)(&value);
            }
        }
    }

    /// Registers `callback`, invoking it immediately with the current value.
    ///
    /// On a completed cell the callback is dropped without being called and an
    /// inert subscription is returned.
    #[must_use = "dropping the Subscription unsubscribes immediately; call detach() to keep it"]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let (subscriber, current) = {
            let mut slot = self.slot.borrow_mut();
            if slot.completed {
                return Subscription::inert();
            }
            let id = slot.next_id;
            slot.next_id += 1;
            let subscriber = Rc::new(Subscriber {
                id,
                active: Cell::new(true),
                callback: Box::new(callback),
            });
            slot.subscribers.push(Rc::clone(&subscriber));
            (subscriber, slot.value.clone())
        };

        (subscriber.callback)(&current);

        let weak_slot: Weak<RefCell<Slot<T>>> = Rc::downgrade(&self.slot);
        let id = subscriber.id;
        let handle = Rc::downgrade(&subscriber);
        Subscription::from_fn(move || {
            if let Some(subscriber) = handle.upgrade() {
                subscriber.active.set(false);
            }
            if let Some(slot) = weak_slot.upgrade() {
                slot.borrow_mut().subscribers.retain(|s| s.id != id);
            }
        })
    }

    /// Terminates the cell: drops every subscriber and rejects further writes.
    pub fn complete(&self) {
        let drained = {
            let mut slot = self.slot.borrow_mut();
            if slot.completed {
                return;
            }
            slot.completed = true;
            std::mem::take(&mut slot.subscribers)
        };
        for subscriber in &drained {
            subscriber.active.set(false);
        }
    }

    /// Returns `true` once [`complete()`](Self::complete) has run.
    pub fn is_completed(&self) -> bool {
        self.slot.borrow().completed
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.slot.borrow().subscribers.len()
    }
}

impl<T: fmt::Debug> fmt::Debug for ReactiveCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.slot.borrow();
        f.debug_struct("ReactiveCell")
            .field("value", &slot.value)
            .field("subscribers", &slot.subscribers.len())
            .field("completed", &slot.completed)
            .finish()
    }
}

/// Handle to one registered callback.
///
/// Dropping the handle unsubscribes. [`detach()`](Self::detach) keeps the
/// callback registered for the lifetime of the cell instead.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn from_fn(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription that is already closed.
    pub fn inert() -> Self {
        Self { cancel: None }
    }

    /// Removes the callback from its cell. Safe to call more than once.
    pub fn unsubscribe(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Returns `true` while the callback is still registered with a live cell.
    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    /// Leaves the callback registered until its cell completes or is dropped.
    pub fn detach(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
