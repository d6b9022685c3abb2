// ABOUTME: Thread-safe observer list shared by anything that emits events
// ABOUTME: Subscribe, unsubscribe, and synchronous delivery in emission order

use crate::events::Event;
use std::sync::{Arc, Mutex};

/// Anything that can receive an emitted [`Event`].
///
/// Observers are called synchronously, in the task that calls `emit`, so an
/// observer that blocks stalls the emitter. Panicking observers are not
/// specially protected against; misbehaving observers should catch their
/// own errors, mirroring the "swallow and move on" contract below for
/// observer *errors* rather than panics.
pub trait Observer: Send + Sync {
    fn on_event(&self, event: &Event);
}

impl<F> Observer for F
where
    F: Fn(&Event) + Send + Sync,
{
    fn on_event(&self, event: &Event) {
        self(event)
    }
}

/// A subscriber list with synchronous, ordered delivery.
///
/// Cloning an `Observable` shares the same subscriber list (it is a cheap
/// `Arc` handle), so the server core can hand out clones to every task that
/// needs to emit without re-threading a reference through every handler.
#[derive(Clone, Default)]
pub struct Observable {
    observers: Arc<Mutex<Vec<Arc<dyn Observer>>>>,
}

impl Observable {
    pub fn new() -> Self {
        Observable::default()
    }

    /// Registers `observer` to receive all future emitted events.
    pub fn subscribe(&self, observer: Arc<dyn Observer>) {
        self.observers.lock().unwrap().push(observer);
    }

    /// Removes a previously registered observer, comparing by pointer
    /// identity (the same `Arc` that was subscribed).
    pub fn unsubscribe(&self, observer: &Arc<dyn Observer>) {
        let mut observers = self.observers.lock().unwrap();
        observers.retain(|o| !Arc::ptr_eq(o, observer));
    }

    /// Emits `event` to every subscriber, in subscription order. Delivery
    /// is synchronous in the calling task.
    pub fn emit(&self, event: Event) {
        let observers = self.observers.lock().unwrap().clone();
        for observer in observers {
            observer.on_event(&event);
        }
    }
}
