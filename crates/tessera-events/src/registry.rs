//! Document-id-keyed distribution of event batches.
//!
//! # Concurrency Model
//!
//! - DashMap for concurrent register/dispatch from any thread
//! - Weak references so a closed document drops out without unregistering
//! - parking_lot Mutex around each sink: one batch at a time per document
//!
//! The registry is an ordinary value; the component managing document
//! lifecycles owns it and hands `&EventRegistry` (or an `Arc`) to producers.

use std::sync::{Arc, Weak};

use dashmap::DashMap;
use parking_lot::Mutex;

use tessera_types::DocumentId;

use crate::bunch::EventsBunch;

/// Something that reconciles batches for one document.
pub trait EventSink: Send {
    fn receive(&mut self, bunch: EventsBunch);
}

/// A sink behind the per-document lock.
pub type SharedSink = Arc<Mutex<dyn EventSink>>;

#[derive(Default)]
pub struct EventRegistry {
    sinks: DashMap<DocumentId, Weak<Mutex<dyn EventSink>>>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route batches for `id` to `sink`, replacing any previous registration.
    ///
    /// Only a weak reference is kept: dropping the last `Arc` unregisters.
    pub fn register<S: EventSink + 'static>(&self, id: DocumentId, sink: &Arc<Mutex<S>>) {
        let shared: SharedSink = sink.clone();
        tracing::debug!(document = %id, "event sink registered");
        self.sinks.insert(id, Arc::downgrade(&shared));
    }

    /// Returns whether anything was registered.
    pub fn unregister(&self, id: &DocumentId) -> bool {
        self.sinks.remove(id).is_some()
    }

    pub fn is_registered(&self, id: &DocumentId) -> bool {
        self.sinks
            .get(id)
            .is_some_and(|entry| entry.value().strong_count() > 0)
    }

    /// Registered ids, including any whose sink has been dropped but not yet pruned.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Deliver a batch to its document's sink.
    ///
    /// Returns false, without error, if no live sink is registered.
    pub fn dispatch(&self, bunch: EventsBunch) -> bool {
        // Release the shard guard before locking the sink, so a sink may
        // register or unregister documents from inside `receive`.
        let sink = self
            .sinks
            .get(&bunch.context_id)
            .and_then(|entry| entry.value().upgrade());

        let Some(sink) = sink else {
            self.sinks
                .remove_if(&bunch.context_id, |_, weak| weak.strong_count() == 0);
            tracing::trace!(document = %bunch.context_id, events = bunch.len(), "no sink registered, batch dropped");
            return false;
        };

        sink.lock().receive(bunch);
        true
    }
}
