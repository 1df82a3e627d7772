//! One batch of events for one document.

use serde::{Deserialize, Serialize};

use tessera_types::DocumentId;

use crate::event::{DataSourceEvent, LocalEvent, MiddlewareEvent};
use crate::registry::EventRegistry;

/// A batch of events reconciled together.
///
/// Built per batch, consumed once by [`send`](Self::send), never persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventsBunch {
    pub context_id: DocumentId,
    #[serde(default)]
    pub middleware_events: Vec<MiddlewareEvent>,
    #[serde(default)]
    pub local_events: Vec<LocalEvent>,
    #[serde(default)]
    pub data_source_events: Vec<DataSourceEvent>,
}

impl EventsBunch {
    /// An empty batch for a document.
    pub fn new(context_id: DocumentId) -> Self {
        Self {
            context_id,
            middleware_events: Vec::new(),
            local_events: Vec::new(),
            data_source_events: Vec::new(),
        }
    }

    pub fn with_middleware(mut self, events: impl IntoIterator<Item = MiddlewareEvent>) -> Self {
        self.middleware_events.extend(events);
        self
    }

    pub fn with_local(mut self, events: impl IntoIterator<Item = LocalEvent>) -> Self {
        self.local_events.extend(events);
        self
    }

    pub fn with_data_source(mut self, events: impl IntoIterator<Item = DataSourceEvent>) -> Self {
        self.data_source_events.extend(events);
        self
    }

    pub fn push_middleware(&mut self, event: impl Into<MiddlewareEvent>) {
        self.middleware_events.push(event.into());
    }

    pub fn push_local(&mut self, event: LocalEvent) {
        self.local_events.push(event);
    }

    pub fn push_data_source(&mut self, event: DataSourceEvent) {
        self.data_source_events.push(event);
    }

    /// Total number of events across all three streams.
    pub fn len(&self) -> usize {
        self.middleware_events.len() + self.local_events.len() + self.data_source_events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hand the batch to whichever document is registered for `context_id`.
    ///
    /// Returns whether a document received it. An unregistered id drops the
    /// batch: delivery is at-most-once and best-effort.
    pub fn send(self, registry: &EventRegistry) -> bool {
        registry.dispatch(self)
    }
}
