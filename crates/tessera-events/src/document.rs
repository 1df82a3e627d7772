//! A document: a container plus the handler that reconciles it.
//!
//! The document owns both halves, so the handler never points back at the
//! container. Wrapped in [`SharedDocument`], its mutex is the boundary that
//! keeps every mutation of one container on one caller at a time.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use tessera_types::DocumentId;

use crate::bunch::EventsBunch;
use crate::config::HandlerConfig;
use crate::container::BlockContainer;
use crate::event::DataSourceEvent;
use crate::handler::EventHandler;
use crate::registry::{EventRegistry, EventSink};
use crate::update::EventHandlerUpdate;

pub type SharedDocument<C> = Arc<Mutex<Document<C>>>;

pub struct Document<C> {
    id: DocumentId,
    container: C,
    handler: EventHandler,
}

impl<C: BlockContainer> Document<C> {
    /// Create a document with its handler already configured.
    pub fn new(id: DocumentId, container: C, config: HandlerConfig) -> Self {
        let mut handler = EventHandler::new(config);
        handler.configure(&container);
        Self {
            id,
            container,
            handler,
        }
    }

    /// Wrap in a lock and register with `registry` under this document's id.
    pub fn open(self, registry: &EventRegistry) -> SharedDocument<C>
    where
        C: Send + 'static,
    {
        let id = self.id.clone();
        let shared = Arc::new(Mutex::new(self));
        registry.register(id, &shared);
        shared
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    /// Swap in a new container; the handler is reconfigured from scratch.
    pub fn replace_container(&mut self, container: C) -> C {
        let old = std::mem::replace(&mut self.container, container);
        self.handler.configure(&self.container);
        old
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventHandlerUpdate> {
        self.handler.subscribe()
    }

    pub fn subscribe_data_source(&self) -> broadcast::Receiver<DataSourceEvent> {
        self.handler.subscribe_data_source()
    }

    /// Reconcile a batch directly, bypassing the registry.
    pub fn apply(&mut self, bunch: &EventsBunch) -> Option<EventHandlerUpdate> {
        if bunch.context_id != self.id {
            tracing::warn!(
                document = %self.id,
                batch = %bunch.context_id,
                "batch addressed to another document, ignored"
            );
            return None;
        }
        self.handler.handle(&mut self.container, bunch)
    }
}

impl<C: BlockContainer + Send> EventSink for Document<C> {
    fn receive(&mut self, bunch: EventsBunch) {
        self.apply(&bunch);
    }
}
