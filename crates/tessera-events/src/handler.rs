//! The orchestrator: batch in, one consolidated update out.
//!
//! # Flow
//!
//! ```text
//! EventsBunch ─┬─ middleware events (with payload) ─ InnerConverter ─┐
//!              ├─ local events ──────────────────── LocalConverter ─┤
//!              │                                                    ▼
//!              │                            fold(merge) from empty()
//!              │                                                    │
//!              │                     has_update? → rebuild_tree(root)
//!              │                                                    ▼
//!              │                                  publish (exactly once)
//!              └─ data-source events ──────────────── forwarded as-is
//! ```
//!
//! The handler holds no container. Whoever owns the container passes it into
//! [`configure`](EventHandler::configure) and every
//! [`handle`](EventHandler::handle) call; that caller is also responsible for
//! serializing calls (see [`Document`](crate::Document)).

use tokio::sync::broadcast;

use tessera_types::BlockId;

use crate::bunch::EventsBunch;
use crate::config::HandlerConfig;
use crate::container::BlockContainer;
use crate::converter::{InnerConverter, LocalConverter};
use crate::event::DataSourceEvent;
use crate::update::EventHandlerUpdate;

/// Converters bound to one container's root.
#[derive(Clone, Debug)]
struct Converters {
    root_id: BlockId,
    inner: InnerConverter,
    local: LocalConverter,
}

pub struct EventHandler {
    config: HandlerConfig,
    converters: Option<Converters>,
    update_tx: broadcast::Sender<EventHandlerUpdate>,
    data_source_tx: broadcast::Sender<DataSourceEvent>,
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new(HandlerConfig::default())
    }
}

impl EventHandler {
    pub fn new(config: HandlerConfig) -> Self {
        // capacity 0 would panic inside tokio
        let capacity = config.channel_capacity.max(1);
        let (update_tx, _) = broadcast::channel(capacity);
        let (data_source_tx, _) = broadcast::channel(capacity);
        Self {
            config,
            converters: None,
            update_tx,
            data_source_tx,
        }
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// Bind to a container. Calling again replaces the converters outright.
    pub fn configure<C: BlockContainer + ?Sized>(&mut self, container: &C) {
        let root_id = container.root_id().clone();
        tracing::debug!(root = %root_id, "event handler configured");
        self.converters = Some(Converters {
            inner: InnerConverter::new(root_id.clone(), self.config.log_dropped_events),
            local: LocalConverter::new(root_id.clone()),
            root_id,
        });
    }

    pub fn is_configured(&self) -> bool {
        self.converters.is_some()
    }

    /// Root the handler rebuilds from, once configured.
    pub fn root_id(&self) -> Option<&BlockId> {
        self.converters.as_ref().map(|c| &c.root_id)
    }

    /// Receive one consolidated update per handled batch.
    pub fn subscribe(&self) -> broadcast::Receiver<EventHandlerUpdate> {
        self.update_tx.subscribe()
    }

    /// Receive data-source events as they pass through.
    pub fn subscribe_data_source(&self) -> broadcast::Receiver<DataSourceEvent> {
        self.data_source_tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.update_tx.receiver_count()
    }

    /// Reconcile one batch against `container`.
    ///
    /// Returns the published update, or `None` when the handler was never
    /// configured (a programmer error: panics under
    /// `strict_configuration`, otherwise logs and skips the batch).
    pub fn handle<C: BlockContainer + ?Sized>(
        &mut self,
        container: &mut C,
        bunch: &EventsBunch,
    ) -> Option<EventHandlerUpdate> {
        let span = tracing::debug_span!(
            "handle_events",
            document = %bunch.context_id,
            middleware = bunch.middleware_events.len(),
            local = bunch.local_events.len(),
        );
        let _enter = span.enter();

        let Some(converters) = &self.converters else {
            if self.config.strict_configuration {
                panic!(
                    "EventHandler::handle called before configure (document {})",
                    bunch.context_id
                );
            }
            tracing::warn!(document = %bunch.context_id, "handle called before configure, batch ignored");
            return None;
        };

        let mut updates = Vec::with_capacity(bunch.middleware_events.len() + bunch.local_events.len());
        for payload in bunch.middleware_events.iter().filter_map(|e| e.value.as_ref()) {
            updates.extend(converters.inner.convert(payload, container));
        }
        for event in &bunch.local_events {
            updates.extend(converters.local.convert(event, container));
        }
        let applied = updates.len();
        let update = EventHandlerUpdate::fold(updates);

        if update.has_update() {
            container.rebuild_tree(&converters.root_id);
        }
        tracing::debug!(
            applied,
            has_update = update.has_update(),
            changed = update.changed_ids().map_or(0, |ids| ids.len()),
            "batch reconciled"
        );

        // No receivers is fine; the update is also returned.
        let _ = self.update_tx.send(update.clone());
        for event in &bunch.data_source_events {
            let _ = self.data_source_tx.send(event.clone());
        }

        Some(update)
    }
}
