//! Event ingestion and block-tree reconciliation for Tessera documents.
//!
//! Change events arrive in batches ([`EventsBunch`]) from two origins: the
//! middleware process that owns the authoritative block graph, and the client
//! itself (optimistic local edits). The pipeline applies each event to the
//! document's [`BlockContainer`], merges the per-event effects into a single
//! [`EventHandlerUpdate`], rebuilds the tree if anything changed, and
//! publishes that one update to subscribers.
//!
//! # Data flow
//!
//! ```text
//! producer ─ EventsBunch::send ─ EventRegistry (by DocumentId)
//!     ─ Document (lock) ─ EventHandler::handle
//!         ─ InnerConverter / LocalConverter ─ EventHandlerUpdate::fold
//!         ─ BlockContainer::rebuild_tree ─ broadcast to subscribers
//! ```
//!
//! # Failure policy
//!
//! Nothing here returns an error across the pipeline boundary. Unknown events
//! are skipped, events that don't apply are dropped whole, and a batch for a
//! document nobody has open is dropped at dispatch.

mod bunch;
mod config;
mod container;
mod converter;
mod document;
mod error;
mod event;
mod handler;
pub mod index;
mod registry;
pub mod tree;
mod update;

pub use bunch::EventsBunch;
pub use config::{DEFAULT_CHANNEL_CAPACITY, HandlerConfig};
pub use container::{BlockContainer, BlockUpdater, InfoContainer};
pub use converter::{InnerConverter, LocalConverter};
pub use document::{Document, SharedDocument};
pub use error::{ConfigError, ContainerError};
pub use event::{DataSourceEvent, LocalEvent, MiddlewareEvent, MiddlewarePayload};
pub use handler::EventHandler;
pub use index::IndexDictionary;
pub use registry::{EventRegistry, EventSink, SharedSink};
pub use tree::{FlatNode, MAX_TREE_DEPTH, TreeBuilder};
pub use update::{DetailsUpdate, EventHandlerUpdate};
