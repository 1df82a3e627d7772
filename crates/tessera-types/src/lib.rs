//! Shared block and document types for Tessera.
//!
//! This crate is the data foundation for the reconciliation pipeline: typed
//! identifiers, block snapshots, and per-object details. It has **no internal
//! tessera dependencies**: a pure leaf crate that other crates build on.
//!
//! # Shape of a document
//!
//! ```text
//! Document (DocumentId)
//!     └── root block (BlockId == DocumentId text)
//!           └── children_ids → BlockInformation ...
//!                                 └── children_ids → ...
//! Details (BlockId → key/value map), one entry per object
//! ```
//!
//! Tree shape is never stored inline: each [`BlockInformation`] lists its
//! direct children only, and the tree is reconstructed on demand.
//!
//! # Key Types
//!
//! |----------------------|-------------------------------------------------|
//! | Type                 | Purpose                                         |
//! |----------------------|-------------------------------------------------|
//! | [`BlockId`]          | Opaque block address, unique within a document  |
//! | [`DocumentId`]       | Which document (= event context)                |
//! | [`BlockInformation`] | Immutable snapshot of one block                 |
//! | [`BlockContent`]     | What a block *is* (text, divider, file, ...)    |
//! | [`Details`]          | Object metadata (title, icon, layout, ...)      |
//! |----------------------|-------------------------------------------------|

pub mod block;
pub mod details;
pub mod ids;

pub use block::{
    Alignment, BlockContent, BlockInformation, Fields, FileContent, FileState, TextContent,
    TextStyle,
};
pub use details::Details;
pub use ids::{BlockId, DocumentId, IdError};
