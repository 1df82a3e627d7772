//! Inbound event types.
//!
//! Three streams feed a document:
//!
//! - [`MiddlewareEvent`]: change messages from the middleware process. The
//!   schema belongs to the middleware; this is the closed, versioned mirror of
//!   the subset we apply, with [`MiddlewarePayload::Unknown`] for the rest.
//! - [`LocalEvent`]: changes the client makes before the middleware confirms
//!   them (optimistic edits).
//! - [`DataSourceEvent`]: list/collection refreshes that skip the block merge.
//!
//! Every variant has a dotted `subject()` for logs, in the style
//! `block.set_text` / `details.amend`.

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use tessera_types::{Alignment, BlockId, BlockInformation, Details, Fields, FileState, TextStyle};

/// One message from the middleware. `value: None` means "nothing to apply".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MiddlewareEvent {
    #[serde(default)]
    pub value: Option<MiddlewarePayload>,
}

impl MiddlewareEvent {
    pub fn new(payload: MiddlewarePayload) -> Self {
        Self {
            value: Some(payload),
        }
    }

    /// An event carrying no payload.
    pub fn empty() -> Self {
        Self { value: None }
    }
}

impl From<MiddlewarePayload> for MiddlewareEvent {
    fn from(payload: MiddlewarePayload) -> Self {
        Self::new(payload)
    }
}

/// Change messages originated by the middleware.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, IntoStaticStr)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MiddlewarePayload {
    /// New blocks. Parents' children lists arrive separately.
    #[strum(serialize = "block.add")]
    BlockAdd { blocks: Vec<BlockInformation> },

    #[strum(serialize = "block.delete")]
    BlockDelete { block_ids: Vec<BlockId> },

    #[strum(serialize = "block.set_children_ids")]
    BlockSetChildrenIds {
        id: BlockId,
        children_ids: Vec<BlockId>,
    },

    /// Text content change. Only present fields are applied.
    #[strum(serialize = "block.set_text")]
    BlockSetText {
        id: BlockId,
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        style: Option<TextStyle>,
        #[serde(default)]
        checked: Option<bool>,
        #[serde(default)]
        color: Option<String>,
    },

    #[strum(serialize = "block.set_fields")]
    BlockSetFields { id: BlockId, fields: Fields },

    #[strum(serialize = "block.set_background_color")]
    BlockSetBackgroundColor {
        id: BlockId,
        #[serde(default)]
        color: Option<String>,
    },

    #[strum(serialize = "block.set_align")]
    BlockSetAlign { id: BlockId, align: Alignment },

    #[strum(serialize = "block.set_file")]
    BlockSetFile {
        id: BlockId,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        state: Option<FileState>,
    },

    #[strum(serialize = "block.set_link")]
    BlockSetLink { id: BlockId, target: BlockId },

    /// Replace an object's details wholesale.
    #[strum(serialize = "details.set")]
    ObjectDetailsSet { id: BlockId, details: Details },

    /// Overwrite some keys of an object's details.
    #[strum(serialize = "details.amend")]
    ObjectDetailsAmend { id: BlockId, details: Details },

    #[strum(serialize = "details.unset")]
    ObjectDetailsUnset { id: BlockId, keys: Vec<String> },

    /// A message kind this client does not apply.
    #[strum(serialize = "unknown")]
    #[serde(other)]
    Unknown,
}

impl MiddlewarePayload {
    pub fn subject(&self) -> &'static str {
        self.into()
    }

    /// The block or object this payload targets, if it has a single one.
    pub fn target(&self) -> Option<&BlockId> {
        match self {
            Self::BlockSetChildrenIds { id, .. }
            | Self::BlockSetText { id, .. }
            | Self::BlockSetFields { id, .. }
            | Self::BlockSetBackgroundColor { id, .. }
            | Self::BlockSetAlign { id, .. }
            | Self::BlockSetFile { id, .. }
            | Self::BlockSetLink { id, .. }
            | Self::ObjectDetailsSet { id, .. }
            | Self::ObjectDetailsAmend { id, .. }
            | Self::ObjectDetailsUnset { id, .. } => Some(id),
            Self::BlockAdd { .. } | Self::BlockDelete { .. } | Self::Unknown => None,
        }
    }

    /// Check if applying this reshapes the tree.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::BlockAdd { .. } | Self::BlockDelete { .. } | Self::BlockSetChildrenIds { .. }
        )
    }
}

/// Locally originated change notifications.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, IntoStaticStr)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocalEvent {
    #[strum(serialize = "local.set_text")]
    SetText { id: BlockId, text: String },

    #[strum(serialize = "local.set_style")]
    SetStyle { id: BlockId, style: TextStyle },

    #[strum(serialize = "local.set_toggled")]
    SetToggled { id: BlockId, toggled: bool },

    /// A file block started uploading.
    #[strum(serialize = "local.set_loading_state")]
    SetLoadingState { id: BlockId },

    #[strum(serialize = "local.set_children")]
    SetChildren {
        id: BlockId,
        children_ids: Vec<BlockId>,
    },

    /// Amend an object's details.
    #[strum(serialize = "local.set_details")]
    SetDetails { id: BlockId, details: Details },

    /// Force a full relayout without touching the container.
    #[strum(serialize = "local.reload")]
    Reload,
}

impl LocalEvent {
    pub fn subject(&self) -> &'static str {
        self.into()
    }
}

/// List/collection refresh messages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSourceEvent {
    #[strum(serialize = "data_source.reload")]
    Reload,

    #[strum(serialize = "data_source.update_rows")]
    UpdateRows { ids: Vec<BlockId> },
}

impl DataSourceEvent {
    pub fn subject(&self) -> &'static str {
        self.into()
    }
}
