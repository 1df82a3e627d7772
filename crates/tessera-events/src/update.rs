//! The merge-able "what changed" value published once per handled batch.
//!
//! # Merge law
//!
//! | lhs \ rhs   | General | Details(r) | Blocks(r) |
//! |-------------|---------|------------|-----------|
//! | General     | General | General    | General   |
//! | Details(l)  | General | Details(r) | Details(l)|
//! | Blocks(l)   | General | Details(r) | Blocks(l ∪ r) |
//!
//! `General` absorbs from either side. `Details` beats an id set from either
//! side; between two `Details` the right-hand payload wins. The law is
//! associative, so folding a batch left to right is well defined.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use tessera_types::BlockId;

/// Which object's details changed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DetailsUpdate {
    pub object_id: BlockId,
}

impl DetailsUpdate {
    pub fn new(object_id: BlockId) -> Self {
        Self { object_id }
    }
}

/// What a batch of events changed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventHandlerUpdate {
    /// Structure changed; observers relayout everything.
    General,
    /// Content of these blocks changed.
    Blocks(BTreeSet<BlockId>),
    /// Object details changed.
    Details(DetailsUpdate),
}

impl Default for EventHandlerUpdate {
    fn default() -> Self {
        Self::empty()
    }
}

impl EventHandlerUpdate {
    /// The fold seed: an empty id set, which reports no update.
    pub fn empty() -> Self {
        Self::Blocks(BTreeSet::new())
    }

    /// An id-set update for a single block.
    pub fn block(id: BlockId) -> Self {
        Self::Blocks(BTreeSet::from([id]))
    }

    pub fn blocks(ids: impl IntoIterator<Item = BlockId>) -> Self {
        Self::Blocks(ids.into_iter().collect())
    }

    pub fn details(object_id: BlockId) -> Self {
        Self::Details(DetailsUpdate::new(object_id))
    }

    /// Check if observers have anything to do.
    pub fn has_update(&self) -> bool {
        match self {
            Self::General | Self::Details(_) => true,
            Self::Blocks(ids) => !ids.is_empty(),
        }
    }

    /// Combine two updates per the merge law in the module docs.
    pub fn merge(lhs: Self, rhs: Self) -> Self {
        match (lhs, rhs) {
            (Self::General, _) | (_, Self::General) => Self::General,
            (_, Self::Details(details)) => Self::Details(details),
            (Self::Details(details), Self::Blocks(_)) => Self::Details(details),
            (Self::Blocks(mut left), Self::Blocks(right)) => {
                left.extend(right);
                Self::Blocks(left)
            }
        }
    }

    /// Fold updates strictly left to right, starting from [`empty`](Self::empty).
    pub fn fold(updates: impl IntoIterator<Item = Self>) -> Self {
        updates.into_iter().fold(Self::empty(), Self::merge)
    }

    /// Changed block ids, if this is an id-set update.
    pub fn changed_ids(&self) -> Option<&BTreeSet<BlockId>> {
        match self {
            Self::Blocks(ids) => Some(ids),
            _ => None,
        }
    }
}
