//! Block container: the owner of a document's live block graph.
//!
//! The pipeline never holds blocks across calls. It borrows a container for
//! the duration of one `handle`, mutates it through a [`BlockUpdater`], and
//! asks it to rebuild its tree. [`InfoContainer`] is the in-memory
//! implementation; anything implementing [`BlockContainer`] can stand in.

use std::collections::HashMap;

use tessera_types::{BlockContent, BlockId, BlockInformation, Details, FileContent, TextContent};

use crate::error::ContainerError;
use crate::index::IndexDictionary;
use crate::tree::{FlatNode, TreeBuilder};

/// Storage and tree rebuild for one document.
pub trait BlockContainer {
    /// The document's root block.
    fn root_id(&self) -> &BlockId;

    fn get(&self, id: &BlockId) -> Option<&BlockInformation>;

    fn get_mut(&mut self, id: &BlockId) -> Option<&mut BlockInformation>;

    fn contains(&self, id: &BlockId) -> bool {
        self.get(id).is_some()
    }

    /// Insert or replace a block, returning the previous snapshot.
    fn insert(&mut self, info: BlockInformation) -> Option<BlockInformation>;

    fn remove(&mut self, id: &BlockId) -> Option<BlockInformation>;

    /// All block ids, in no particular order.
    fn ids(&self) -> Vec<BlockId>;

    fn details(&self, id: &BlockId) -> Option<&Details>;

    fn set_details(&mut self, id: BlockId, details: Details);

    /// Re-derive the tree representation under `root`.
    ///
    /// Synchronous and idempotent; safe to call redundantly.
    fn rebuild_tree(&mut self, root: &BlockId);
}

// ============================================================================
// BlockUpdater
// ============================================================================

/// Mutation primitives the converters apply through.
///
/// Every method validates before it writes, so an `Err` means nothing changed.
pub struct BlockUpdater<'a, C: BlockContainer + ?Sized> {
    container: &'a mut C,
}

impl<'a, C: BlockContainer + ?Sized> BlockUpdater<'a, C> {
    pub fn new(container: &'a mut C) -> Self {
        Self { container }
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.container.contains(id)
    }

    /// Insert or replace a block.
    pub fn insert(&mut self, info: BlockInformation) {
        self.container.insert(info);
    }

    /// Remove a block and strip it from its parent's children.
    pub fn delete(&mut self, id: &BlockId) -> Result<BlockInformation, ContainerError> {
        let removed = self
            .container
            .remove(id)
            .ok_or_else(|| ContainerError::BlockNotFound(id.clone()))?;

        for parent in self.container.ids() {
            if let Some(info) = self.container.get_mut(&parent) {
                info.children_ids.retain(|child| child != id);
            }
        }
        Ok(removed)
    }

    pub fn set_children(
        &mut self,
        id: &BlockId,
        children_ids: Vec<BlockId>,
    ) -> Result<(), ContainerError> {
        self.update(id, |info| info.children_ids = children_ids)
    }

    /// Apply `f` to a block.
    pub fn update(
        &mut self,
        id: &BlockId,
        f: impl FnOnce(&mut BlockInformation),
    ) -> Result<(), ContainerError> {
        let info = self
            .container
            .get_mut(id)
            .ok_or_else(|| ContainerError::BlockNotFound(id.clone()))?;
        f(info);
        Ok(())
    }

    /// Apply `f` to a text block's content.
    pub fn update_text(
        &mut self,
        id: &BlockId,
        f: impl FnOnce(&mut TextContent),
    ) -> Result<(), ContainerError> {
        let info = self
            .container
            .get_mut(id)
            .ok_or_else(|| ContainerError::BlockNotFound(id.clone()))?;
        let kind = info.content.kind();
        let text = info
            .content
            .as_text_mut()
            .ok_or_else(|| ContainerError::UnsupportedContent {
                id: id.clone(),
                kind,
            })?;
        f(text);
        Ok(())
    }

    /// Apply `f` to a file block's content.
    pub fn update_file(
        &mut self,
        id: &BlockId,
        f: impl FnOnce(&mut FileContent),
    ) -> Result<(), ContainerError> {
        let info = self
            .container
            .get_mut(id)
            .ok_or_else(|| ContainerError::BlockNotFound(id.clone()))?;
        let kind = info.content.kind();
        let file = info
            .content
            .as_file_mut()
            .ok_or_else(|| ContainerError::UnsupportedContent {
                id: id.clone(),
                kind,
            })?;
        f(file);
        Ok(())
    }

    /// Retarget a link block.
    pub fn set_link_target(&mut self, id: &BlockId, target: BlockId) -> Result<(), ContainerError> {
        let info = self
            .container
            .get_mut(id)
            .ok_or_else(|| ContainerError::BlockNotFound(id.clone()))?;
        match &mut info.content {
            BlockContent::Link { target: current } => {
                *current = target;
                Ok(())
            }
            other => Err(ContainerError::UnsupportedContent {
                id: id.clone(),
                kind: other.kind(),
            }),
        }
    }

    pub fn set_details(&mut self, id: BlockId, details: Details) {
        self.container.set_details(id, details);
    }

    /// Overwrite the given keys, creating the details entry if needed.
    pub fn amend_details(&mut self, id: BlockId, changes: &Details) {
        let mut details = self.container.details(&id).cloned().unwrap_or_default();
        details.amend(changes);
        self.container.set_details(id, details);
    }

    /// Remove keys. Returns false if the object has no details at all.
    pub fn unset_details(&mut self, id: &BlockId, keys: &[String]) -> bool {
        let Some(mut details) = self.container.details(id).cloned() else {
            return false;
        };
        for key in keys {
            details.remove(key);
        }
        self.container.set_details(id.clone(), details);
        true
    }
}

// ============================================================================
// InfoContainer
// ============================================================================

/// In-memory container with a flattened, position-indexed tree.
#[derive(Debug)]
pub struct InfoContainer {
    root_id: BlockId,
    blocks: HashMap<BlockId, BlockInformation>,
    details: HashMap<BlockId, Details>,
    flattened: Vec<FlatNode>,
    positions: IndexDictionary,
    rebuilds: u64,
}

impl InfoContainer {
    /// Create a container holding an empty root.
    pub fn new(root_id: BlockId) -> Self {
        let mut blocks = HashMap::new();
        blocks.insert(root_id.clone(), BlockInformation::root(root_id.clone()));
        Self {
            root_id,
            blocks,
            details: HashMap::new(),
            flattened: Vec::new(),
            positions: IndexDictionary::new(),
            rebuilds: 0,
        }
    }

    /// Create from a set of blocks and build the tree once.
    ///
    /// A root block is synthesized if `blocks` doesn't contain one.
    pub fn with_blocks(root_id: BlockId, blocks: impl IntoIterator<Item = BlockInformation>) -> Self {
        let mut container = Self::new(root_id.clone());
        for info in blocks {
            container.blocks.insert(info.id.clone(), info);
        }
        container.rebuild_tree(&root_id);
        container.rebuilds = 0;
        container
    }

    /// Block ids in display order, as of the last rebuild.
    pub fn flattened(&self) -> impl Iterator<Item = &BlockId> {
        self.flattened.iter().map(|node| &node.id)
    }

    pub fn nodes(&self) -> &[FlatNode] {
        &self.flattened
    }

    /// Display position as of the last rebuild.
    pub fn position(&self, id: &BlockId) -> Option<usize> {
        self.positions.get(id)
    }

    /// Number of tree rebuilds since construction.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl BlockContainer for InfoContainer {
    fn root_id(&self) -> &BlockId {
        &self.root_id
    }

    fn get(&self, id: &BlockId) -> Option<&BlockInformation> {
        self.blocks.get(id)
    }

    fn get_mut(&mut self, id: &BlockId) -> Option<&mut BlockInformation> {
        self.blocks.get_mut(id)
    }

    fn insert(&mut self, info: BlockInformation) -> Option<BlockInformation> {
        self.blocks.insert(info.id.clone(), info)
    }

    fn remove(&mut self, id: &BlockId) -> Option<BlockInformation> {
        self.blocks.remove(id)
    }

    fn ids(&self) -> Vec<BlockId> {
        self.blocks.keys().cloned().collect()
    }

    fn details(&self, id: &BlockId) -> Option<&Details> {
        self.details.get(id)
    }

    fn set_details(&mut self, id: BlockId, details: Details) {
        self.details.insert(id, details);
    }

    fn rebuild_tree(&mut self, root: &BlockId) {
        let blocks = &self.blocks;
        let nodes = TreeBuilder::new(|id: &BlockId| blocks.get(id)).build(root);
        self.positions.update(nodes.iter().map(|node| &node.id));
        self.flattened = nodes;
        self.rebuilds += 1;
        tracing::trace!(root = %root, rows = self.flattened.len(), "tree rebuilt");
    }
}
