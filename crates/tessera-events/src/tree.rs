//! Flattening a block tree into display order.
//!
//! Walks `children_ids` depth-first from a root (the root itself is not
//! emitted). Children of a closed toggle are hidden. Each id is emitted at
//! most once, so a cycle or a block listed under two parents can't loop or
//! duplicate rows.

use std::collections::HashSet;

use tessera_types::{BlockId, BlockInformation};

/// Traversal circuit breaker. Real documents nest a few levels; hitting this
/// means corruption.
pub const MAX_TREE_DEPTH: usize = 512;

/// One row of the flattened tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatNode {
    pub id: BlockId,
    pub parent_id: BlockId,
    /// 0 for direct children of the root.
    pub depth: usize,
}

/// Builds display order from a block lookup.
pub struct TreeBuilder<F> {
    lookup: F,
}

impl<'a, F> TreeBuilder<F>
where
    F: Fn(&BlockId) -> Option<&'a BlockInformation>,
{
    pub fn new(lookup: F) -> Self {
        Self { lookup }
    }

    /// Flatten the tree under `root`. Unknown children are skipped.
    pub fn build(&self, root: &BlockId) -> Vec<FlatNode> {
        let mut nodes = Vec::new();
        let Some(root_info) = (self.lookup)(root) else {
            tracing::debug!(root = %root, "tree root missing, empty layout");
            return nodes;
        };

        let mut seen: HashSet<BlockId> = HashSet::from([root.clone()]);
        let mut stack: Vec<(BlockId, BlockId, usize)> = root_info
            .children_ids
            .iter()
            .rev()
            .map(|child| (child.clone(), root.clone(), 0))
            .collect();

        while let Some((id, parent_id, depth)) = stack.pop() {
            if !seen.insert(id.clone()) {
                tracing::warn!(block = %id, "block reachable twice in tree, skipping");
                continue;
            }
            let Some(info) = (self.lookup)(&id) else {
                continue;
            };
            if depth >= MAX_TREE_DEPTH {
                tracing::warn!("tree walk hit MAX_TREE_DEPTH ({MAX_TREE_DEPTH}), truncating");
                continue;
            }

            if !info.is_collapsed() {
                for child in info.children_ids.iter().rev() {
                    stack.push((child.clone(), id.clone(), depth + 1));
                }
            }
            nodes.push(FlatNode {
                id,
                parent_id,
                depth,
            });
        }

        nodes
    }
}
