//! Identity-keyed tables that turn domain nodes into model coordinates.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use slotmap::{Key, KeyData, SlotMap, new_key_type};

use super::index::NodeHandle;
use super::node::{NodeIdentity, NodeRef};

new_key_type! {
    struct NodeKey;
}

static NEXT_OWNER: AtomicU64 = AtomicU64::new(1);

/// Arena of nodes that have been handed out in model indices.
///
/// Each node is interned once, keyed by identity, and receives a versioned
/// [`NodeHandle`]. Clearing the table bumps every slot's version, so handles
/// minted before the clear no longer resolve even if the slot is reused.
/// Every table has its own owner id, and handles minted by another table never
/// resolve.
pub struct NodeTable {
    owner: u64,
    nodes: SlotMap<NodeKey, NodeRef>,
    keys: HashMap<NodeIdentity, NodeKey>,
}

impl Default for NodeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeTable {
    /// Creates an empty table with a fresh owner id.
    pub fn new() -> Self {
        Self {
            owner: NEXT_OWNER.fetch_add(1, Ordering::Relaxed),
            nodes: SlotMap::with_key(),
            keys: HashMap::new(),
        }
    }

    /// Id stamped into every handle this table mints.
    pub fn owner(&self) -> u64 {
        self.owner
    }

    /// Returns the handle for `node`, interning it on first use.
    pub fn intern(&mut self, node: &NodeRef) -> NodeHandle {
        let identity = NodeIdentity::of(node);
        let key = match self.keys.get(&identity) {
            Some(key) => *key,
            None => {
                let key = self.nodes.insert(node.clone());
                self.keys.insert(identity, key);
                key
            }
        };
        NodeHandle::new(self.owner, key.data().as_ffi())
    }

    /// Returns the node behind `handle`, or `None` if it was not minted by
    /// this table or has been invalidated.
    pub fn resolve(&self, handle: NodeHandle) -> Option<NodeRef> {
        if handle.owner() != self.owner {
            return None;
        }
        let key = NodeKey::from(KeyData::from_ffi(handle.as_raw()));
        self.nodes.get(key).cloned()
    }

    /// Drops every interned node and invalidates all minted handles.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.keys.clear();
    }

    /// Returns the number of interned nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no node has been interned.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Identity lookup from a block to its row in the root collection.
///
/// Built once per root assignment. If the same node appears more than once in
/// the root collection, its first row wins.
#[derive(Debug, Default)]
pub struct BlockIndex {
    rows: HashMap<NodeIdentity, usize>,
}

impl BlockIndex {
    /// Builds the lookup for `blocks`.
    pub fn build(blocks: &[NodeRef]) -> Self {
        let mut rows = HashMap::with_capacity(blocks.len());
        for (row, block) in blocks.iter().enumerate() {
            rows.entry(NodeIdentity::of(block)).or_insert(row);
        }
        Self { rows }
    }

    /// Returns the row of `node` if it is a block.
    pub fn row_of(&self, node: &NodeRef) -> Option<usize> {
        self.rows.get(&NodeIdentity::of(node)).copied()
    }

    /// Returns `true` if `node` is a block.
    pub fn contains(&self, node: &NodeRef) -> bool {
        self.rows.contains_key(&NodeIdentity::of(node))
    }

    /// Returns the number of distinct blocks.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no blocks.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
