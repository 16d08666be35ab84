//! Generic node kinds for building parsed object graphs.
//!
//! Parsers that have no node types of their own can assemble their output
//! from these three building blocks:
//!
//! - [`StructNode`]: named fields, each itself a node
//! - [`ArrayNode`]: positional elements, shown as `[0]`, `[1]`, ...
//! - [`BasicNode`]: a scalar leaf carrying a [`Value`](crate::model::Value)
//!
//! # Example
//!
//! ```
//! use skope::data::{ArrayNode, BasicNode, StructNode};
//!
//! let header = StructNode::new("Header");
//! header.add_field("Version", BasicNode::new("uint", 3u32)).unwrap();
//!
//! let sizes = ArrayNode::new();
//! sizes.push(BasicNode::new("ushort", 16u32)).unwrap();
//! header.add_field("Sizes", sizes).unwrap();
//! ```
//!
//! References between nodes ([`Value::Ref`](crate::model::Value::Ref)) are
//! strong; a reference from a node to one of its own ancestors keeps that
//! subgraph alive until the reference is dropped.

mod array;
mod basic;
mod structure;

use std::sync::Arc;

use parking_lot::RwLock;

use crate::model::{NodeError, NodeRef, WeakNodeRef, same_node};

pub use array::ArrayNode;
pub use basic::BasicNode;
pub use structure::StructNode;

/// Conversion into a shared node handle.
///
/// Lets container methods accept both concrete `Arc<...Node>` values and
/// already type-erased [`NodeRef`]s.
pub trait IntoNode {
    /// Converts `self` into a [`NodeRef`].
    fn into_node(self) -> NodeRef;
}

impl IntoNode for NodeRef {
    fn into_node(self) -> NodeRef {
        self
    }
}

impl IntoNode for Arc<StructNode> {
    fn into_node(self) -> NodeRef {
        self
    }
}

impl IntoNode for Arc<ArrayNode> {
    fn into_node(self) -> NodeRef {
        self
    }
}

impl IntoNode for Arc<BasicNode> {
    fn into_node(self) -> NodeRef {
        self
    }
}

/// Back-reference slot shared by the generic node kinds.
#[derive(Default)]
struct ParentSlot(RwLock<Option<WeakNodeRef>>);

impl ParentSlot {
    fn get(&self) -> Option<NodeRef> {
        self.0.read().as_ref().and_then(|parent| parent.upgrade())
    }

    /// Stores `parent` unless a live parent is already recorded.
    fn adopt(&self, parent: WeakNodeRef) -> bool {
        let mut slot = self.0.write();
        if slot.as_ref().is_some_and(|current| current.strong_count() > 0) {
            return false;
        }
        *slot = Some(parent);
        true
    }
}

/// Makes `owner` the parent of `node`.
///
/// Fails if `node` already has a live parent, or if it is `owner` or one of
/// `owner`'s ancestors.
fn attach(owner: WeakNodeRef, node: &NodeRef) -> Result<(), NodeError> {
    let mut lineage = std::iter::successors(owner.upgrade(), |ancestor| ancestor.parent());
    if lineage.any(|ancestor| same_node(&ancestor, node)) {
        return Err(NodeError::Cycle {
            type_name: node.type_name().to_string(),
        });
    }
    if !node.set_parent(owner) {
        return Err(NodeError::AlreadyAttached {
            type_name: node.type_name().to_string(),
        });
    }
    Ok(())
}
