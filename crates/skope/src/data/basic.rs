//! Scalar leaf nodes.

use std::fmt;
use std::sync::Arc;

use super::ParentSlot;
use crate::model::{CapabilityError, DataNode, NodeRef, Value, ValueResult, WeakNodeRef};

enum Content {
    Value(Value),
    Opaque(String),
}

/// A leaf node with no children.
///
/// A basic node either carries a [`Value`] or is *opaque*: its type admits a
/// value but the producer did not decode it, so [`DataNode::value`] reports
/// [`CapabilityError::Unimplemented`] and the node's `Display` text is the
/// only rendering available.
pub struct BasicNode {
    type_name: String,
    content: Content,
    parent: ParentSlot,
}

impl BasicNode {
    /// Creates a leaf holding `value`.
    pub fn new(type_name: impl Into<String>, value: impl Into<Value>) -> Arc<Self> {
        Arc::new(Self {
            type_name: type_name.into(),
            content: Content::Value(value.into()),
            parent: ParentSlot::default(),
        })
    }

    /// Creates a leaf whose value is not decoded, displayed as `text`.
    pub fn opaque(type_name: impl Into<String>, text: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            type_name: type_name.into(),
            content: Content::Opaque(text.into()),
            parent: ParentSlot::default(),
        })
    }

    /// Creates a leaf referencing another node.
    pub fn reference(type_name: impl Into<String>, target: NodeRef) -> Arc<Self> {
        Self::new(type_name, Value::Ref(target))
    }
}

impl fmt::Display for BasicNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.content {
            Content::Value(value) => write!(f, "{value}"),
            Content::Opaque(text) => f.write_str(text),
        }
    }
}

impl DataNode for BasicNode {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn parent(&self) -> Option<NodeRef> {
        self.parent.get()
    }

    fn value(&self) -> ValueResult {
        match &self.content {
            Content::Value(value) => Ok(value.clone()),
            Content::Opaque(_) => Err(CapabilityError::Unimplemented),
        }
    }

    fn set_parent(&self, parent: WeakNodeRef) -> bool {
        self.parent.adopt(parent)
    }
}
