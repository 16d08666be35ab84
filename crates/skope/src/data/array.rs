//! Array nodes with positional elements.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use super::{IntoNode, ParentSlot, attach};
use crate::model::{DataNode, NodeError, NodeRef, WeakNodeRef, same_node};

/// An ordered sequence of unnamed elements.
///
/// Elements are named by position: the element at row `i` is called `[i]`.
pub struct ArrayNode {
    type_name: String,
    elements: RwLock<Vec<NodeRef>>,
    parent: ParentSlot,
    this: Weak<ArrayNode>,
}

impl ArrayNode {
    /// Type name used by [`ArrayNode::new`].
    pub const DEFAULT_TYPE_NAME: &'static str = "Array";

    /// Creates an empty array with the default type name.
    pub fn new() -> Arc<Self> {
        Self::with_type_name(Self::DEFAULT_TYPE_NAME)
    }

    /// Creates an empty array with a custom type name.
    pub fn with_type_name(type_name: impl Into<String>) -> Arc<Self> {
        let type_name = type_name.into();
        Arc::new_cyclic(|this| Self {
            type_name,
            elements: RwLock::new(Vec::new()),
            parent: ParentSlot::default(),
            this: this.clone(),
        })
    }

    /// Appends an element and returns its row.
    ///
    /// Fails if `node` already belongs to another container, or if it is this
    /// array or one of its ancestors.
    pub fn push(&self, node: impl IntoNode) -> Result<usize, NodeError> {
        let node = node.into_node();
        attach(self.this.clone(), &node)?;

        let mut elements = self.elements.write();
        elements.push(node);
        Ok(elements.len() - 1)
    }

    /// Returns `true` if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.read().is_empty()
    }
}

impl fmt::Display for ArrayNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}[{}]>", self.type_name, self.elements.read().len())
    }
}

impl DataNode for ArrayNode {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn child_count(&self) -> usize {
        self.elements.read().len()
    }

    fn child_at(&self, row: usize) -> Option<NodeRef> {
        self.elements.read().get(row).cloned()
    }

    fn parent(&self) -> Option<NodeRef> {
        self.parent.get()
    }

    fn row_of(&self, child: &NodeRef) -> Option<usize> {
        self.elements
            .read()
            .iter()
            .position(|element| same_node(element, child))
    }

    fn name_of(&self, child: &NodeRef) -> Option<String> {
        self.row_of(child).map(|row| format!("[{row}]"))
    }

    fn set_parent(&self, parent: WeakNodeRef) -> bool {
        self.parent.adopt(parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{BasicNode, StructNode};

    #[test]
    fn test_positional_names() {
        let array = ArrayNode::new();
        assert!(array.is_empty());
        array.push(BasicNode::new("float", 0.5)).unwrap();
        array.push(BasicNode::new("float", 0.5)).unwrap();

        let second = array.child_at(1).unwrap();
        assert_eq!(array.row_of(&second), Some(1));
        assert_eq!(array.name_of(&second).as_deref(), Some("[1]"));
        assert_eq!(array.type_name(), "Array");
        assert_eq!(array.to_string(), "<Array[2]>");
    }

    #[test]
    fn test_custom_type_name() {
        let array = ArrayNode::with_type_name("Ref[]");
        assert_eq!(array.type_name(), "Ref[]");
    }

    #[test]
    fn test_elements_point_back_to_array() {
        let array = ArrayNode::new();
        array.push(BasicNode::new("int", 7)).unwrap();
        let array_ref: NodeRef = array.clone();

        let element = array.child_at(0).unwrap();
        assert!(same_node(&element.parent().unwrap(), &array_ref));
    }

    #[test]
    fn test_nested_array_cannot_be_pushed_twice() {
        let outer = ArrayNode::new();
        let inner = ArrayNode::new();
        let inner_ref: NodeRef = inner;

        outer.push(inner_ref.clone()).unwrap();
        assert!(outer.push(inner_ref).is_err());
        assert_eq!(outer.child_count(), 1);
    }

    #[test]
    fn test_rejects_cycles() {
        let outer = ArrayNode::new();
        let middle = StructNode::new("Middle");
        let inner = ArrayNode::new();
        outer.push(middle.clone()).unwrap();
        middle.add_field("items", inner.clone()).unwrap();

        assert!(matches!(inner.push(inner.clone()), Err(NodeError::Cycle { .. })));
        assert!(matches!(inner.push(outer.clone()), Err(NodeError::Cycle { .. })));
        assert!(inner.is_empty());
        assert!(outer.parent().is_none());
    }
}
