//! Structure nodes with named fields.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use super::{IntoNode, ParentSlot, attach};
use crate::model::{DataNode, NodeError, NodeRef, WeakNodeRef, same_node};

struct Field {
    name: String,
    node: NodeRef,
}

/// A structure whose children are named fields.
///
/// Fields keep their insertion order, which is the row order shown in views.
/// Structures carry no value of their own.
pub struct StructNode {
    type_name: String,
    fields: RwLock<Vec<Field>>,
    parent: ParentSlot,
    this: Weak<StructNode>,
}

impl StructNode {
    /// Creates an empty structure of the given type.
    pub fn new(type_name: impl Into<String>) -> Arc<Self> {
        let type_name = type_name.into();
        Arc::new_cyclic(|this| Self {
            type_name,
            fields: RwLock::new(Vec::new()),
            parent: ParentSlot::default(),
            this: this.clone(),
        })
    }

    /// Appends a field and returns its row.
    ///
    /// Fails if `node` already belongs to another container, or if it is this
    /// structure or one of its ancestors.
    pub fn add_field(&self, name: impl Into<String>, node: impl IntoNode) -> Result<usize, NodeError> {
        let node = node.into_node();
        attach(self.this.clone(), &node)?;

        let mut fields = self.fields.write();
        fields.push(Field {
            name: name.into(),
            node,
        });
        Ok(fields.len() - 1)
    }

    /// Returns the field called `name`, if any.
    pub fn field(&self, name: &str) -> Option<NodeRef> {
        self.fields
            .read()
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.node.clone())
    }

    /// Returns the field names in row order.
    pub fn field_names(&self) -> Vec<String> {
        self.fields.read().iter().map(|field| field.name.clone()).collect()
    }
}

impl fmt::Display for StructNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.type_name)
    }
}

impl DataNode for StructNode {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn child_count(&self) -> usize {
        self.fields.read().len()
    }

    fn child_at(&self, row: usize) -> Option<NodeRef> {
        self.fields.read().get(row).map(|field| field.node.clone())
    }

    fn parent(&self) -> Option<NodeRef> {
        self.parent.get()
    }

    fn row_of(&self, child: &NodeRef) -> Option<usize> {
        self.fields
            .read()
            .iter()
            .position(|field| same_node(&field.node, child))
    }

    fn name_of(&self, child: &NodeRef) -> Option<String> {
        self.fields
            .read()
            .iter()
            .find(|field| same_node(&field.node, child))
            .map(|field| field.name.clone())
    }

    fn set_parent(&self, parent: WeakNodeRef) -> bool {
        self.parent.adopt(parent)
    }
}
