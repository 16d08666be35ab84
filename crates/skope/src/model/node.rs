//! The capability interface that parsed data exposes to the model.
//!
//! A parser materializes a file as a graph of nodes: structures with named
//! fields, arrays with positional elements, and scalar leaves. Every node,
//! whatever its concrete type, answers the small set of questions in
//! [`DataNode`]. The model never looks past this trait.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

/// Shared handle to a node in a parsed object graph.
pub type NodeRef = Arc<dyn DataNode>;

/// Non-owning back-reference from a child to its parent.
pub type WeakNodeRef = Weak<dyn DataNode>;

/// Why a node could not produce a value.
///
/// Both variants are recoverable. Display code treats them differently:
/// an absent capability leaves the cell empty, an unimplemented one falls
/// back to the node's `Display` text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityError {
    /// This kind of node never carries a value (structures, arrays).
    #[error("node kind has no value")]
    Absent,
    /// Values make sense for this node but reading them is not implemented.
    #[error("value access not implemented for this node kind")]
    Unimplemented,
}

/// Errors raised while assembling a node graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NodeError {
    /// The node already belongs to another container.
    #[error("'{type_name}' node already has a parent")]
    AlreadyAttached {
        /// Type name of the node that was rejected.
        type_name: String,
    },

    /// The node is the container itself or one of its ancestors.
    #[error("'{type_name}' node cannot be placed inside itself")]
    Cycle {
        /// Type name of the node that was rejected.
        type_name: String,
    },
}

/// Result of probing a node's value.
pub type ValueResult = Result<Value, CapabilityError>;

/// A primitive value or a reference held by a leaf node.
#[derive(Clone)]
pub enum Value {
    /// An empty reference or missing value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer value.
    Int(i64),
    /// Unsigned integer value.
    UInt(u64),
    /// Floating point value.
    Float(f64),
    /// Text value. May contain line breaks.
    Text(String),
    /// A reference to another node in the graph.
    Ref(NodeRef),
}

impl Value {
    /// Returns the referenced node if this is a [`Value::Ref`].
    pub fn as_node(&self) -> Option<&NodeRef> {
        match self {
            Value::Ref(node) => Some(node),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "None"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::UInt(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
            Value::Ref(node) => write!(f, "{node}"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Ref(node) => write!(f, "Ref({})", node.type_name()),
            other => write!(f, "{other}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::UInt(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::UInt(n as u64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<NodeRef> for Value {
    fn from(node: NodeRef) -> Self {
        Value::Ref(node)
    }
}

/// The capability set every node in a parsed object graph exposes.
///
/// Structural methods have leaf-shaped defaults (no children, no names), so
/// scalar types only implement [`type_name`](DataNode::type_name) and
/// [`value`](DataNode::value).
///
/// # Consistency
///
/// For every container `p` and every `i < p.child_count()`, the child
/// `c = p.child_at(i)` must report `c.parent()` as `p`, and `p.row_of(&c)`
/// must return `Some(i)`. Node identity is pointer identity of the `Arc`.
pub trait DataNode: fmt::Display + Send + Sync {
    /// Returns the name of the node's most-derived concrete kind.
    fn type_name(&self) -> &str;

    /// Returns the number of children.
    fn child_count(&self) -> usize {
        0
    }

    /// Returns the child at `row`, or `None` if out of range.
    fn child_at(&self, _row: usize) -> Option<NodeRef> {
        None
    }

    /// Returns the containing node, or `None` for a root.
    fn parent(&self) -> Option<NodeRef> {
        None
    }

    /// Returns the row at which `child` sits inside this node.
    fn row_of(&self, _child: &NodeRef) -> Option<usize> {
        None
    }

    /// Returns the name under which this node holds `child`.
    fn name_of(&self, _child: &NodeRef) -> Option<String> {
        None
    }

    /// Reads the node's value.
    fn value(&self) -> ValueResult {
        Err(CapabilityError::Absent)
    }

    /// Records `parent` as the container owning this node.
    ///
    /// Containers call this when a node is inserted. Returns `false` if the
    /// node already has a parent, in which case nothing changes. Nodes that
    /// do not track their parent keep the default, which refuses adoption.
    fn set_parent(&self, _parent: WeakNodeRef) -> bool {
        false
    }
}

impl fmt::Debug for dyn DataNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataNode")
            .field("type_name", &self.type_name())
            .field("child_count", &self.child_count())
            .finish_non_exhaustive()
    }
}

/// Pointer identity of a node.
///
/// Two `NodeIdentity` values are equal exactly when they were taken from
/// clones of the same `Arc`. Value equality of the nodes plays no role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIdentity(usize);

impl NodeIdentity {
    /// Takes the identity of `node`.
    pub fn of(node: &NodeRef) -> Self {
        Self(Arc::as_ptr(node) as *const () as usize)
    }
}

/// Returns `true` if `a` and `b` are the same node.
pub fn same_node(a: &NodeRef, b: &NodeRef) -> bool {
    NodeIdentity::of(a) == NodeIdentity::of(b)
}

/// Wrapper that lets a `NodeRef` be used as a hash key by identity.
#[derive(Clone)]
pub struct ByIdentity(pub NodeRef);

impl PartialEq for ByIdentity {
    fn eq(&self, other: &Self) -> bool {
        same_node(&self.0, &other.0)
    }
}

impl Eq for ByIdentity {}

impl Hash for ByIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        NodeIdentity::of(&self.0).hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Leaf(i64);

    impl fmt::Display for Leaf {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl DataNode for Leaf {
        fn type_name(&self) -> &str {
            "Leaf"
        }

        fn value(&self) -> ValueResult {
            Ok(Value::Int(self.0))
        }
    }

    #[test]
    fn test_identity_ignores_value_equality() {
        let a: NodeRef = Arc::new(Leaf(0));
        let b: NodeRef = Arc::new(Leaf(0));

        assert!(same_node(&a, &a.clone()));
        assert!(!same_node(&a, &b));
        assert_ne!(NodeIdentity::of(&a), NodeIdentity::of(&b));
        assert!(ByIdentity(a.clone()) == ByIdentity(a.clone()));
        assert!(ByIdentity(a) != ByIdentity(b));
    }

    #[test]
    fn test_leaf_defaults() {
        let leaf: NodeRef = Arc::new(Leaf(5));
        assert_eq!(leaf.child_count(), 0);
        assert!(leaf.child_at(0).is_none());
        assert!(leaf.parent().is_none());
        assert!(!leaf.set_parent(Weak::<Leaf>::new()));
        assert_eq!(leaf.value().map(|v| v.to_string()), Ok("5".to_string()));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_string(), "None");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from(-3).to_string(), "-3");
        assert_eq!(Value::from(7u32).to_string(), "7");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::from("a\nb").to_string(), "a\nb");

        let target: NodeRef = Arc::new(Leaf(9));
        let value = Value::from(target);
        assert_eq!(value.to_string(), "9");
        assert!(value.as_node().is_some());
    }
}
