//! Tree model over a collection of parsed blocks.
//!
//! `BlockModel` presents an ordered list of root nodes ("blocks") and every
//! node reachable from them through [`DataNode`](super::DataNode) as a
//! three-column tree: name, type, and value.

use parking_lot::RwLock;
use skope_core::PerfSpan;
use skope_core::logging::{span_names, targets};
use static_assertions::assert_impl_all;

use super::identity::{BlockIndex, NodeTable};
use super::index::ModelIndex;
use super::node::{CapabilityError, NodeRef, Value};
use super::role::{ItemData, ItemRole};
use super::traits::{ItemFlags, ItemModel, ModelSignals, Orientation};

/// The fixed columns of a [`BlockModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// Name under which the parent holds the node, or `[i]` for blocks.
    Name,
    /// Concrete type name of the node.
    Type,
    /// Rendered value of the node, if it has one.
    Value,
}

impl Column {
    /// Number of columns.
    pub const COUNT: usize = 3;

    /// All columns in display order.
    pub const ALL: [Column; Self::COUNT] = [Column::Name, Column::Type, Column::Value];

    /// Returns the column at position `index`.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Returns the position of this column.
    pub fn index(self) -> usize {
        match self {
            Column::Name => 0,
            Column::Type => 1,
            Column::Value => 2,
        }
    }

    /// Returns the header title.
    pub fn title(self) -> &'static str {
        match self {
            Column::Name => "Name",
            Column::Type => "Type",
            Column::Value => "Value",
        }
    }
}

/// Errors from resolving a model index to a node.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// The index is the synthetic root, which addresses no node.
    #[error("the root index does not address a node")]
    SyntheticRoot,

    /// The index was not produced by this model, or a reset made it stale.
    #[error("index handle {handle:#x} was not issued by this model or is stale")]
    ForeignIndex {
        /// Raw handle carried by the rejected index.
        handle: u64,
    },
}

/// Result type for model lookups.
pub type ModelResult<T> = Result<T, ModelError>;

struct BlockState {
    blocks: Vec<NodeRef>,
    positions: BlockIndex,
    handles: NodeTable,
}

impl BlockState {
    fn new(blocks: Vec<NodeRef>) -> Self {
        Self {
            positions: BlockIndex::build(&blocks),
            blocks,
            handles: NodeTable::new(),
        }
    }
}

/// Read-only tree model over parsed blocks.
///
/// Rows under the root are the blocks in order. Rows under any other item
/// are the children of its node, in the order
/// [`DataNode::child_at`](super::DataNode::child_at) reports
/// them. Every row has three columns (see [`Column`]).
///
/// Nodes are matched by identity only: two distinct nodes that compare equal
/// by value always get distinct rows and indices.
///
/// # Panics
///
/// The [`ItemModel`] methods panic when handed a valid-looking index that this
/// model did not produce, or one produced before the last
/// [`set_blocks`](Self::set_blocks). Use [`node`](Self::node) for a checked
/// lookup.
///
/// # Example
///
/// ```
/// use skope::data::{BasicNode, StructNode};
/// use skope::model::{BlockModel, ItemModel, ModelIndex, NodeRef};
///
/// let block = StructNode::new("NiNode");
/// block.add_field("Flags", BasicNode::new("ushort", 14u32)).unwrap();
///
/// let blocks: Vec<NodeRef> = vec![block];
/// let model = BlockModel::new(blocks);
/// let root = ModelIndex::invalid();
/// assert_eq!(model.row_count(&root), 1);
///
/// let block_index = model.index(0, 0, &root);
/// let flags = model.index(0, 2, &block_index);
/// assert_eq!(model.display_text(&flags).as_deref(), Some("14"));
/// ```
pub struct BlockModel {
    state: RwLock<BlockState>,
    signals: ModelSignals,
}

assert_impl_all!(BlockModel: Send, Sync);

impl Default for BlockModel {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl BlockModel {
    /// Creates a model over `blocks`.
    pub fn new(blocks: Vec<NodeRef>) -> Self {
        tracing::debug!(target: targets::MODEL, blocks = blocks.len(), "block model created");
        Self {
            state: RwLock::new(BlockState::new(blocks)),
            signals: ModelSignals::new(),
        }
    }

    /// Replaces the root collection.
    ///
    /// Emits `model_about_to_reset` and `model_reset`. Every index handed out
    /// before the call becomes stale.
    pub fn set_blocks(&self, blocks: Vec<NodeRef>) {
        let _perf = PerfSpan::new(span_names::RESET);
        tracing::debug!(target: targets::MODEL, blocks = blocks.len(), "replacing root collection");
        self.signals.emit_reset(|| {
            let mut state = self.state.write();
            state.positions = BlockIndex::build(&blocks);
            state.blocks = blocks;
            // Keep the arena so cleared slots stay versioned past reuse.
            state.handles.clear();
        });
    }

    /// Returns the current root collection.
    pub fn blocks(&self) -> Vec<NodeRef> {
        self.state.read().blocks.clone()
    }

    /// Returns the number of blocks.
    pub fn block_count(&self) -> usize {
        self.state.read().blocks.len()
    }

    /// Returns the row of `node` in the root collection, if it is a block.
    pub fn block_row(&self, node: &NodeRef) -> Option<usize> {
        self.state.read().positions.row_of(node)
    }

    /// Returns the node addressed by `index`.
    pub fn node(&self, index: &ModelIndex) -> ModelResult<NodeRef> {
        let handle = index.handle().ok_or(ModelError::SyntheticRoot)?;
        self.state
            .read()
            .handles
            .resolve(handle)
            .ok_or(ModelError::ForeignIndex {
                handle: handle.as_raw(),
            })
    }

    /// Returns the index of `node` in `column`, or an invalid index if the
    /// node is not reachable from the blocks through parent links.
    pub fn index_for_node(&self, node: &NodeRef, column: usize) -> ModelIndex {
        if column >= Column::COUNT {
            return ModelIndex::invalid();
        }
        let mut state = self.state.write();
        Self::locate(&mut state, node, column).unwrap_or_else(ModelIndex::invalid)
    }

    /// Resolves `index` for the [`ItemModel`] entry points.
    ///
    /// `None` means the synthetic root.
    fn resolve(&self, index: &ModelIndex) -> Option<NodeRef> {
        match self.node(index) {
            Ok(node) => Some(node),
            Err(ModelError::SyntheticRoot) => None,
            Err(err) => {
                tracing::error!(target: targets::MODEL, %err, "rejected index");
                panic!("{err}");
            }
        }
    }

    /// Builds the index of `node` by walking parent links up to a block.
    fn locate(state: &mut BlockState, node: &NodeRef, column: usize) -> Option<ModelIndex> {
        let (row, parent) = match node.parent() {
            None => (state.positions.row_of(node)?, ModelIndex::invalid()),
            Some(parent) => {
                let row = parent.row_of(node)?;
                (row, Self::locate(state, &parent, 0)?)
            }
        };
        let handle = state.handles.intern(node);
        Some(ModelIndex::new(row, column, parent, handle))
    }

    fn name_text(&self, node: &NodeRef) -> Option<String> {
        match node.parent() {
            Some(parent) => parent.name_of(node),
            None => {
                let row = self.block_row(node);
                if row.is_none() {
                    tracing::warn!(
                        target: targets::MODEL,
                        type_name = node.type_name(),
                        "parentless node is not a block"
                    );
                }
                row.map(|row| format!("[{row}]"))
            }
        }
    }

    fn value_text(&self, node: &NodeRef) -> Option<String> {
        let text = match node.value() {
            Err(CapabilityError::Absent) => return None,
            Err(CapabilityError::Unimplemented) => node.to_string(),
            Ok(Value::Ref(target)) => match self.block_row(&target) {
                Some(row) => return Some(format!("[{row}] {}", target.type_name())),
                None => target.to_string(),
            },
            Ok(value) => value.to_string(),
        };
        Some(text.replace(['\n', '\r'], " "))
    }
}

impl ItemModel for BlockModel {
    fn row_count(&self, parent: &ModelIndex) -> usize {
        match self.resolve(parent) {
            Some(node) => node.child_count(),
            None => self.block_count(),
        }
    }

    fn column_count(&self, _parent: &ModelIndex) -> usize {
        Column::COUNT
    }

    fn data(&self, index: &ModelIndex, role: ItemRole) -> ItemData {
        if role != ItemRole::Display {
            return ItemData::None;
        }
        let Some(node) = self.resolve(index) else {
            return ItemData::None;
        };

        match Column::from_index(index.column()) {
            Some(Column::Name) => self.name_text(&node).into(),
            Some(Column::Type) => ItemData::from(node.type_name()),
            Some(Column::Value) => self.value_text(&node).into(),
            None => ItemData::None,
        }
    }

    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex {
        if column >= Column::COUNT {
            return ModelIndex::invalid();
        }

        let child = match self.resolve(parent) {
            Some(node) => node.child_at(row),
            None => self.state.read().blocks.get(row).cloned(),
        };
        let Some(child) = child else {
            return ModelIndex::invalid();
        };

        let handle = self.state.write().handles.intern(&child);
        ModelIndex::new(row, column, parent.clone(), handle)
    }

    fn parent(&self, index: &ModelIndex) -> ModelIndex {
        let Some(node) = self.resolve(index) else {
            return ModelIndex::invalid();
        };
        let Some(parent) = node.parent() else {
            return ModelIndex::invalid();
        };

        let mut state = self.state.write();
        let located = match parent.parent() {
            None => state.positions.row_of(&parent).map(|row| {
                let handle = state.handles.intern(&parent);
                ModelIndex::new(row, 0, ModelIndex::invalid(), handle)
            }),
            Some(_) => Self::locate(&mut state, &parent, 0),
        };

        located.unwrap_or_else(|| {
            tracing::warn!(
                target: targets::MODEL,
                type_name = parent.type_name(),
                "parent is not reachable from any block"
            );
            ModelIndex::invalid()
        })
    }

    fn signals(&self) -> &ModelSignals {
        &self.signals
    }

    fn set_data(&self, index: &ModelIndex, _value: ItemData, role: ItemRole) -> bool {
        // Writing values back into parsed nodes is not supported.
        tracing::debug!(
            target: targets::MODEL,
            row = index.row(),
            column = index.column(),
            ?role,
            "set_data ignored, model is read-only"
        );
        false
    }

    fn flags(&self, index: &ModelIndex) -> ItemFlags {
        let Some(node) = self.resolve(index) else {
            return ItemFlags::disabled();
        };
        let editable = Column::from_index(index.column()) == Some(Column::Value) && node.value().is_ok();
        ItemFlags::new().with_editable(editable)
    }

    fn header_data(&self, section: usize, orientation: Orientation, role: ItemRole) -> ItemData {
        if orientation != Orientation::Horizontal || role != ItemRole::Display {
            return ItemData::None;
        }
        Column::from_index(section)
            .map(|column| ItemData::from(column.title()))
            .unwrap_or_default()
    }
}
