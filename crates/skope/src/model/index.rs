//! Coordinates of cells in a tree model.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Model-issued token naming the node behind an index.
///
/// Carries the id of the table that minted it next to the slot key. Only that
/// table can resolve it, and only until its next clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle {
    owner: u64,
    key: u64,
}

impl NodeHandle {
    pub const fn new(owner: u64, key: u64) -> Self {
        Self { owner, key }
    }

    /// Id of the table that minted this handle.
    pub const fn owner(self) -> u64 {
        self.owner
    }

    /// Slot key, unique among the live handles of one owner.
    pub const fn as_raw(self) -> u64 {
        self.key
    }
}

/// A cell address: `(row, column)` under a parent index, plus the handle of
/// the node the row shows.
///
/// [`ModelIndex::invalid`] is the synthetic root and the parent of every
/// top-level row. Valid indices come only from a model's `index` and `parent`
/// methods and must not be kept across a reset.
///
/// Two valid indices are equal when row, column, handle and the whole parent
/// chain agree. All invalid indices are equal.
#[derive(Clone)]
pub struct ModelIndex {
    row: usize,
    column: usize,
    parent: Option<Arc<ModelIndex>>,
    handle: Option<NodeHandle>,
}

impl Default for ModelIndex {
    fn default() -> Self {
        Self::invalid()
    }
}

impl ModelIndex {
    /// The synthetic root.
    ///
    /// ```
    /// use skope::model::ModelIndex;
    ///
    /// assert!(!ModelIndex::invalid().is_valid());
    /// ```
    pub const fn invalid() -> Self {
        Self {
            row: 0,
            column: 0,
            parent: None,
            handle: None,
        }
    }

    /// Builds an index. Pass [`ModelIndex::invalid`] as `parent` for a
    /// top-level row.
    pub fn new(row: usize, column: usize, parent: ModelIndex, handle: NodeHandle) -> Self {
        Self {
            row,
            column,
            parent: parent.is_valid().then(|| Arc::new(parent)),
            handle: Some(handle),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.handle.is_some()
    }

    /// Row under the parent; 0 for the root.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Column; 0 for the root.
    pub fn column(&self) -> usize {
        self.column
    }

    pub fn parent(&self) -> ModelIndex {
        self.parent.as_deref().cloned().unwrap_or_default()
    }

    pub fn handle(&self) -> Option<NodeHandle> {
        self.handle
    }

    /// Raw handle value, 0 for the root.
    ///
    /// Equal for every column of a row, so views key per-row state on it.
    pub fn internal_id(&self) -> u64 {
        self.handle.map_or(0, NodeHandle::as_raw)
    }

    /// Number of valid ancestors: 0 for top-level rows and for the root.
    pub fn depth(&self) -> usize {
        std::iter::successors(self.parent.as_deref(), |index| index.parent.as_deref()).count()
    }
}

impl fmt::Debug for ModelIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(handle) = self.handle else {
            return f.write_str("ModelIndex(root)");
        };
        f.debug_struct("ModelIndex")
            .field("row", &self.row)
            .field("column", &self.column)
            .field("depth", &self.depth())
            .field("owner", &handle.owner())
            .field("handle", &format_args!("{:#x}", handle.as_raw()))
            .finish()
    }
}

impl PartialEq for ModelIndex {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
            && (self.handle.is_none()
                || (self.row == other.row && self.column == other.column && self.parent == other.parent))
    }
}

impl Eq for ModelIndex {}

impl Hash for ModelIndex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.handle.hash(state);
        if self.handle.is_some() {
            (self.row, self.column).hash(state);
        }
    }
}
