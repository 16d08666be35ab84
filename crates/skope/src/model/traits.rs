//! The contract between tree models and the views that present them.

use skope_core::Signal;

use super::index::ModelIndex;
use super::role::{ItemData, ItemRole};

/// What a view may do with a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemFlags {
    pub selectable: bool,
    pub editable: bool,
    pub enabled: bool,
}

impl ItemFlags {
    /// An ordinary cell: enabled and selectable, not editable.
    pub fn new() -> Self {
        Self {
            selectable: true,
            editable: false,
            enabled: true,
        }
    }

    /// A cell nothing can be done with. Used for the synthetic root.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn with_editable(self, editable: bool) -> Self {
        Self { editable, ..self }
    }
}

/// Header orientation for [`ItemModel::header_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A hierarchical, column-oriented model addressed by [`ModelIndex`].
///
/// Rows hang under a parent index; the invalid index is the synthetic root
/// above the top-level rows. Implementors provide navigation
/// ([`row_count`](Self::row_count), [`index`](Self::index),
/// [`parent`](Self::parent)), cell contents ([`data`](Self::data)) and their
/// [`ModelSignals`]. The remaining methods have read-only defaults.
///
/// For any valid `parent`, `model.parent(&model.index(r, c, &parent))` must
/// equal `parent` in every column.
pub trait ItemModel: Send + Sync {
    /// Number of rows under `parent`.
    fn row_count(&self, parent: &ModelIndex) -> usize;

    /// Number of columns under `parent`.
    fn column_count(&self, parent: &ModelIndex) -> usize;

    /// Contents of the cell at `index` for `role`, or [`ItemData::None`].
    fn data(&self, index: &ModelIndex, role: ItemRole) -> ItemData;

    /// Index of the cell at `row`, `column` under `parent`, or an invalid
    /// index when out of range.
    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex;

    /// Parent of `index`; invalid for top-level rows and for the root.
    fn parent(&self, index: &ModelIndex) -> ModelIndex;

    fn signals(&self) -> &ModelSignals;

    /// Writes `value` into the cell. Returns `true` if the model changed.
    fn set_data(&self, _index: &ModelIndex, _value: ItemData, _role: ItemRole) -> bool {
        false
    }

    fn flags(&self, _index: &ModelIndex) -> ItemFlags {
        ItemFlags::new()
    }

    fn has_children(&self, parent: &ModelIndex) -> bool {
        self.row_count(parent) > 0
    }

    fn header_data(&self, _section: usize, _orientation: Orientation, _role: ItemRole) -> ItemData {
        ItemData::None
    }

    /// Display text of the cell, if it has any.
    fn display_text(&self, index: &ModelIndex) -> Option<String> {
        self.data(index, ItemRole::Display).into_text()
    }

    /// Index of another cell under the same parent as `index`.
    fn sibling(&self, index: &ModelIndex, row: usize, column: usize) -> ModelIndex {
        if !index.is_valid() {
            return ModelIndex::invalid();
        }
        self.index(row, column, &index.parent())
    }
}

/// Change notifications of a read-only model.
///
/// The only change such a model makes is a reset: the root collection is
/// replaced and every index handed out before becomes stale.
#[derive(Default)]
pub struct ModelSignals {
    /// Emitted before the root collection is replaced.
    pub model_about_to_reset: Signal<()>,
    /// Emitted once the new root collection is in place.
    pub model_reset: Signal<()>,
}

impl ModelSignals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `swap` bracketed by `model_about_to_reset` and `model_reset`.
    pub fn emit_reset(&self, swap: impl FnOnce()) {
        self.model_about_to_reset.emit(());
        swap();
        self.model_reset.emit(());
    }
}
