//! Headless tree view that lays out a model as indented text rows.
//!
//! [`TreeView`] tracks which items are expanded, flattens the visible part of
//! an [`ItemModel`] into rows, and renders those rows as a column-aligned
//! text table.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use skope::data::{BasicNode, StructNode};
//! use skope::model::{BlockModel, NodeRef};
//! use skope::view::TreeView;
//!
//! let block = StructNode::new("Header");
//! block.add_field("Version", BasicNode::new("uint", 3u32)).unwrap();
//! let blocks: Vec<NodeRef> = vec![block];
//!
//! let mut view = TreeView::new().with_model(Arc::new(BlockModel::new(blocks)));
//! view.expand_all();
//! assert_eq!(view.visible_row_count(), 2);
//! println!("{}", view.render());
//! ```

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use skope_core::logging::{span_names, targets};
use skope_core::{ConnectionId, PerfSpan, Signal, TreeFormatOptions};

use crate::model::{ItemModel, ItemRole, ModelIndex, Orientation};

#[derive(Debug, Clone)]
struct FlattenedRow {
    /// Column 0 of the row.
    index: ModelIndex,
    depth: usize,
    has_children: bool,
    is_last_child: bool,
    /// `is_last_child` of each ancestor below the top level, outermost first.
    ancestors_last: Vec<bool>,
}

/// One line of the laid-out tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleRow {
    /// Index of the row's first column.
    pub index: ModelIndex,
    /// Depth of the row; top-level items have depth 0.
    pub depth: usize,
    /// Whether the row has children.
    pub has_children: bool,
    /// Whether the row is currently expanded.
    pub is_expanded: bool,
}

/// A headless tree view over an [`ItemModel`].
///
/// Expansion state is keyed by each item's handle, so it is shared by all
/// columns of a row. When the model emits `model_reset` the view forgets
/// its expansion state and lays itself out again on next use.
///
/// [`expanded`](Self::expanded) and [`collapsed`](Self::collapsed) fire with
/// the row's index whenever a single row changes state.
pub struct TreeView {
    model: Option<Arc<dyn ItemModel>>,
    reset_connection: Option<ConnectionId>,
    model_was_reset: Arc<AtomicBool>,

    /// `internal_id` of every expanded row.
    expanded_ids: HashSet<u64>,
    flattened_rows: Vec<FlattenedRow>,
    layout_dirty: bool,

    options: TreeFormatOptions,

    pub expanded: Signal<ModelIndex>,
    pub collapsed: Signal<ModelIndex>,
}

impl Default for TreeView {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeView {
    /// Creates a view with no model.
    pub fn new() -> Self {
        Self {
            model: None,
            reset_connection: None,
            model_was_reset: Arc::new(AtomicBool::new(false)),
            expanded_ids: HashSet::new(),
            flattened_rows: Vec::new(),
            layout_dirty: true,
            options: TreeFormatOptions::default(),
            expanded: Signal::new(),
            collapsed: Signal::new(),
        }
    }

    pub fn with_model(mut self, model: Arc<dyn ItemModel>) -> Self {
        self.set_model(Some(model));
        self
    }

    pub fn with_options(mut self, options: TreeFormatOptions) -> Self {
        self.options = options;
        self
    }

    // =========================================================================
    // Model
    // =========================================================================

    pub fn model(&self) -> Option<&Arc<dyn ItemModel>> {
        self.model.as_ref()
    }

    /// Replaces the model. Expansion state starts over.
    pub fn set_model(&mut self, model: Option<Arc<dyn ItemModel>>) {
        self.disconnect_model();

        if let Some(model) = &model {
            let flag = self.model_was_reset.clone();
            let id = model.signals().model_reset.connect(move |_| {
                flag.store(true, Ordering::Release);
            });
            self.reset_connection = Some(id);
        }

        self.model = model;
        self.model_was_reset.store(false, Ordering::Release);
        self.expanded_ids.clear();
        self.layout_dirty = true;
    }

    fn disconnect_model(&mut self) {
        if let (Some(model), Some(id)) = (&self.model, self.reset_connection.take()) {
            model.signals().model_reset.disconnect(id);
        }
    }

    /// Drops state that a model reset made meaningless.
    fn sync_with_model(&mut self) {
        if self.model_was_reset.swap(false, Ordering::AcqRel) {
            tracing::debug!(target: targets::VIEW, "model reset, dropping expansion state");
            self.expanded_ids.clear();
            self.layout_dirty = true;
        }
    }

    pub fn options(&self) -> &TreeFormatOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: TreeFormatOptions) {
        self.options = options;
    }

    // =========================================================================
    // Expand/Collapse
    // =========================================================================

    /// `false` for the root, for leaves, and for anything after a reset.
    pub fn is_expanded(&self, index: &ModelIndex) -> bool {
        if !index.is_valid() || self.model_was_reset.load(Ordering::Acquire) {
            return false;
        }
        self.expanded_ids.contains(&index.internal_id())
    }

    /// Expands one row. Rows without children stay collapsed.
    pub fn expand(&mut self, index: &ModelIndex) {
        self.sync_with_model();
        if !index.is_valid() {
            return;
        }

        let Some(model) = &self.model else {
            return;
        };

        if !model.has_children(index) {
            return;
        }

        if self.expanded_ids.insert(index.internal_id()) {
            self.layout_dirty = true;
            self.expanded.emit(index.clone());
        }
    }

    /// Collapses one row. Its descendants keep their own state.
    pub fn collapse(&mut self, index: &ModelIndex) {
        self.sync_with_model();
        if !index.is_valid() {
            return;
        }

        if self.expanded_ids.remove(&index.internal_id()) {
            self.layout_dirty = true;
            self.collapsed.emit(index.clone());
        }
    }

    pub fn toggle_expanded(&mut self, index: &ModelIndex) {
        if self.is_expanded(index) {
            self.collapse(index);
        } else {
            self.expand(index);
        }
    }

    /// Expands every row that has children.
    pub fn expand_all(&mut self) {
        self.expand_to_depth(usize::MAX);
    }

    /// Expands every item whose depth is at most `depth`.
    ///
    /// `expand_to_depth(0)` expands the top-level items only, showing their
    /// direct children.
    pub fn expand_to_depth(&mut self, depth: usize) {
        self.sync_with_model();
        let Some(model) = self.model.clone() else {
            return;
        };
        self.expand_recursive(&*model, &ModelIndex::invalid(), 0, depth);
        self.layout_dirty = true;
    }

    fn expand_recursive(&mut self, model: &dyn ItemModel, parent: &ModelIndex, depth: usize, max_depth: usize) {
        let row_count = model.row_count(parent);
        for row in 0..row_count {
            let index = model.index(row, 0, parent);
            if model.has_children(&index) {
                self.expanded_ids.insert(index.internal_id());
                if depth < max_depth {
                    self.expand_recursive(model, &index, depth + 1, max_depth);
                }
            }
        }
    }

    /// Collapses everything, leaving only the top-level rows visible.
    pub fn collapse_all(&mut self) {
        self.sync_with_model();
        self.expanded_ids.clear();
        self.layout_dirty = true;
    }

    /// Expands the ancestors of `index` so its row is visible.
    pub fn expand_to_index(&mut self, index: &ModelIndex) {
        self.sync_with_model();
        if !index.is_valid() {
            return;
        }

        let Some(model) = self.model.clone() else {
            return;
        };

        let mut current = model.parent(index);
        while current.is_valid() {
            self.expanded_ids.insert(current.internal_id());
            current = model.parent(&current);
        }
        self.layout_dirty = true;
    }

    // =========================================================================
    // Layout
    // =========================================================================

    pub fn visible_row_count(&mut self) -> usize {
        self.ensure_layout();
        self.flattened_rows.len()
    }

    /// Visible rows, top to bottom.
    pub fn visible_rows(&mut self) -> Vec<VisibleRow> {
        self.ensure_layout();
        self.flattened_rows
            .iter()
            .map(|row| VisibleRow {
                index: row.index.clone(),
                depth: row.depth,
                has_children: row.has_children,
                is_expanded: self.expanded_ids.contains(&row.index.internal_id()),
            })
            .collect()
    }

    fn ensure_layout(&mut self) {
        self.sync_with_model();
        if self.layout_dirty {
            self.update_layout();
        }
    }

    fn update_layout(&mut self) {
        self.flattened_rows.clear();
        self.layout_dirty = false;

        let Some(model) = self.model.clone() else {
            return;
        };

        let mut trail = Vec::new();
        self.flatten_tree(&*model, &ModelIndex::invalid(), 0, &mut trail);
        tracing::trace!(target: targets::VIEW, rows = self.flattened_rows.len(), "layout updated");
    }

    fn flatten_tree(&mut self, model: &dyn ItemModel, parent: &ModelIndex, depth: usize, trail: &mut Vec<bool>) {
        let row_count = model.row_count(parent);

        for row in 0..row_count {
            let index = model.index(row, 0, parent);
            let has_children = model.has_children(&index);
            let is_expanded = self.expanded_ids.contains(&index.internal_id());
            let is_last_child = row == row_count - 1;

            self.flattened_rows.push(FlattenedRow {
                index: index.clone(),
                depth,
                has_children,
                is_last_child,
                ancestors_last: trail.clone(),
            });

            if has_children && is_expanded {
                if depth > 0 {
                    trail.push(is_last_child);
                }
                self.flatten_tree(model, &index, depth + 1, trail);
                if depth > 0 {
                    trail.pop();
                }
            }
        }
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Renders the visible rows as a column-aligned text table.
    ///
    /// The first column carries the tree-branch prefix. Trailing spaces are
    /// trimmed from every line, and the result ends without a newline.
    pub fn render(&mut self) -> String {
        let _perf = PerfSpan::new(span_names::RENDER);
        self.ensure_layout();

        let Some(model) = self.model.clone() else {
            return String::new();
        };

        let columns = model.column_count(&ModelIndex::invalid());
        let mut table: Vec<Vec<String>> = Vec::with_capacity(self.flattened_rows.len() + 1);

        if self.options.show_header {
            table.push(
                (0..columns)
                    .map(|section| {
                        model
                            .header_data(section, Orientation::Horizontal, ItemRole::Display)
                            .into_text()
                            .unwrap_or_default()
                    })
                    .collect(),
            );
        }

        for row in &self.flattened_rows {
            let prefix = self
                .options
                .style
                .prefix(row.depth, &row.ancestors_last, row.is_last_child);
            let mut cells = Vec::with_capacity(columns);
            for column in 0..columns {
                let index = model.sibling(&row.index, row.index.row(), column);
                let text = model.display_text(&index).unwrap_or_default();
                if column == 0 {
                    cells.push(format!("{prefix}{text}"));
                } else {
                    cells.push(text);
                }
            }
            table.push(cells);
        }

        let mut widths = vec![0usize; columns];
        for cells in &table {
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let gap = " ".repeat(self.options.column_gap);
        let lines: Vec<String> = table
            .iter()
            .map(|cells| {
                let mut line = String::new();
                for (column, cell) in cells.iter().enumerate() {
                    if column > 0 {
                        line.push_str(&gap);
                    }
                    line.push_str(cell);
                    for _ in cell.chars().count()..widths[column] {
                        line.push(' ');
                    }
                }
                line.trim_end().to_string()
            })
            .collect();

        tracing::debug!(target: targets::VIEW, lines = lines.len(), "rendered tree");
        lines.join("\n")
    }
}

impl Drop for TreeView {
    fn drop(&mut self) {
        self.disconnect_model();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ArrayNode, BasicNode, StructNode};
    use crate::model::{BlockModel, NodeRef};
    use parking_lot::Mutex;
    use skope_core::TreeStyle;

    fn model() -> Arc<BlockModel> {
        let first = StructNode::new("S");
        first.add_field("a", BasicNode::new("int", 5)).unwrap();
        let list = ArrayNode::new();
        list.push(BasicNode::new("int", 7)).unwrap();
        first.add_field("b", list).unwrap();

        let second = StructNode::new("T");
        second.add_field("c", BasicNode::new("int", 1)).unwrap();

        let blocks: Vec<NodeRef> = vec![first, second];
        Arc::new(BlockModel::new(blocks))
    }

    #[test]
    fn test_collapsed_by_default() {
        let mut view = TreeView::new().with_model(model());
        assert_eq!(view.visible_row_count(), 2);
        assert!(view.visible_rows().iter().all(|row| row.depth == 0 && row.has_children));
    }

    #[test]
    fn test_expand_and_collapse() {
        let model = model();
        let mut view = TreeView::new().with_model(model.clone());
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        view.expanded.connect(move |index| sink.lock().push(index.row()));

        let first = model.index(0, 0, &ModelIndex::invalid());
        view.expand(&first);
        assert!(view.is_expanded(&first));
        assert_eq!(view.visible_row_count(), 4);

        // Expansion is per item, not per column.
        let first_value = model.index(0, 2, &ModelIndex::invalid());
        assert!(view.is_expanded(&first_value));

        view.collapse(&first);
        assert!(!view.is_expanded(&first));
        assert_eq!(view.visible_row_count(), 2);
        assert_eq!(*events.lock(), vec![0]);

        view.toggle_expanded(&first);
        assert!(view.is_expanded(&first));
        view.toggle_expanded(&first);
        assert!(!view.is_expanded(&first));
    }

    #[test]
    fn test_leaf_cannot_expand() {
        let model = model();
        let mut view = TreeView::new().with_model(model.clone());
        let first = model.index(0, 0, &ModelIndex::invalid());
        let leaf = model.index(0, 0, &first);
        view.expand(&leaf);
        assert!(!view.is_expanded(&leaf));
    }

    #[test]
    fn test_expand_to_depth() {
        let mut view = TreeView::new().with_model(model());
        view.expand_to_depth(0);
        let depths: Vec<_> = view.visible_rows().iter().map(|row| row.depth).collect();
        assert_eq!(depths, vec![0, 1, 1, 0, 1]);

        view.expand_all();
        assert_eq!(view.visible_row_count(), 6);

        view.collapse_all();
        assert_eq!(view.visible_row_count(), 2);
    }

    #[test]
    fn test_expand_to_index() {
        let model = model();
        let mut view = TreeView::new().with_model(model.clone());
        let first = model.index(0, 0, &ModelIndex::invalid());
        let list = model.index(1, 0, &first);
        let element = model.index(0, 0, &list);

        view.expand_to_index(&element);
        assert!(view.is_expanded(&first));
        assert!(view.is_expanded(&list));
        assert_eq!(view.visible_row_count(), 5);
    }

    #[test]
    fn test_render_ascii() {
        let options = TreeFormatOptions::default().with_style(TreeStyle::Ascii);
        let mut view = TreeView::new().with_model(model()).with_options(options);
        view.expand_all();

        let expected = [
            "Name         Type   Value",
            "[0]          S",
            "+-- a        int    5",
            "`-- b        Array",
            "    `-- [0]  int    7",
            "[1]          T",
            "`-- c        int    1",
        ]
        .join("\n");
        assert_eq!(view.render(), expected);
    }

    #[test]
    fn test_render_without_header() {
        let mut view = TreeView::new()
            .with_model(model())
            .with_options(TreeFormatOptions::minimal());
        assert_eq!(view.render(), "[0]  S\n[1]  T");
    }

    #[test]
    fn test_render_without_model() {
        let mut view = TreeView::new();
        assert_eq!(view.render(), "");
        assert_eq!(view.visible_row_count(), 0);
    }

    #[test]
    fn test_model_reset_drops_expansion() {
        let model = model();
        let mut view = TreeView::new().with_model(model.clone());
        view.expand_all();
        assert_eq!(view.visible_row_count(), 6);

        let replacement: NodeRef = StructNode::new("U");
        model.set_blocks(vec![replacement]);
        assert_eq!(view.visible_row_count(), 1);
        assert!(!view.is_expanded(&model.index(0, 0, &ModelIndex::invalid())));
    }

    #[test]
    fn test_set_model_disconnects_previous() {
        let first = model();
        let mut view = TreeView::new().with_model(first.clone());
        assert_eq!(first.signals().model_reset.connection_count(), 1);

        let second: Arc<dyn ItemModel> = model();
        view.set_model(Some(second));
        assert_eq!(first.signals().model_reset.connection_count(), 0);

        drop(view);
    }
}
