//! Views that present an [`ItemModel`](crate::model::ItemModel).

mod tree_view;

pub use tree_view::{TreeView, VisibleRow};
