//! Skope - browse parsed binary files as a tree.
//!
//! A parser turns a file into a graph of nodes implementing
//! [`DataNode`](model::DataNode). [`BlockModel`](model::BlockModel) adapts the
//! file's top-level nodes, and everything reachable from them, to the
//! [`ItemModel`](model::ItemModel) contract, which views such as
//! [`TreeView`](view::TreeView) consume.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use skope::prelude::*;
//!
//! let header = StructNode::new("Header");
//! header.add_field("Version", BasicNode::new("uint", 0x14000005u32)).unwrap();
//!
//! let blocks: Vec<NodeRef> = vec![header];
//! let model = Arc::new(BlockModel::new(blocks));
//!
//! let mut view = TreeView::new().with_model(model);
//! view.expand_all();
//! println!("{}", view.render());
//! ```

pub use skope_core::*;

pub mod data;
pub mod model;
pub mod prelude;
pub mod view;
