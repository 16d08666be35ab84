//! Model/View architecture for Skope.
//!
//! This module separates the parsed data from the way it is presented:
//!
//! - Parsers expose their output through the [`DataNode`] capability trait
//! - [`BlockModel`] adapts a collection of such nodes to the [`ItemModel`]
//!   contract
//! - Views query the model with [`ModelIndex`] and [`ItemRole`] and listen to
//!   [`ModelSignals`]
//!
//! # Core Types
//!
//! - `ModelIndex`: Identifies an item's position in a model
//! - `ItemRole`: Specifies what type of data to access
//! - `ItemData`: Data returned for a role
//! - `ItemModel`: The trait that models implement
//! - `ModelSignals`: Signals for change notifications
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  DataNode   │────>│ BlockModel  │────>│    View     │
//! │   graph     │     │ (ItemModel) │     │             │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │                   │
//!                            │  ┌─────────────┐  │
//!                            └─>│ ModelIndex  │<─┘
//!                               │  ItemRole   │
//!                               │  ItemData   │
//!                               └─────────────┘
//! ```

mod block_model;
mod identity;
mod index;
mod node;
mod role;
mod traits;

pub use block_model::{BlockModel, Column, ModelError, ModelResult};
pub use identity::{BlockIndex, NodeTable};
pub use index::{ModelIndex, NodeHandle};
pub use node::{
    ByIdentity, CapabilityError, DataNode, NodeError, NodeIdentity, NodeRef, Value, ValueResult,
    WeakNodeRef, same_node,
};
pub use role::{ItemData, ItemRole};
pub use traits::{ItemFlags, ItemModel, ModelSignals, Orientation};
