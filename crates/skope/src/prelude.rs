//! Prelude module for Skope.
//!
//! ```ignore
//! use skope::prelude::*;
//! ```

// ============================================================================
// Signal/Slot and Formatting
// ============================================================================

pub use skope_core::{ConnectionId, Signal, TreeFormatOptions, TreeStyle};

// ============================================================================
// Nodes
// ============================================================================

pub use crate::data::{ArrayNode, BasicNode, StructNode};
pub use crate::model::{CapabilityError, DataNode, NodeRef, Value, ValueResult};

// ============================================================================
// Model/View
// ============================================================================

pub use crate::model::{
    BlockModel, Column, ItemData, ItemFlags, ItemModel, ItemRole, ModelIndex, Orientation,
};
pub use crate::view::TreeView;
