//! Prelude module for Horizon Trellis.
//!
//! This module re-exports the most commonly used types for convenient importing:
//!
//! ```ignore
//! use horizon_trellis::prelude::*;
//! ```
//!
//! This provides access to:
//! - Signal/slot system (`Signal`, `ConnectionId`)
//! - Datasources (`CollectionSource`, `HierarchicalSource`, `ChangeKind`)
//! - Entity model (`Entity`, `EntityKey`, `CellValue`)
//! - Adapters (`RowModelAdapter`, `TreeModelAdapter`, `TreeTableAdapter`)

// ============================================================================
// Signal/Slot System
// ============================================================================

pub use horizon_trellis_core::{ConnectionGuard, ConnectionId, Signal};

// ============================================================================
// Entity Model
// ============================================================================

pub use crate::entity::{Entity, EntityKey};
pub use crate::value::CellValue;

// ============================================================================
// Datasources
// ============================================================================

pub use crate::source::{ChangeKind, CollectionSource, HierarchicalSource};

// ============================================================================
// Display Model
// ============================================================================

pub use crate::column::{Column, SortDirection, SortKey};
pub use crate::node::{DisplayNode, NodePath};

// ============================================================================
// Adapters
// ============================================================================

pub use crate::row_adapter::RowModelAdapter;
pub use crate::tree_adapter::TreeModelAdapter;
pub use crate::tree_table::TreeTableAdapter;

// ============================================================================
// Errors
// ============================================================================

pub use crate::error::{BindingError, Result};
