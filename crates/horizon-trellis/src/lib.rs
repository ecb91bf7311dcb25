//! Horizon Trellis - datasource-to-model binding for tree-table views.
//!
//! Trellis bridges an observable, possibly-hierarchical collection of
//! domain entities to the dual table+tree model surface a tree-table
//! widget consumes. Data stays in the datasource; the adapters are thin,
//! synchronous view transformations with change notification.
//!
//! # Core Types
//!
//! - `CollectionSource`: an observable, ordered collection of entities
//! - `HierarchicalSource`: a derived parent/child projection over it
//! - `Column`: one display column's caption, attribute and editability
//! - `RowModelAdapter`: the table facet (flat rows and columns)
//! - `TreeModelAdapter`: the tree facet (root, children, paths)
//! - `TreeTableAdapter`: both facets behind one façade, for tree-table
//!   widgets
//!
//! # Architecture Overview
//!
//! ```text
//! ┌──────────────────┐     ┌───────────────────┐     ┌─────────────┐
//! │ CollectionSource │────>│  RowModelAdapter  │────>│             │
//! │ (entities +      │     ├───────────────────┤     │  tree-table │
//! │  change signal)  │────>│  TreeModelAdapter │────>│   widget    │
//! └──────────────────┘     ├───────────────────┤     │             │
//!          │               │  TreeTableAdapter │────>│             │
//!          └──────────────>└───────────────────┘     └─────────────┘
//! ```
//!
//! The widget queries the adapters by row/column or by display node;
//! every collection mutation fans out through the adapters' signals so
//! the widget can re-derive what it shows.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_trellis::{
//!     CellValue, CollectionSource, Column, Entity, EntityKey, HierarchicalSource,
//!     TreeTableAdapter,
//! };
//!
//! #[derive(Clone)]
//! struct Task {
//!     key: EntityKey,
//!     parent: Option<EntityKey>,
//!     name: String,
//! }
//!
//! impl Entity for Task {
//!     fn key(&self) -> EntityKey {
//!         self.key
//!     }
//!
//!     fn attribute(&self, name: &str) -> CellValue {
//!         match name {
//!             "name" => CellValue::from(self.name.as_str()),
//!             _ => CellValue::None,
//!         }
//!     }
//!
//!     fn set_attribute(&mut self, name: &str, value: CellValue) -> bool {
//!         match (name, value) {
//!             ("name", CellValue::Str(s)) => {
//!                 self.name = s;
//!                 true
//!             }
//!             _ => false,
//!         }
//!     }
//! }
//!
//! let collection = Arc::new(CollectionSource::from_items(vec![
//!     Task { key: EntityKey::new(1), parent: None, name: "Release".into() },
//!     Task { key: EntityKey::new(2), parent: Some(EntityKey::new(1)), name: "Package".into() },
//! ]));
//! let source = Arc::new(HierarchicalSource::new(collection, |task: &Task| task.parent));
//!
//! let adapter = TreeTableAdapter::new(
//!     source,
//!     vec![Column::new("name").with_caption("Name")],
//!     |task: &Task| task.name.clone(),
//! );
//!
//! let root = adapter.root().expect("collection is not empty");
//! assert_eq!(adapter.child_count(&root), 1);
//!
//! // Views must detach on teardown
//! adapter.detach();
//! ```

mod column;
mod entity;
mod error;
mod node;
pub mod prelude;
mod row_adapter;
mod source;
mod tree_adapter;
mod tree_table;
mod value;

pub use column::{Column, SortDirection, SortKey};
pub use entity::{Entity, EntityKey};
pub use error::{BindingError, Result};
pub use node::{DisplayNode, NodePath};
pub use row_adapter::{RowModelAdapter, TableSignals};
pub use source::{ChangeKind, CollectionSource, HierarchicalSource, ParentKeyFn, SourceSignals};
pub use tree_adapter::{CaptionFn, TreeModelAdapter, TreeSignals};
pub use tree_table::{TreeTableAdapter, TreeTableSignals};
pub use value::CellValue;

// Re-export the signal system that carries all change notifications
pub use horizon_trellis_core::{ConnectionGuard, ConnectionId, Signal};
