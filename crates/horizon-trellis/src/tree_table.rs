//! Composite tree-table adapter.
//!
//! Tree-table widgets require one model that answers both the table
//! contract (rows, columns, cells, sorting) and the tree contract (root,
//! children, paths). [`TreeTableAdapter`] satisfies the dual interface by
//! composition: it owns a [`RowModelAdapter`] and a [`TreeModelAdapter`]
//! over the same bound collection and column configuration, duplicating no
//! state. Only the tree facet tracks hierarchical structure; when a cell
//! is reached through a tree node, the table facet is asked for the value
//! keyed by entity rather than by row.
//!
//! Flat row addressing (`item_at`, `index_of`) is unsupported here: once
//! rows are organized hierarchically with variable expansion state, a flat
//! position identifies nothing. Those calls fail loudly with
//! [`BindingError::UnsupportedInTreeMode`] so misuse surfaces immediately
//! instead of corrupting the display.

use std::sync::Arc;

use parking_lot::Mutex;

use horizon_trellis_core::{ConnectionId, Signal};

use crate::column::{Column, SortKey};
use crate::entity::{Entity, EntityKey};
use crate::error::{BindingError, Result};
use crate::node::{DisplayNode, NodePath};
use crate::row_adapter::{RowModelAdapter, TableSignals};
use crate::source::HierarchicalSource;
use crate::tree_adapter::{TreeModelAdapter, TreeSignals, root_path};
use crate::value::CellValue;

/// Signals emitted by the composite adapter.
pub struct TreeTableSignals {
    /// Emitted exactly once per collection mutation, scoped at the current
    /// root path: re-derive the visible tree from the root down. `None`
    /// means the collection became empty.
    pub structure_changed: Signal<Option<NodePath>>,
}

impl TreeTableSignals {
    fn new() -> Self {
        Self {
            structure_changed: Signal::new(),
        }
    }
}

/// Dual table+tree model over one observable hierarchical collection.
///
/// Constructed bound to one datasource and one column list; registers its
/// collection listener immediately and keeps it for its whole lifetime.
/// The owning view must call [`detach`](TreeTableAdapter::detach) on
/// teardown — that releases the composite's subscription and both
/// delegates'.
///
/// # Change propagation
///
/// The adapter makes no attempt at incremental reconciliation. Every
/// collection mutation produces a single structural notification rooted at
/// the current root; the presentation layer re-derives the visible tree
/// from there. Incremental tree-diffing under arbitrary inserts, removes
/// and reparenting would buy redraw efficiency at considerable complexity,
/// and the bound collections are UI-scale.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use horizon_trellis::{
///     CellValue, CollectionSource, Column, Entity, EntityKey, HierarchicalSource,
///     TreeTableAdapter,
/// };
///
/// # #[derive(Clone)]
/// # struct Task { key: EntityKey, parent: Option<EntityKey>, name: String }
/// # impl Entity for Task {
/// #     fn key(&self) -> EntityKey { self.key }
/// #     fn attribute(&self, name: &str) -> CellValue {
/// #         if name == "name" { CellValue::from(self.name.as_str()) } else { CellValue::None }
/// #     }
/// #     fn set_attribute(&mut self, _name: &str, _value: CellValue) -> bool { false }
/// # }
/// let collection = Arc::new(CollectionSource::from_items(vec![
///     Task { key: EntityKey::new(1), parent: None, name: "Release".into() },
///     Task { key: EntityKey::new(2), parent: Some(EntityKey::new(1)), name: "Package".into() },
/// ]));
/// let source = Arc::new(HierarchicalSource::new(collection, |task: &Task| task.parent));
///
/// let adapter = TreeTableAdapter::new(
///     source,
///     vec![Column::new("name").with_caption("Name")],
///     |task: &Task| task.name.clone(),
/// );
///
/// let root = adapter.root().unwrap();
/// assert_eq!(adapter.child_count(&root), 1);
/// ```
pub struct TreeTableAdapter<E: Entity> {
    source: Arc<HierarchicalSource<E>>,
    table: RowModelAdapter<E>,
    tree: TreeModelAdapter<E>,
    signals: Arc<TreeTableSignals>,
    source_connection: Mutex<Option<ConnectionId>>,
}

impl<E: Entity> TreeTableAdapter<E> {
    /// Creates an adapter bound to the given hierarchical source and
    /// columns.
    ///
    /// `caption` produces the display text of entity-backed tree nodes.
    pub fn new<F>(source: Arc<HierarchicalSource<E>>, columns: Vec<Column>, caption: F) -> Self
    where
        F: Fn(&E) -> String + Send + Sync + 'static,
    {
        let table = RowModelAdapter::new(source.collection().clone(), columns);
        let tree = TreeModelAdapter::new(source.clone(), caption);
        let signals = Arc::new(TreeTableSignals::new());

        // Weak capture: the source owns the signal that owns this closure.
        let listener_source = Arc::downgrade(&source);
        let listener_signals = signals.clone();
        let connection = source
            .collection()
            .signals()
            .collection_changed
            .connect(move |_| {
                let Some(source) = listener_source.upgrade() else {
                    return;
                };
                listener_signals.structure_changed.emit(root_path(&source));
            });

        tracing::debug!(
            target: "horizon_trellis::tree_table",
            "tree-table adapter bound to datasource"
        );

        Self {
            source,
            table,
            tree,
            signals,
            source_connection: Mutex::new(Some(connection)),
        }
    }

    /// Returns the composite signals.
    pub fn signals(&self) -> &TreeTableSignals {
        &self.signals
    }

    /// Returns the table facet.
    pub fn table(&self) -> &RowModelAdapter<E> {
        &self.table
    }

    /// Returns the tree facet.
    pub fn tree(&self) -> &TreeModelAdapter<E> {
        &self.tree
    }

    /// Returns the table facet's signals.
    pub fn table_signals(&self) -> &TableSignals {
        self.table.signals()
    }

    /// Returns the tree facet's signals.
    pub fn tree_signals(&self) -> &TreeSignals {
        self.tree.signals()
    }

    // -------------------------------------------------------------------------
    // Node-keyed cell access
    // -------------------------------------------------------------------------

    /// Returns the value displayed at (`node`, `column`).
    ///
    /// The node is resolved through the tree facet. A node with no backing
    /// entity yields itself at column 0 — a grouping row renders its own
    /// label spanning the tree column — and `CellValue::None` everywhere
    /// else. Entity-backed nodes answer through the table facet's
    /// entity-keyed lookup.
    pub fn value_at_node(&self, node: &DisplayNode, column: usize) -> Result<CellValue> {
        match self
            .tree
            .with_entity(node, |entity| self.table.value_for(entity, column))
        {
            Some(value) => value,
            None => {
                // Still fail loudly on a bad column for label-only rows.
                self.table.column(column)?;
                if column == 0 {
                    Ok(CellValue::Node(node.clone()))
                } else {
                    Ok(CellValue::None)
                }
            }
        }
    }

    /// Returns `true` if cells of `column` accept edits when reached
    /// through a tree node.
    ///
    /// Editability is a column property; the node does not influence the
    /// answer.
    pub fn is_node_cell_editable(&self, _node: &DisplayNode, column: usize) -> bool {
        self.table.is_cell_editable(0, column)
    }

    // -------------------------------------------------------------------------
    // Table facet (delegated verbatim)
    // -------------------------------------------------------------------------

    /// Returns the number of configured columns.
    pub fn column_count(&self) -> usize {
        self.table.column_count()
    }

    /// Returns the caption of the column at `index`.
    pub fn column_caption(&self, index: usize) -> Result<&str> {
        self.table.column_caption(index)
    }

    /// Returns the current number of visible rows.
    pub fn row_count(&self) -> usize {
        self.table.row_count()
    }

    /// Returns the value displayed at (`row`, `column`).
    pub fn value_at(&self, row: usize, column: usize) -> Result<CellValue> {
        self.table.value_at(row, column)
    }

    /// Writes `value` back to the bound entity's attribute.
    pub fn set_value_at(&self, value: CellValue, row: usize, column: usize) -> Result<()> {
        self.table.set_value_at(value, row, column)
    }

    /// Returns `true` if cells of `column` accept edits.
    pub fn is_cell_editable(&self, row: usize, column: usize) -> bool {
        self.table.is_cell_editable(row, column)
    }

    /// Reorders the flat projection by the given sort keys.
    pub fn sort(&self, keys: &[SortKey]) -> Result<()> {
        self.table.sort(keys)
    }

    /// Marks the column at `index` as computed.
    pub fn set_column_generated(&self, index: usize) -> Result<()> {
        self.table.set_column_generated(index)
    }

    // -------------------------------------------------------------------------
    // Flat addressing (unsupported in tree-table mode)
    // -------------------------------------------------------------------------

    /// Always fails: flat row positions identify nothing once rows are
    /// organized hierarchically.
    pub fn item_at(&self, _row: usize) -> Result<E> {
        Err(BindingError::UnsupportedInTreeMode {
            operation: "item_at",
        })
    }

    /// Always fails: flat row positions identify nothing once rows are
    /// organized hierarchically.
    pub fn index_of(&self, _key: EntityKey) -> Result<usize> {
        Err(BindingError::UnsupportedInTreeMode {
            operation: "index_of",
        })
    }

    // -------------------------------------------------------------------------
    // Tree facet (delegated verbatim)
    // -------------------------------------------------------------------------

    /// Returns the top-level display node, or `None` if the collection is
    /// empty.
    pub fn root(&self) -> Option<DisplayNode> {
        self.tree.root()
    }

    /// Returns the number of direct children of `parent`.
    pub fn child_count(&self, parent: &DisplayNode) -> usize {
        self.tree.child_count(parent)
    }

    /// Returns the child of `parent` at `index`.
    pub fn child(&self, parent: &DisplayNode, index: usize) -> Result<DisplayNode> {
        self.tree.child(parent, index)
    }

    /// Returns the position of `child` among `parent`'s children.
    pub fn index_of_child(&self, parent: &DisplayNode, child: &DisplayNode) -> Option<usize> {
        self.tree.index_of_child(parent, child)
    }

    /// Resolves a display node to a clone of its backing entity.
    pub fn entity_of(&self, node: &DisplayNode) -> Option<E>
    where
        E: Clone,
    {
        self.tree.entity_of(node)
    }

    /// Returns the backing entity key, or `None` for synthetic nodes.
    pub fn entity_key_of(&self, node: &DisplayNode) -> Option<EntityKey> {
        self.tree.entity_key_of(node)
    }

    /// Returns the ordered chain of nodes from the root to `node`.
    pub fn path_of(&self, node: &DisplayNode) -> Option<NodePath> {
        self.tree.path_of(node)
    }

    /// Returns the display text of a node.
    pub fn node_caption(&self, node: &DisplayNode) -> Option<String> {
        self.tree.node_caption(node)
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Detaches the composite and both delegates from the datasource.
    ///
    /// The owning view must call this on teardown; afterwards no further
    /// notifications reach this adapter or its consumers. Idempotent.
    pub fn detach(&self) {
        if let Some(id) = self.source_connection.lock().take() {
            self.source
                .collection()
                .signals()
                .collection_changed
                .disconnect(id);
        }
        self.table.detach();
        self.tree.detach();
        tracing::debug!(
            target: "horizon_trellis::tree_table",
            "tree-table adapter detached from datasource"
        );
    }
}
