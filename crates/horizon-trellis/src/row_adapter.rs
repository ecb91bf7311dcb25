//! Table facet: flat row/column adapter over a collection datasource.
//!
//! [`RowModelAdapter`] exposes a bound [`CollectionSource`] as a flat
//! tabular model: rows in projection order, columns from a configured
//! [`Column`] list. The projection is a key vector rebuilt on every
//! collection mutation, so sorting survives refreshes and a row can never
//! silently retarget a different entity.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use horizon_trellis_core::{ConnectionId, Signal};

use crate::column::{Column, SortDirection, SortKey};
use crate::entity::{Entity, EntityKey};
use crate::error::{BindingError, Result};
use crate::source::{ChangeKind, CollectionSource};
use crate::value::CellValue;

/// Signals emitted by the table facet.
///
/// Views connect to these to stay synchronized with the flat projection.
pub struct TableSignals {
    /// Fanned out after every mutation of the bound collection, once the
    /// projection has been rebuilt.
    pub rows_changed: Signal<ChangeKind>,
    /// Emitted after the projection was reordered by [`RowModelAdapter::sort`].
    pub layout_changed: Signal<()>,
    /// Emitted after a successful write-back, with (row, column).
    pub cell_changed: Signal<(usize, usize)>,
}

impl TableSignals {
    fn new() -> Self {
        Self {
            rows_changed: Signal::new(),
            layout_changed: Signal::new(),
            cell_changed: Signal::new(),
        }
    }
}

/// Shared interior state: the flat projection and its sort specification.
struct RowState {
    /// Keys of the visible rows, in display order.
    projection: RwLock<Vec<EntityKey>>,
    /// The currently applied sort keys; empty means collection order.
    sort_keys: RwLock<Vec<SortKey>>,
}

/// Flat table model over an observable entity collection.
///
/// Bound to one datasource and one column list at construction; the
/// adapter registers a collection listener immediately and keeps it for
/// its whole lifetime. The owning view must call
/// [`detach`](RowModelAdapter::detach) on teardown — the adapter has no
/// lifecycle of its own beyond that subscription.
pub struct RowModelAdapter<E: Entity> {
    source: Arc<CollectionSource<E>>,
    columns: Arc<Vec<Column>>,
    state: Arc<RowState>,
    signals: Arc<TableSignals>,
    source_connection: Mutex<Option<ConnectionId>>,
}

impl<E: Entity> RowModelAdapter<E> {
    /// Creates an adapter bound to the given collection and columns.
    pub fn new(source: Arc<CollectionSource<E>>, columns: Vec<Column>) -> Self {
        let columns = Arc::new(columns);
        let state = Arc::new(RowState {
            projection: RwLock::new(source.keys()),
            sort_keys: RwLock::new(Vec::new()),
        });
        let signals = Arc::new(TableSignals::new());

        // The listener holds the source weakly: the source owns the signal
        // that owns this closure, so a strong reference would be a cycle.
        let listener_source = Arc::downgrade(&source);
        let listener_columns = columns.clone();
        let listener_state = state.clone();
        let listener_signals = signals.clone();
        let connection = source.signals().collection_changed.connect(move |&kind| {
            let Some(source) = listener_source.upgrade() else {
                return;
            };
            rebuild_projection(&source, &listener_columns, &listener_state);
            listener_signals.rows_changed.emit(kind);
        });

        Self {
            source,
            columns,
            state,
            signals,
            source_connection: Mutex::new(Some(connection)),
        }
    }

    /// Returns the signals for this adapter.
    pub fn signals(&self) -> &TableSignals {
        &self.signals
    }

    /// Returns the configured columns.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the number of configured columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns the caption of the column at `index`.
    pub fn column_caption(&self, index: usize) -> Result<&str> {
        self.column(index).map(|column| column.caption())
    }

    /// Returns the column descriptor at `index`.
    pub fn column(&self, index: usize) -> Result<&Column> {
        self.columns
            .get(index)
            .ok_or(BindingError::IndexOutOfRange {
                index,
                len: self.columns.len(),
            })
    }

    /// Returns the current number of visible rows.
    pub fn row_count(&self) -> usize {
        self.state.projection.read().len()
    }

    /// Returns the entity key displayed at the given row.
    pub fn entity_key_at(&self, row: usize) -> Result<EntityKey> {
        let projection = self.state.projection.read();
        projection
            .get(row)
            .copied()
            .ok_or(BindingError::IndexOutOfRange {
                index: row,
                len: projection.len(),
            })
    }

    /// Returns a clone of the entity displayed at the given row.
    pub fn item_at(&self, row: usize) -> Result<E>
    where
        E: Clone,
    {
        let key = self.entity_key_at(row)?;
        // A key whose entity vanished between rebuilds reads as a stale
        // row; surface it as out of range rather than panicking.
        self.source.get(key).ok_or(BindingError::IndexOutOfRange {
            index: row,
            len: self.row_count(),
        })
    }

    /// Returns the row position of the given entity, if visible.
    pub fn index_of(&self, key: EntityKey) -> Option<usize> {
        self.state
            .projection
            .read()
            .iter()
            .position(|&candidate| candidate == key)
    }

    /// Returns the value displayed at (`row`, `column`).
    ///
    /// A stale or missing entity is a valid "no data" state and reads as
    /// `CellValue::None`; a bad index fails.
    pub fn value_at(&self, row: usize, column: usize) -> Result<CellValue> {
        self.column(column)?;
        let key = self.entity_key_at(row)?;
        Ok(self
            .source
            .with_item(key, |item| column_value(item, &self.columns[column]))
            .unwrap_or(CellValue::None))
    }

    /// Returns the value of `column` for an entity the caller already
    /// holds, bypassing row lookup.
    ///
    /// Used by the tree facet, which addresses entities by node rather
    /// than by flat row.
    pub fn value_for(&self, entity: &E, column: usize) -> Result<CellValue> {
        self.column(column)?;
        Ok(column_value(entity, &self.columns[column]))
    }

    /// Returns `true` if cells of `column` accept edits.
    ///
    /// Editability is a column property: non-generated, editable columns
    /// only. The row argument exists for the display toolkit's contract
    /// shape and does not influence the answer.
    pub fn is_cell_editable(&self, _row: usize, column: usize) -> bool {
        self.columns
            .get(column)
            .map(|column| column.is_editable())
            .unwrap_or(false)
    }

    /// Writes `value` back to the bound entity's attribute.
    ///
    /// Rejects writes to generated or read-only columns with
    /// [`BindingError::NotEditable`]; never silently corrupts state. A
    /// successful write routes through the datasource, so collection
    /// observers see an `Update` notification before this returns.
    pub fn set_value_at(&self, value: CellValue, row: usize, column: usize) -> Result<()> {
        self.column(column)?;
        let key = self.entity_key_at(row)?;
        if !self.is_cell_editable(row, column) {
            return Err(BindingError::NotEditable { row, column });
        }
        let attribute = self.columns[column].attribute().to_string();
        let accepted = self
            .source
            .update(key, |item| item.set_attribute(&attribute, value));
        if accepted == Some(true) {
            self.signals.cell_changed.emit((row, column));
        }
        Ok(())
    }

    /// Reorders the flat projection by the given sort keys.
    ///
    /// Keys apply in sequence; the sort is stable, so rows comparing equal
    /// keep their prior relative order. An empty key list restores
    /// collection order. Fires `layout_changed`.
    pub fn sort(&self, keys: &[SortKey]) -> Result<()> {
        for key in keys {
            self.column(key.column)?;
        }
        *self.state.sort_keys.write() = keys.to_vec();
        rebuild_projection(&self.source, &self.columns, &self.state);
        tracing::debug!(
            target: "horizon_trellis::table",
            key_count = keys.len(),
            "projection sorted"
        );
        self.signals.layout_changed.emit(());
        Ok(())
    }

    /// Marks the column at `index` as computed.
    ///
    /// Generated columns yield no attribute value and reject edits.
    pub fn set_column_generated(&self, index: usize) -> Result<()> {
        self.column(index)?.set_generated(true);
        Ok(())
    }

    /// Detaches this adapter from the datasource.
    ///
    /// The owning view must call this on teardown; afterwards no further
    /// notifications reach this adapter or its consumers. Idempotent.
    pub fn detach(&self) {
        if let Some(id) = self.source_connection.lock().take() {
            self.source.signals().collection_changed.disconnect(id);
            tracing::debug!(target: "horizon_trellis::table", "detached from datasource");
        }
    }
}

/// Rebuilds the projection from the source, re-applying the current sort.
fn rebuild_projection<E: Entity>(
    source: &CollectionSource<E>,
    columns: &[Column],
    state: &RowState,
) {
    let mut projection = source.keys();
    let sort_keys = state.sort_keys.read().clone();
    if !sort_keys.is_empty() {
        sort_by_keys(source, columns, &mut projection, &sort_keys);
    }
    *state.projection.write() = projection;
}

/// Stable-sorts `projection` by the given keys.
fn sort_by_keys<E: Entity>(
    source: &CollectionSource<E>,
    columns: &[Column],
    projection: &mut [EntityKey],
    keys: &[SortKey],
) {
    // Sort-key values are snapshotted once up front; comparisons never
    // touch the source lock.
    let cache: HashMap<EntityKey, Vec<CellValue>> = source.with_items(|items| {
        items
            .iter()
            .map(|item| {
                let values = keys
                    .iter()
                    .map(|key| column_value(item, &columns[key.column]))
                    .collect();
                (item.key(), values)
            })
            .collect()
    });

    projection.sort_by(|a, b| {
        let (Some(values_a), Some(values_b)) = (cache.get(a), cache.get(b)) else {
            return Ordering::Equal;
        };
        for (position, key) in keys.iter().enumerate() {
            let ordering = compare_cells(&values_a[position], &values_b[position]);
            let ordering = match key.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

/// Returns the cell value an entity contributes to a column.
fn column_value<E: Entity>(entity: &E, column: &Column) -> CellValue {
    if column.is_generated() {
        CellValue::None
    } else {
        entity.attribute(column.attribute())
    }
}

/// Compares two cell values for sorting.
///
/// Empty cells sort after populated ones; values of unrelated types keep
/// their relative order.
fn compare_cells(a: &CellValue, b: &CellValue) -> Ordering {
    use CellValue::*;
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, _) => Ordering::Greater,
        (_, None) => Ordering::Less,
        (Str(x), Str(y)) => x.cmp(y),
        (Int(x), Int(y)) => x.cmp(y),
        (Float(x), Float(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (Int(x), Float(y)) => (*x as f64).partial_cmp(y).unwrap_or(Ordering::Equal),
        (Float(x), Int(y)) => x.partial_cmp(&(*y as f64)).unwrap_or(Ordering::Equal),
        (Bool(x), Bool(y)) => x.cmp(y),
        (DateTime(x), DateTime(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}
