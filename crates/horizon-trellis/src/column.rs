//! Column descriptors and sort keys.

use std::sync::atomic::{AtomicBool, Ordering};

/// Describes one display column of a table or tree-table.
///
/// A column is bound to a named entity attribute and carries its display
/// caption and editability. All fields are fixed for the lifetime of the
/// adapter except the `generated` flag: a view may mark a column as
/// computed after construction, which removes its attribute backing and
/// makes it read-only.
///
/// # Example
///
/// ```
/// use horizon_trellis::Column;
///
/// let name = Column::new("name").with_caption("Name").with_editable(true);
/// assert_eq!(name.caption(), "Name");
/// assert!(name.is_editable());
/// assert!(!name.is_generated());
/// ```
#[derive(Debug)]
pub struct Column {
    caption: String,
    attribute: String,
    editable: bool,
    generated: AtomicBool,
}

impl Column {
    /// Creates a read-only column bound to the given attribute.
    ///
    /// The caption defaults to the attribute name.
    pub fn new(attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        Self {
            caption: attribute.clone(),
            attribute,
            editable: false,
            generated: AtomicBool::new(false),
        }
    }

    /// Sets the display caption.
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    /// Sets whether cells in this column accept edits.
    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    /// Returns the display caption.
    pub fn caption(&self) -> &str {
        &self.caption
    }

    /// Returns the bound attribute name.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Returns `true` if cells in this column accept edits.
    ///
    /// Generated columns never do, regardless of the editable flag.
    pub fn is_editable(&self) -> bool {
        self.editable && !self.is_generated()
    }

    /// Returns `true` if this column is computed rather than
    /// attribute-backed.
    pub fn is_generated(&self) -> bool {
        self.generated.load(Ordering::Relaxed)
    }

    /// Marks this column as computed.
    ///
    /// Generated columns yield no attribute value and reject edits; the
    /// view supplies their content.
    pub fn set_generated(&self, generated: bool) {
        self.generated.store(generated, Ordering::Relaxed);
    }
}

impl Clone for Column {
    fn clone(&self) -> Self {
        Self {
            caption: self.caption.clone(),
            attribute: self.attribute.clone(),
            editable: self.editable,
            generated: AtomicBool::new(self.is_generated()),
        }
    }
}

/// Sort direction for one sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    /// Smallest value first.
    #[default]
    Ascending,
    /// Largest value first.
    Descending,
}

/// One (column, direction) pair of an ordered sort specification.
///
/// Sorting applies keys in sequence: the first key orders the rows, later
/// keys break ties among rows the earlier keys consider equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortKey {
    /// The column index to sort by.
    pub column: usize,
    /// The direction to sort in.
    pub direction: SortDirection,
}

impl SortKey {
    /// Creates an ascending sort key for the given column.
    pub fn ascending(column: usize) -> Self {
        Self {
            column,
            direction: SortDirection::Ascending,
        }
    }

    /// Creates a descending sort key for the given column.
    pub fn descending(column: usize) -> Self {
        Self {
            column,
            direction: SortDirection::Descending,
        }
    }
}
