//! Error types for the binding layer.
//!
//! The binding layer is a pure, synchronous view transformation: there is
//! no I/O and no retry logic. Errors signal caller mistakes (bad indices,
//! flat addressing in tree-table mode, writes to read-only cells) and are
//! surfaced immediately rather than clamped or swallowed. A stale or
//! missing entity behind a display node is deliberately *not* an error —
//! synthetic nodes legitimately have no entity, so that case reads as
//! "no data" (`CellValue::None` / `Option::None`).

use thiserror::Error;

/// Errors produced by the table, tree, and tree-table adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// A row, column, or child index was outside the valid range.
    ///
    /// Indices never clamp or wrap.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// The length of the addressed range.
        len: usize,
    },

    /// A flat-addressing operation was called on a tree-table adapter.
    ///
    /// Flat row positions are meaningless once rows are organized
    /// hierarchically with variable expansion state, so misuse fails
    /// loudly instead of returning a sentinel.
    #[error("{operation} is not supported while rows are organized hierarchically")]
    UnsupportedInTreeMode {
        /// The operation that was attempted.
        operation: &'static str,
    },

    /// A write-back targeted a generated or read-only column.
    #[error("cell at row {row}, column {column} is not editable")]
    NotEditable {
        /// The addressed row.
        row: usize,
        /// The addressed column.
        column: usize,
    },
}

/// A specialized Result type for binding operations.
pub type Result<T> = std::result::Result<T, BindingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BindingError::IndexOutOfRange { index: 5, len: 3 };
        assert_eq!(err.to_string(), "index 5 out of range for length 3");

        let err = BindingError::UnsupportedInTreeMode {
            operation: "item_at",
        };
        assert!(err.to_string().contains("item_at"));

        let err = BindingError::NotEditable { row: 1, column: 2 };
        assert!(err.to_string().contains("row 1"));
    }
}
