//! Cell values exchanged between entities, adapters, and views.
//!
//! [`CellValue`] is the typed container for one cell's data. Entities
//! produce cell values from their attributes, adapters route them to the
//! requesting view, and edits travel back the same way.

use chrono::NaiveDateTime;

use crate::node::DisplayNode;

/// Typed container for one cell's data.
///
/// `CellValue` provides type-safe access through the `as_*` methods and
/// convenient construction through `From` impls.
///
/// # Example
///
/// ```
/// use horizon_trellis::CellValue;
///
/// // Create from a string
/// let value = CellValue::from("Hello");
/// assert_eq!(value.as_str(), Some("Hello"));
///
/// // Create from an integer
/// let value = CellValue::from(42i64);
/// assert_eq!(value.as_int(), Some(42));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// No data.
    #[default]
    None,
    /// String data.
    Str(String),
    /// Integer data.
    Int(i64),
    /// Floating point data.
    Float(f64),
    /// Boolean data.
    Bool(bool),
    /// Date/time data.
    DateTime(NaiveDateTime),
    /// A display node rendered as its own label.
    ///
    /// Produced for column 0 of synthetic grouping rows, so a group header
    /// can span the tree column while every other column stays blank.
    Node(DisplayNode),
}

impl CellValue {
    /// Returns `true` if this is `CellValue::None`.
    pub fn is_none(&self) -> bool {
        matches!(self, CellValue::None)
    }

    /// Returns `true` if this contains some data.
    pub fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// Attempts to get the data as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Attempts to get the data as an owned string.
    pub fn into_string(self) -> Option<String> {
        match self {
            CellValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to get the data as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            CellValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to get the data as a float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            CellValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to get the data as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to get the data as a date/time.
    pub fn as_date_time(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Attempts to get the data as a display node.
    pub fn as_node(&self) -> Option<&DisplayNode> {
        match self {
            CellValue::Node(node) => Some(node),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Str(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Str(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Int(value as i64)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(value: NaiveDateTime) -> Self {
        CellValue::DateTime(value)
    }
}

impl From<DisplayNode> for CellValue {
    fn from(value: DisplayNode) -> Self {
        CellValue::Node(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKey;

    #[test]
    fn test_value_accessors() {
        assert_eq!(CellValue::from("abc").as_str(), Some("abc"));
        assert_eq!(CellValue::from(5i64).as_int(), Some(5));
        assert_eq!(CellValue::from(2.5).as_float(), Some(2.5));
        assert_eq!(CellValue::from(true).as_bool(), Some(true));
        assert!(CellValue::None.is_none());
        assert!(CellValue::from(1i64).is_some());
    }

    #[test]
    fn test_mismatched_accessors() {
        assert_eq!(CellValue::from(5i64).as_str(), None);
        assert_eq!(CellValue::from("abc").as_int(), None);
        assert_eq!(CellValue::None.as_bool(), None);
    }

    #[test]
    fn test_node_value() {
        let node = DisplayNode::Entity(EntityKey::new(9));
        let value = CellValue::from(node.clone());
        assert_eq!(value.as_node(), Some(&node));
    }

    #[test]
    fn test_into_string() {
        assert_eq!(CellValue::from("x").into_string(), Some("x".to_string()));
        assert_eq!(CellValue::from(1i64).into_string(), None);
    }
}
