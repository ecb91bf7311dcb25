//! Domain entity identity and attribute access.
//!
//! The binding layer never owns entities — the datasource does. Adapters
//! only need a stable key to identify an entity across reorders and
//! refreshes, plus named attribute access to read and write cell values.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::value::CellValue;

/// Counter for generating unique entity keys.
static ENTITY_KEY_COUNTER: AtomicU64 = AtomicU64::new(1);

/// The stable identity of a domain entity.
///
/// Keys are assigned when an entity is created or loaded and never change
/// afterwards. Adapters address entities by key rather than by position so
/// that sorting and collection mutations cannot silently retarget a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey(u64);

impl EntityKey {
    /// Creates a key from a known identifier (e.g. a database id).
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Generates a fresh, process-unique key.
    pub fn next() -> Self {
        Self(ENTITY_KEY_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the underlying identifier.
    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An identity-bearing business object with named attribute access.
///
/// Implement this trait for the row types a datasource holds. The binding
/// layer reads cells through [`attribute`](Entity::attribute) and writes
/// edited cells back through [`set_attribute`](Entity::set_attribute);
/// everything else about the type is opaque to the adapters.
///
/// # Example
///
/// ```
/// use horizon_trellis::{CellValue, Entity, EntityKey};
///
/// struct Task {
///     key: EntityKey,
///     name: String,
///     hours: i64,
/// }
///
/// impl Entity for Task {
///     fn key(&self) -> EntityKey {
///         self.key
///     }
///
///     fn attribute(&self, name: &str) -> CellValue {
///         match name {
///             "name" => CellValue::from(self.name.as_str()),
///             "hours" => CellValue::from(self.hours),
///             _ => CellValue::None,
///         }
///     }
///
///     fn set_attribute(&mut self, name: &str, value: CellValue) -> bool {
///         match (name, value) {
///             ("name", CellValue::Str(s)) => {
///                 self.name = s;
///                 true
///             }
///             ("hours", CellValue::Int(n)) => {
///                 self.hours = n;
///                 true
///             }
///             _ => false,
///         }
///     }
/// }
/// ```
pub trait Entity: Send + Sync + 'static {
    /// Returns this entity's stable key.
    fn key(&self) -> EntityKey;

    /// Returns the value of a named attribute.
    ///
    /// Return `CellValue::None` for unknown attributes — an unmapped
    /// column is a valid "no data" state, not an error.
    fn attribute(&self, name: &str) -> CellValue;

    /// Sets the value of a named attribute.
    ///
    /// Returns `true` if the attribute was accepted. Implementations must
    /// reject (return `false` for) unknown attributes or incompatible
    /// value types rather than coercing them.
    fn set_attribute(&mut self, name: &str, value: CellValue) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_key_generation() {
        let a = EntityKey::next();
        let b = EntityKey::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_entity_key_display() {
        let key = EntityKey::new(7);
        assert_eq!(key.to_string(), "#7");
        assert_eq!(key.value(), 7);
    }
}
