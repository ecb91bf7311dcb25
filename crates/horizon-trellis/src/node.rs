//! Display nodes for hierarchical presentation.
//!
//! A [`DisplayNode`] is the opaque handle a tree or tree-table widget uses
//! to identify one visible row. Most nodes are backed by a domain entity;
//! synthetic grouping nodes (e.g. the root header above a multi-root
//! collection) carry only a label and resolve to no entity.

use std::fmt;

use crate::entity::EntityKey;

/// An opaque handle identifying one row/tree entry in a hierarchical view.
///
/// Nodes are cheap to clone and compare; the presentation layer stores
/// them in its selection and expansion state. Identity is by content: an
/// entity node equals another node for the same entity key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DisplayNode {
    /// A node backed by a domain entity.
    Entity(EntityKey),
    /// A synthetic grouping header with no backing entity.
    Group(String),
}

impl DisplayNode {
    /// Returns the backing entity key, or `None` for synthetic nodes.
    pub fn entity_key(&self) -> Option<EntityKey> {
        match self {
            DisplayNode::Entity(key) => Some(*key),
            DisplayNode::Group(_) => None,
        }
    }

    /// Returns `true` if this node has no backing entity.
    pub fn is_synthetic(&self) -> bool {
        matches!(self, DisplayNode::Group(_))
    }

    /// Returns the grouping label, or `None` for entity nodes.
    pub fn label(&self) -> Option<&str> {
        match self {
            DisplayNode::Entity(_) => None,
            DisplayNode::Group(label) => Some(label.as_str()),
        }
    }
}

impl fmt::Display for DisplayNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayNode::Entity(key) => write!(f, "{}", key),
            DisplayNode::Group(label) => write!(f, "{}", label),
        }
    }
}

/// The ordered chain of nodes from the root down to one node, inclusive.
///
/// The presentation layer uses paths to restore selection and expansion
/// state after a structural refresh.
pub type NodePath = Vec<DisplayNode>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_node() {
        let node = DisplayNode::Entity(EntityKey::new(3));
        assert_eq!(node.entity_key(), Some(EntityKey::new(3)));
        assert!(!node.is_synthetic());
        assert_eq!(node.label(), None);
        assert_eq!(node.to_string(), "#3");
    }

    #[test]
    fn test_group_node() {
        let node = DisplayNode::Group("Departments".into());
        assert_eq!(node.entity_key(), None);
        assert!(node.is_synthetic());
        assert_eq!(node.label(), Some("Departments"));
        assert_eq!(node.to_string(), "Departments");
    }

    #[test]
    fn test_node_equality() {
        assert_eq!(
            DisplayNode::Entity(EntityKey::new(1)),
            DisplayNode::Entity(EntityKey::new(1))
        );
        assert_ne!(
            DisplayNode::Entity(EntityKey::new(1)),
            DisplayNode::Entity(EntityKey::new(2))
        );
        assert_ne!(
            DisplayNode::Entity(EntityKey::new(1)),
            DisplayNode::Group("1".into())
        );
    }
}
