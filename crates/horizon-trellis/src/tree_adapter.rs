//! Tree facet: hierarchical adapter over a collection datasource.
//!
//! [`TreeModelAdapter`] exposes a bound [`HierarchicalSource`] as a tree:
//! display nodes for entities, parent/child navigation derived from the
//! source's hierarchy, and a synthetic grouping root when the collection
//! has more than one top-level entity. Nothing is cached — children are
//! computed on demand — so a structural refresh never leaves the adapter
//! holding stale nodes.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use horizon_trellis_core::{ConnectionId, Signal};

use crate::entity::{Entity, EntityKey};
use crate::error::{BindingError, Result};
use crate::node::{DisplayNode, NodePath};
use crate::source::HierarchicalSource;

/// Type alias for a node caption extractor function.
///
/// Produces the text an entity-backed node displays in the tree column.
pub type CaptionFn<E> = Arc<dyn Fn(&E) -> String + Send + Sync>;

/// Signals emitted by the tree facet.
pub struct TreeSignals {
    /// Emitted after every collection mutation: re-derive the visible tree
    /// from the carried root path down. `None` means the collection became
    /// empty.
    pub structure_changed: Signal<Option<NodePath>>,
}

impl TreeSignals {
    fn new() -> Self {
        Self {
            structure_changed: Signal::new(),
        }
    }
}

/// Hierarchical tree model over an observable entity collection.
///
/// Bound to one datasource at construction; registers a collection
/// listener immediately. The owning view must call
/// [`detach`](TreeModelAdapter::detach) on teardown.
pub struct TreeModelAdapter<E: Entity> {
    source: Arc<HierarchicalSource<E>>,
    caption: CaptionFn<E>,
    signals: Arc<TreeSignals>,
    source_connection: Mutex<Option<ConnectionId>>,
}

impl<E: Entity> TreeModelAdapter<E> {
    /// Creates an adapter bound to the given hierarchical source.
    ///
    /// `caption` produces the display text of entity-backed nodes.
    pub fn new<F>(source: Arc<HierarchicalSource<E>>, caption: F) -> Self
    where
        F: Fn(&E) -> String + Send + Sync + 'static,
    {
        let signals = Arc::new(TreeSignals::new());

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

        Self {
            source,
            caption: Arc::new(caption),
            signals,
            source_connection: Mutex::new(Some(connection)),
        }
    }

    /// Returns the signals for this adapter.
    pub fn signals(&self) -> &TreeSignals {
        &self.signals
    }

    /// Returns the top-level display node, or `None` if the collection is
    /// empty.
    ///
    /// A collection with exactly one top-level entity is rooted at that
    /// entity's node; with several, a synthetic grouping node captioned by
    /// the source holds them.
    pub fn root(&self) -> Option<DisplayNode> {
        root_node(&self.source)
    }

    /// Returns the number of direct children of `parent`.
    pub fn child_count(&self, parent: &DisplayNode) -> usize {
        self.child_keys(parent).len()
    }

    /// Returns the child of `parent` at `index`.
    pub fn child(&self, parent: &DisplayNode, index: usize) -> Result<DisplayNode> {
        let children = self.child_keys(parent);
        children
            .get(index)
            .map(|&key| DisplayNode::Entity(key))
            .ok_or(BindingError::IndexOutOfRange {
                index,
                len: children.len(),
            })
    }

    /// Returns the position of `child` among `parent`'s children, or
    /// `None` if it is not a child.
    pub fn index_of_child(&self, parent: &DisplayNode, child: &DisplayNode) -> Option<usize> {
        let key = child.entity_key()?;
        self.child_keys(parent)
            .iter()
            .position(|&candidate| candidate == key)
    }

    /// Returns the backing entity key, or `None` for synthetic nodes.
    ///
    /// The key is returned as addressed; whether the entity is still
    /// loaded is answered by [`entity_of`](Self::entity_of).
    pub fn entity_key_of(&self, node: &DisplayNode) -> Option<EntityKey> {
        node.entity_key()
    }

    /// Resolves a display node to a clone of its backing entity.
    ///
    /// Synthetic nodes and nodes whose entity is no longer loaded resolve
    /// to `None` — a valid "no data" state, not an error.
    pub fn entity_of(&self, node: &DisplayNode) -> Option<E>
    where
        E: Clone,
    {
        self.with_entity(node, |entity| entity.clone())
    }

    /// Provides read access to the backing entity of a node.
    pub fn with_entity<F, R>(&self, node: &DisplayNode, f: F) -> Option<R>
    where
        F: FnOnce(&E) -> R,
    {
        let key = node.entity_key()?;
        self.source.collection().with_item(key, f)
    }

    /// Returns the display text of a node.
    ///
    /// Entity nodes answer through the caption extractor; synthetic nodes
    /// answer with their own label.
    pub fn node_caption(&self, node: &DisplayNode) -> Option<String> {
        match node {
            DisplayNode::Group(label) => Some(label.clone()),
            DisplayNode::Entity(_) => self.with_entity(node, |entity| (self.caption)(entity)),
        }
    }

    /// Returns the ordered chain of nodes from the root to `node`,
    /// inclusive.
    ///
    /// Used by the presentation layer for selection and expansion state.
    /// Returns `None` for nodes not reachable from the current root.
    pub fn path_of(&self, node: &DisplayNode) -> Option<NodePath> {
        let root = self.root()?;
        match node {
            DisplayNode::Group(_) => {
                // The synthetic root is the only group node there is.
                if *node == root {
                    Some(vec![root])
                } else {
                    None
                }
            }
            DisplayNode::Entity(key) => {
                if !self.source.collection().contains(*key) {
                    return None;
                }
                let mut chain = vec![*key];
                let mut visited: HashSet<EntityKey> = chain.iter().copied().collect();
                let mut current = self.effective_parent(*key);
                while let Some(parent) = current {
                    if !visited.insert(parent) {
                        tracing::warn!(
                            target: "horizon_trellis::tree",
                            key = %parent,
                            "parent cycle detected while building node path"
                        );
                        return None;
                    }
                    chain.push(parent);
                    current = self.effective_parent(parent);
                }
                chain.reverse();

                let mut path: NodePath = Vec::with_capacity(chain.len() + 1);
                if root.is_synthetic() {
                    path.push(root);
                }
                path.extend(chain.into_iter().map(DisplayNode::Entity));
                Some(path)
            }
        }
    }

    /// Detaches this adapter from the datasource. Idempotent.
    pub fn detach(&self) {
        if let Some(id) = self.source_connection.lock().take() {
            self.source
                .collection()
                .signals()
                .collection_changed
                .disconnect(id);
            tracing::debug!(target: "horizon_trellis::tree", "detached from datasource");
        }
    }

    /// Returns the child keys of a node, in collection order.
    fn child_keys(&self, parent: &DisplayNode) -> Vec<EntityKey> {
        match parent {
            // The synthetic root holds the top level.
            DisplayNode::Group(_) => self.source.top_level_keys(),
            DisplayNode::Entity(key) => self.source.children_of(Some(*key)),
        }
    }

    /// The parent of `key` as displayed: absent parents make a top-level
    /// node.
    fn effective_parent(&self, key: EntityKey) -> Option<EntityKey> {
        self.source
            .parent_key_of(key)
            .filter(|parent| self.source.collection().contains(*parent))
    }
}

/// Derives the current root node of a hierarchical source.
pub(crate) fn root_node<E: Entity>(source: &HierarchicalSource<E>) -> Option<DisplayNode> {
    let top = source.top_level_keys();
    match top.len() {
        0 => None,
        1 => Some(DisplayNode::Entity(top[0])),
        _ => Some(DisplayNode::Group(source.root_caption().to_string())),
    }
}

/// Derives the current root path: the root alone, or `None` when empty.
pub(crate) fn root_path<E: Entity>(source: &HierarchicalSource<E>) -> Option<NodePath> {
    root_node(source).map(|root| vec![root])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::CollectionSource;
    use crate::value::CellValue;
    use parking_lot::Mutex;

    #[derive(Clone)]
    struct Region {
        key: EntityKey,
        parent: Option<EntityKey>,
        name: String,
    }

    impl Region {
        fn new(key: u64, parent: Option<u64>, name: &str) -> Self {
            Self {
                key: EntityKey::new(key),
                parent: parent.map(EntityKey::new),
                name: name.to_string(),
            }
        }
    }

    impl Entity for Region {
        fn key(&self) -> EntityKey {
            self.key
        }

        fn attribute(&self, name: &str) -> CellValue {
            match name {
                "name" => CellValue::from(self.name.as_str()),
                _ => CellValue::None,
            }
        }

        fn set_attribute(&mut self, name: &str, value: CellValue) -> bool {
            match (name, value) {
                ("name", CellValue::Str(s)) => {
                    self.name = s;
                    true
                }
                _ => false,
            }
        }
    }

    fn single_root() -> Arc<HierarchicalSource<Region>> {
        // World > Europe, Asia; Europe > France
        let collection = Arc::new(CollectionSource::from_items(vec![
            Region::new(1, None, "World"),
            Region::new(2, Some(1), "Europe"),
            Region::new(3, Some(1), "Asia"),
            Region::new(4, Some(2), "France"),
        ]));
        Arc::new(HierarchicalSource::new(collection, |r: &Region| r.parent))
    }

    fn adapter(source: Arc<HierarchicalSource<Region>>) -> TreeModelAdapter<Region> {
        TreeModelAdapter::new(source, |r: &Region| r.name.clone())
    }

    #[test]
    fn test_root_single_entity() {
        let tree = adapter(single_root());
        assert_eq!(tree.root(), Some(DisplayNode::Entity(EntityKey::new(1))));
    }

    #[test]
    fn test_root_empty() {
        let collection = Arc::new(CollectionSource::<Region>::new());
        let tree = adapter(Arc::new(HierarchicalSource::new(collection, |r: &Region| {
            r.parent
        })));
        assert_eq!(tree.root(), None);
    }

    #[test]
    fn test_root_multiple_top_level_is_synthetic() {
        let collection = Arc::new(CollectionSource::from_items(vec![
            Region::new(1, None, "Europe"),
            Region::new(2, None, "Asia"),
        ]));
        let source =
            Arc::new(HierarchicalSource::new(collection, |r: &Region| r.parent).with_root_caption("Regions"));
        let tree = adapter(source);

        let root = tree.root().unwrap();
        assert_eq!(root, DisplayNode::Group("Regions".into()));
        assert_eq!(tree.child_count(&root), 2);
        assert_eq!(
            tree.child(&root, 0).unwrap(),
            DisplayNode::Entity(EntityKey::new(1))
        );
    }

    #[test]
    fn test_children_navigation() {
        let tree = adapter(single_root());
        let root = tree.root().unwrap();

        assert_eq!(tree.child_count(&root), 2);
        let europe = tree.child(&root, 0).unwrap();
        let asia = tree.child(&root, 1).unwrap();
        assert_eq!(europe, DisplayNode::Entity(EntityKey::new(2)));
        assert_eq!(asia, DisplayNode::Entity(EntityKey::new(3)));

        assert_eq!(tree.index_of_child(&root, &europe), Some(0));
        assert_eq!(tree.index_of_child(&root, &asia), Some(1));
        assert_eq!(tree.index_of_child(&europe, &asia), None);

        assert_eq!(tree.child_count(&asia), 0);
        assert_eq!(
            tree.child(&root, 2),
            Err(BindingError::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_entity_resolution() {
        let tree = adapter(single_root());
        let europe = DisplayNode::Entity(EntityKey::new(2));
        assert_eq!(tree.entity_of(&europe).unwrap().name, "Europe");
        assert_eq!(tree.node_caption(&europe), Some("Europe".to_string()));

        let synthetic = DisplayNode::Group("Header".into());
        assert!(tree.entity_of(&synthetic).is_none());
        assert_eq!(tree.node_caption(&synthetic), Some("Header".to_string()));

        // A node whose entity was unloaded resolves to no data
        let gone = DisplayNode::Entity(EntityKey::new(99));
        assert!(tree.entity_of(&gone).is_none());
        assert_eq!(tree.node_caption(&gone), None);
    }

    #[test]
    fn test_path_of() {
        let tree = adapter(single_root());
        let france = DisplayNode::Entity(EntityKey::new(4));

        let path = tree.path_of(&france).unwrap();
        assert_eq!(
            path,
            vec![
                DisplayNode::Entity(EntityKey::new(1)),
                DisplayNode::Entity(EntityKey::new(2)),
                DisplayNode::Entity(EntityKey::new(4)),
            ]
        );

        assert_eq!(tree.path_of(&DisplayNode::Entity(EntityKey::new(99))), None);
    }

    #[test]
    fn test_path_includes_synthetic_root() {
        let collection = Arc::new(CollectionSource::from_items(vec![
            Region::new(1, None, "Europe"),
            Region::new(2, Some(1), "France"),
            Region::new(3, None, "Asia"),
        ]));
        let source = Arc::new(
            HierarchicalSource::new(collection, |r: &Region| r.parent).with_root_caption("Regions"),
        );
        let tree = adapter(source);

        let root = tree.root().unwrap();
        assert!(root.is_synthetic());
        assert_eq!(tree.path_of(&root), Some(vec![root.clone()]));

        let france = DisplayNode::Entity(EntityKey::new(2));
        assert_eq!(
            tree.path_of(&france).unwrap(),
            vec![
                root,
                DisplayNode::Entity(EntityKey::new(1)),
                DisplayNode::Entity(EntityKey::new(2)),
            ]
        );
    }

    #[test]
    fn test_parent_cycle_is_detected() {
        // 1 -> 2 -> 1 by bad data
        let collection = Arc::new(CollectionSource::from_items(vec![
            Region::new(1, Some(2), "A"),
            Region::new(2, Some(1), "B"),
            Region::new(3, None, "C"),
        ]));
        let source = Arc::new(HierarchicalSource::new(collection, |r: &Region| r.parent));
        let tree = adapter(source);

        assert_eq!(tree.path_of(&DisplayNode::Entity(EntityKey::new(1))), None);
    }

    #[test]
    fn test_structure_changed_on_mutation() {
        let source = single_root();
        let tree = adapter(source.clone());

        let received = Arc::new(Mutex::new(Vec::new()));
        let received_clone = received.clone();
        tree.signals().structure_changed.connect(move |path| {
            received_clone.lock().push(path.clone());
        });

        source
            .collection()
            .push(Region::new(5, Some(3), "Japan"));
        source.collection().clear();

        let events = received.lock();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            Some(vec![DisplayNode::Entity(EntityKey::new(1))])
        );
        assert_eq!(events[1], None); // collection became empty
    }

    #[test]
    fn test_detach_stops_notifications() {
        let source = single_root();
        let tree = adapter(source.clone());

        let count = Arc::new(Mutex::new(0));
        let count_clone = count.clone();
        tree.signals().structure_changed.connect(move |_| {
            *count_clone.lock() += 1;
        });

        tree.detach();
        source.collection().push(Region::new(6, None, "Atlantis"));
        assert_eq!(*count.lock(), 0);
    }
}
