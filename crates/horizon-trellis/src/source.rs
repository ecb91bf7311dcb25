//! Observable collection datasources.
//!
//! A [`CollectionSource`] holds a loaded, ordered collection of domain
//! entities and notifies listeners when the collection mutates. A
//! [`HierarchicalSource`] layers a parent/child relationship on top,
//! derived from a parent-key extractor, without duplicating the items.
//!
//! Mutation notifications are coarse by design: a [`ChangeKind`] says what
//! kind of mutation happened but carries no positional diff. Listeners
//! must treat the structure as potentially invalidated and re-derive
//! whatever they cached.

use std::sync::Arc;

use parking_lot::RwLock;

use horizon_trellis_core::Signal;

use crate::entity::{Entity, EntityKey};

/// The kind of mutation a collection underwent.
///
/// Deliberately carries no positional information — see the module docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// An item was added to the collection.
    Add,
    /// An existing item's attributes changed.
    Update,
    /// An item was removed from the collection.
    Remove,
    /// The collection's contents were replaced wholesale.
    Refresh,
    /// The collection was emptied.
    Clear,
}

/// Signals emitted by a collection datasource.
///
/// Adapters connect to these to stay synchronized with the collection.
pub struct SourceSignals {
    /// Emitted after every mutation, with the kind of change.
    pub collection_changed: Signal<ChangeKind>,
}

impl SourceSignals {
    fn new() -> Self {
        Self {
            collection_changed: Signal::new(),
        }
    }
}

/// A loaded, ordered, observable collection of domain entities.
///
/// The collection owns its entities; adapters and views address them by
/// [`EntityKey`] and read them through closure access so the backing
/// storage never escapes the lock.
///
/// # Example
///
/// ```
/// use horizon_trellis::{CellValue, CollectionSource, Entity, EntityKey};
///
/// # struct Task { key: EntityKey, name: String }
/// # impl Entity for Task {
/// #     fn key(&self) -> EntityKey { self.key }
/// #     fn attribute(&self, name: &str) -> CellValue {
/// #         if name == "name" { CellValue::from(self.name.as_str()) } else { CellValue::None }
/// #     }
/// #     fn set_attribute(&mut self, name: &str, value: CellValue) -> bool {
/// #         if name == "name" { self.name = value.into_string().unwrap_or_default(); true } else { false }
/// #     }
/// # }
/// let source = CollectionSource::new();
/// source.signals().collection_changed.connect(|kind| {
///     println!("collection changed: {:?}", kind);
/// });
/// source.push(Task { key: EntityKey::new(1), name: "Review".into() });
/// assert_eq!(source.len(), 1);
/// ```
pub struct CollectionSource<E> {
    items: RwLock<Vec<E>>,
    signals: SourceSignals,
}

impl<E: Entity> Default for CollectionSource<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> CollectionSource<E> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
            signals: SourceSignals::new(),
        }
    }

    /// Creates a collection pre-loaded with the given items.
    pub fn from_items(items: Vec<E>) -> Self {
        Self {
            items: RwLock::new(items),
            signals: SourceSignals::new(),
        }
    }

    /// Returns the signals for this collection.
    pub fn signals(&self) -> &SourceSignals {
        &self.signals
    }

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Returns `true` if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Returns `true` if an item with the given key is present.
    pub fn contains(&self, key: EntityKey) -> bool {
        self.items.read().iter().any(|item| item.key() == key)
    }

    /// Returns all keys in collection order.
    pub fn keys(&self) -> Vec<EntityKey> {
        self.items.read().iter().map(|item| item.key()).collect()
    }

    /// Returns the position of the item with the given key.
    pub fn index_of(&self, key: EntityKey) -> Option<usize> {
        self.items.read().iter().position(|item| item.key() == key)
    }

    /// Returns the key of the item at the given position.
    pub fn key_at(&self, position: usize) -> Option<EntityKey> {
        self.items.read().get(position).map(|item| item.key())
    }

    /// Provides read access to the item with the given key.
    pub fn with_item<F, R>(&self, key: EntityKey, f: F) -> Option<R>
    where
        F: FnOnce(&E) -> R,
    {
        let items = self.items.read();
        items.iter().find(|item| item.key() == key).map(f)
    }

    /// Provides read access to the whole collection.
    pub fn with_items<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[E]) -> R,
    {
        f(&self.items.read())
    }

    /// Returns a clone of the item with the given key.
    pub fn get(&self, key: EntityKey) -> Option<E>
    where
        E: Clone,
    {
        self.with_item(key, |item| item.clone())
    }

    /// Replaces the collection's contents.
    ///
    /// Fires a single `Refresh` notification.
    pub fn set_items(&self, items: Vec<E>) {
        {
            let mut guard = self.items.write();
            *guard = items;
        }
        tracing::debug!(target: "horizon_trellis::source", "collection refreshed");
        self.signals.collection_changed.emit(ChangeKind::Refresh);
    }

    /// Appends an item to the collection.
    pub fn push(&self, item: E) {
        {
            self.items.write().push(item);
        }
        tracing::debug!(target: "horizon_trellis::source", "item added");
        self.signals.collection_changed.emit(ChangeKind::Add);
    }

    /// Mutates the item with the given key.
    ///
    /// Returns the closure's result, or `None` if no such item exists. An
    /// `Update` notification fires only when the item was found.
    pub fn update<F, R>(&self, key: EntityKey, f: F) -> Option<R>
    where
        F: FnOnce(&mut E) -> R,
    {
        let result = {
            let mut items = self.items.write();
            items.iter_mut().find(|item| item.key() == key).map(f)
        };
        if result.is_some() {
            tracing::debug!(target: "horizon_trellis::source", %key, "item updated");
            self.signals.collection_changed.emit(ChangeKind::Update);
        }
        result
    }

    /// Removes and returns the item with the given key.
    ///
    /// A `Remove` notification fires only when the item was found.
    pub fn remove(&self, key: EntityKey) -> Option<E> {
        let removed = {
            let mut items = self.items.write();
            items
                .iter()
                .position(|item| item.key() == key)
                .map(|pos| items.remove(pos))
        };
        if removed.is_some() {
            tracing::debug!(target: "horizon_trellis::source", %key, "item removed");
            self.signals.collection_changed.emit(ChangeKind::Remove);
        }
        removed
    }

    /// Removes all items.
    pub fn clear(&self) {
        {
            self.items.write().clear();
        }
        tracing::debug!(target: "horizon_trellis::source", "collection cleared");
        self.signals.collection_changed.emit(ChangeKind::Clear);
    }
}

/// Type alias for a parent-key extractor function.
///
/// Given an entity, returns the key of its parent in the hierarchy, or
/// `None` for top-level entities.
pub type ParentKeyFn<E> = Arc<dyn Fn(&E) -> Option<EntityKey> + Send + Sync>;

/// A hierarchical projection over a [`CollectionSource`].
///
/// The hierarchy is derived, not stored: a parent-key extractor maps each
/// entity to its parent, and children are computed on demand in collection
/// order. An entity whose parent key is absent from the collection
/// surfaces as top-level, so a partially loaded collection still renders.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use horizon_trellis::{CellValue, CollectionSource, Entity, EntityKey, HierarchicalSource};
///
/// # #[derive(Clone)]
/// # struct Task { key: EntityKey, parent: Option<EntityKey> }
/// # impl Entity for Task {
/// #     fn key(&self) -> EntityKey { self.key }
/// #     fn attribute(&self, _name: &str) -> CellValue { CellValue::None }
/// #     fn set_attribute(&mut self, _name: &str, _value: CellValue) -> bool { false }
/// # }
/// let collection = Arc::new(CollectionSource::from_items(vec![
///     Task { key: EntityKey::new(1), parent: None },
///     Task { key: EntityKey::new(2), parent: Some(EntityKey::new(1)) },
/// ]));
/// let source = HierarchicalSource::new(collection, |task: &Task| task.parent);
/// assert_eq!(source.top_level_keys(), vec![EntityKey::new(1)]);
/// assert_eq!(
///     source.children_of(Some(EntityKey::new(1))),
///     vec![EntityKey::new(2)]
/// );
/// ```
pub struct HierarchicalSource<E> {
    collection: Arc<CollectionSource<E>>,
    parent_key: ParentKeyFn<E>,
    root_caption: String,
}

impl<E: Entity> HierarchicalSource<E> {
    /// Creates a hierarchical projection over the given collection.
    pub fn new<F>(collection: Arc<CollectionSource<E>>, parent_key: F) -> Self
    where
        F: Fn(&E) -> Option<EntityKey> + Send + Sync + 'static,
    {
        Self {
            collection,
            parent_key: Arc::new(parent_key),
            root_caption: "Items".to_string(),
        }
    }

    /// Sets the caption used for the synthetic root node of multi-root
    /// collections.
    pub fn with_root_caption(mut self, caption: impl Into<String>) -> Self {
        self.root_caption = caption.into();
        self
    }

    /// Returns the underlying collection.
    pub fn collection(&self) -> &Arc<CollectionSource<E>> {
        &self.collection
    }

    /// Returns the caption for the synthetic root node.
    pub fn root_caption(&self) -> &str {
        &self.root_caption
    }

    /// Returns the raw parent key of the given entity.
    ///
    /// This is the extractor's answer; the parent may or may not be
    /// present in the collection. Returns `None` if the entity itself is
    /// missing or top-level.
    pub fn parent_key_of(&self, key: EntityKey) -> Option<EntityKey> {
        self.collection
            .with_item(key, |item| (self.parent_key)(item))
            .flatten()
    }

    /// Returns the keys of the direct children of `parent`, in collection
    /// order.
    ///
    /// `None` addresses the top level: entities with no parent, plus
    /// orphans whose parent is absent from the collection.
    pub fn children_of(&self, parent: Option<EntityKey>) -> Vec<EntityKey> {
        self.collection.with_items(|items| {
            let present: std::collections::HashSet<EntityKey> =
                items.iter().map(|item| item.key()).collect();
            items
                .iter()
                .filter(|item| {
                    let item_parent =
                        (self.parent_key)(item).filter(|parent_key| present.contains(parent_key));
                    item_parent == parent
                })
                .map(|item| item.key())
                .collect()
        })
    }

    /// Returns the top-level keys, in collection order.
    pub fn top_level_keys(&self) -> Vec<EntityKey> {
        self.children_of(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::CellValue;
    use parking_lot::Mutex;

    #[derive(Clone)]
    struct Task {
        key: EntityKey,
        parent: Option<EntityKey>,
        name: String,
    }

    impl Task {
        fn new(key: u64, parent: Option<u64>, name: &str) -> Self {
            Self {
                key: EntityKey::new(key),
                parent: parent.map(EntityKey::new),
                name: name.to_string(),
            }
        }
    }

    impl Entity for Task {
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

    fn task_source() -> CollectionSource<Task> {
        CollectionSource::from_items(vec![
            Task::new(1, None, "Plan"),
            Task::new(2, Some(1), "Design"),
            Task::new(3, Some(1), "Build"),
        ])
    }

    #[test]
    fn test_collection_access() {
        let source = task_source();
        assert_eq!(source.len(), 3);
        assert!(!source.is_empty());
        assert!(source.contains(EntityKey::new(2)));
        assert_eq!(source.index_of(EntityKey::new(3)), Some(2));
        assert_eq!(source.key_at(0), Some(EntityKey::new(1)));
        assert_eq!(
            source.with_item(EntityKey::new(2), |t| t.name.clone()),
            Some("Design".to_string())
        );
    }

    #[test]
    fn test_mutations_fire_change_kinds() {
        let source = task_source();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        source.signals().collection_changed.connect(move |&kind| {
            received_clone.lock().push(kind);
        });

        source.push(Task::new(4, Some(3), "Test"));
        source.update(EntityKey::new(4), |t| t.name = "Verify".to_string());
        source.remove(EntityKey::new(4));
        source.set_items(vec![Task::new(5, None, "Ship")]);
        source.clear();

        assert_eq!(
            *received.lock(),
            vec![
                ChangeKind::Add,
                ChangeKind::Update,
                ChangeKind::Remove,
                ChangeKind::Refresh,
                ChangeKind::Clear,
            ]
        );
    }

    #[test]
    fn test_update_missing_key_is_silent() {
        let source = task_source();
        let count = Arc::new(Mutex::new(0));

        let count_clone = count.clone();
        source.signals().collection_changed.connect(move |_| {
            *count_clone.lock() += 1;
        });

        assert!(source.update(EntityKey::new(99), |_| ()).is_none());
        assert!(source.remove(EntityKey::new(99)).is_none());
        assert_eq!(*count.lock(), 0);
    }

    #[test]
    fn test_hierarchy_children() {
        let source = HierarchicalSource::new(Arc::new(task_source()), |t: &Task| t.parent);
        assert_eq!(source.top_level_keys(), vec![EntityKey::new(1)]);
        assert_eq!(
            source.children_of(Some(EntityKey::new(1))),
            vec![EntityKey::new(2), EntityKey::new(3)]
        );
        assert!(source.children_of(Some(EntityKey::new(2))).is_empty());
        assert_eq!(source.parent_key_of(EntityKey::new(2)), Some(EntityKey::new(1)));
        assert_eq!(source.parent_key_of(EntityKey::new(1)), None);
    }

    #[test]
    fn test_orphans_surface_as_top_level() {
        let collection = Arc::new(CollectionSource::from_items(vec![
            Task::new(1, None, "Plan"),
            Task::new(2, Some(42), "Orphan"), // parent 42 never loaded
        ]));
        let source = HierarchicalSource::new(collection, |t: &Task| t.parent);
        assert_eq!(
            source.top_level_keys(),
            vec![EntityKey::new(1), EntityKey::new(2)]
        );
    }
}
