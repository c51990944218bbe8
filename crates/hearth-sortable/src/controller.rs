#![forbid(unsafe_code)]

//! The reorder controller: one owned collection, reconciled at birth,
//! persisted on every effective mutation.
//!
//! # Reconciliation
//!
//! Construction merges the persisted order hint with the host's canonical
//! item set: ids present in both come first, in persisted relative order;
//! canonical items the store never saw are appended in canonical relative
//! order; persisted ids the host no longer supplies are dropped silently.
//! The visible collection therefore always matches canonical *membership*
//! while preferring the user's last chosen *order*.
//!
//! # Write and notification discipline
//!
//! Every effective mutation, on the same call stack and in invocation
//! order: (1) snapshot → store write under this controller's key,
//! (2) observer notification. No batching, no async dispatch. A failed
//! write is logged and otherwise ignored — the in-memory collection stays
//! authoritative and is never rolled back.

use crate::collection::{Collection, Item};
use crate::store::{PersistedCollection, PersistedEntry, SharedStore};

/// Host-side subscriber for collection changes.
///
/// Callbacks run synchronously on the mutating call stack, after the store
/// write for the same mutation.
pub trait CollectionObserver {
    /// The order changed; `order` is the full new id sequence.
    fn order_changed(&mut self, key: &str, order: &[String]) {
        let _ = (key, order);
    }

    /// One item's toggle state changed.
    fn state_changed(&mut self, key: &str, id: &str, on: bool) {
        let _ = (key, id, on);
    }
}

/// Observer that ignores everything.
struct NoopObserver;

impl CollectionObserver for NoopObserver {}

/// Owns one ordered collection and its durable order.
pub struct ReorderController<P> {
    key: String,
    collection: Collection<P>,
    store: SharedStore,
    observer: Box<dyn CollectionObserver>,
}

impl<P> std::fmt::Debug for ReorderController<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReorderController")
            .field("key", &self.key)
            .field("len", &self.collection.len())
            .finish()
    }
}

impl<P> ReorderController<P> {
    /// Build a controller for `key`, reconciling the stored order against
    /// the canonical item set.
    pub fn new(key: impl Into<String>, canonical: Vec<Item<P>>, store: SharedStore) -> Self {
        let key = key.into();
        let persisted = store.borrow().load(&key);
        let collection = reconcile(Collection::from_canonical(canonical), persisted);
        tracing::debug!(key = %key, len = collection.len(), "collection initialized");
        Self {
            key,
            collection,
            store,
            observer: Box::new(NoopObserver),
        }
    }

    /// Attach an observer. Replaces any previous one.
    #[must_use]
    pub fn with_observer(mut self, observer: Box<dyn CollectionObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// The collection key this controller persists under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// All items, in render order.
    #[must_use]
    pub fn items(&self) -> &[Item<P>] {
        self.collection.items()
    }

    /// Look up an item by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Item<P>> {
        self.collection.get(id)
    }

    /// The current order as an id sequence.
    #[must_use]
    pub fn order(&self) -> Vec<String> {
        self.collection.order()
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.collection.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    /// Move `source_id` onto the slot currently held by `target_id` and
    /// return the resulting order.
    ///
    /// Identity-keyed throughout (see [`Collection::move_item`] for the
    /// insertion direction). Equal or unknown ids leave the order
    /// unchanged and trigger neither a write nor a notification.
    pub fn move_item(&mut self, source_id: &str, target_id: &str) -> Vec<String> {
        if self.collection.move_item(source_id, target_id) {
            tracing::debug!(key = %self.key, source_id, target_id, "item moved");
            self.persist();
            let order = self.collection.order();
            self.observer.order_changed(&self.key, &order);
            return order;
        }
        self.collection.order()
    }

    /// Replace the toggle state of `id`.
    ///
    /// Silent no-op when the id is absent or not toggleable — the host may
    /// have removed the item between intent and dispatch.
    pub fn set_item_state(&mut self, id: &str, on: bool) {
        if self.collection.set_state(id, on) {
            tracing::debug!(key = %self.key, id, on, "item state set");
            self.persist();
            self.observer.state_changed(&self.key, id, on);
        }
    }

    /// Flip the toggle state of `id`, returning the new state when the
    /// item exists and is toggleable.
    pub fn toggle_item(&mut self, id: &str) -> Option<bool> {
        let on = self.collection.toggle(id)?;
        tracing::debug!(key = %self.key, id, on, "item toggled");
        self.persist();
        self.observer.state_changed(&self.key, id, on);
        Some(on)
    }

    /// The persisted projection of the current collection.
    #[must_use]
    pub fn snapshot(&self) -> PersistedCollection {
        PersistedCollection::new(
            self.collection
                .items()
                .iter()
                .map(|item| PersistedEntry {
                    id: item.id.clone(),
                    state: item.state,
                })
                .collect(),
        )
    }

    fn persist(&mut self) {
        let snapshot = self.snapshot();
        if let Err(err) = self.store.borrow_mut().save(&self.key, &snapshot) {
            tracing::warn!(key = %self.key, %err, "order store write failed, keeping in-memory state");
        }
    }
}

/// Merge the persisted order hint into the canonical collection.
fn reconcile<P>(canonical: Collection<P>, persisted: Option<PersistedCollection>) -> Collection<P> {
    let Some(persisted) = persisted else {
        return canonical;
    };

    let mut canonical = canonical;
    let remaining = canonical.items_mut();
    let mut ordered = Vec::with_capacity(remaining.len());

    for entry in persisted.entries {
        let Some(index) = remaining.iter().position(|item| item.id == entry.id) else {
            tracing::debug!(id = %entry.id, "persisted id no longer canonical, dropped");
            continue;
        };
        let mut item = remaining.remove(index);
        if item.state.is_some() && entry.state.is_some() {
            item.state = entry.state;
        }
        ordered.push(item);
    }

    // Canonical items the store never saw go to the back, in canonical
    // relative order.
    ordered.append(remaining);
    *remaining = ordered;
    canonical
}
