#![forbid(unsafe_code)]

//! Ordered, identity-keyed item collections.
//!
//! A [`Collection`] is the in-memory shape of one dashboard section: a
//! sequence of [`Item`]s whose order is the externally observable contract
//! (position 0 renders first) and whose identity is the item id, never the
//! index. All lookups and moves are keyed by id so that concurrent
//! insertions or removals by the host can never corrupt an operation aimed
//! at a particular item.

/// One entry in a collection.
///
/// `P` is host payload (labels, icons); the collection never inspects it.
/// `state` is `Some` only for items with a toggleable on/off state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item<P> {
    /// Stable identity, unique within the collection.
    pub id: String,
    /// Opaque host data.
    pub payload: P,
    /// Toggleable state, if this item has one.
    pub state: Option<bool>,
}

impl<P> Item<P> {
    /// Create an item without toggleable state.
    pub fn new(id: impl Into<String>, payload: P) -> Self {
        Self {
            id: id.into(),
            payload,
            state: None,
        }
    }

    /// Create an item with a toggleable state.
    pub fn toggleable(id: impl Into<String>, payload: P, on: bool) -> Self {
        Self {
            id: id.into(),
            payload,
            state: Some(on),
        }
    }
}

/// An ordered sequence of items with no duplicate ids.
#[derive(Debug, Clone, Default)]
pub struct Collection<P> {
    items: Vec<Item<P>>,
}

impl<P> Collection<P> {
    /// Build a collection from the host's canonical item list.
    ///
    /// Duplicate ids keep their first occurrence; later occurrences are
    /// dropped with a diagnostic, preserving the no-duplicates invariant
    /// without making construction fallible.
    #[must_use]
    pub fn from_canonical(canonical: Vec<Item<P>>) -> Self {
        let mut items: Vec<Item<P>> = Vec::with_capacity(canonical.len());
        for item in canonical {
            if items.iter().any(|existing| existing.id == item.id) {
                tracing::warn!(id = %item.id, "duplicate canonical id dropped");
                continue;
            }
            items.push(item);
        }
        Self { items }
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All items, in render order.
    #[must_use]
    pub fn items(&self) -> &[Item<P>] {
        &self.items
    }

    /// Look up an item by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Item<P>> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Current position of an id, if present.
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// The current order as an id sequence.
    #[must_use]
    pub fn order(&self) -> Vec<String> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }

    /// Move the item `source_id` onto the slot currently held by
    /// `target_id`.
    ///
    /// The source is removed and reinserted at the target's original
    /// index: dragging toward the end places the source immediately after
    /// the target, dragging toward the front places it immediately before.
    /// Every position, including the last, is reachable by dropping onto
    /// its occupant. Returns `false` (order untouched) when the ids are
    /// equal or either is absent.
    pub fn move_item(&mut self, source_id: &str, target_id: &str) -> bool {
        if source_id == target_id {
            return false;
        }
        let (Some(source), Some(target)) = (self.index_of(source_id), self.index_of(target_id))
        else {
            tracing::debug!(source_id, target_id, "move with unknown id ignored");
            return false;
        };
        let item = self.items.remove(source);
        self.items.insert(target, item);
        true
    }

    /// Replace the toggle state of the item with matching id.
    ///
    /// Returns `false` when the id is absent or the item carries no
    /// toggleable state; the order is never touched.
    pub fn set_state(&mut self, id: &str, on: bool) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) if item.state.is_some() => {
                item.state = Some(on);
                true
            }
            Some(_) => {
                tracing::debug!(id, "state change on non-toggleable item ignored");
                false
            }
            None => {
                tracing::debug!(id, "state change on unknown id ignored");
                false
            }
        }
    }

    /// Flip the toggle state of the item with matching id.
    ///
    /// Returns the new state, or `None` when nothing changed.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let item = self.items.iter_mut().find(|item| item.id == id)?;
        let next = !item.state?;
        item.state = Some(next);
        Some(next)
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<Item<P>> {
        &mut self.items
    }
}
