//! Order-independent description of a drop position.
//!
//! Instead of sending an index (which is only meaningful against one exact
//! snapshot of the list), the client names the items immediately before and
//! after the dropped item. The server resolves those against its own order.

use serde::{Deserialize, Serialize};

use crate::ItemId;

/// The pair of item ids adjacent to a newly dropped position.
///
/// `prev` is `None` iff the item landed first, `next` is `None` iff it landed
/// last.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NeighborRef {
    pub prev: Option<ItemId>,
    pub next: Option<ItemId>,
}

impl NeighborRef {
    /// Creates a neighbor reference from explicit neighbors.
    #[must_use]
    pub fn new(prev: Option<ItemId>, next: Option<ItemId>) -> Self {
        Self { prev, next }
    }

    /// Computes the neighbors of position `index` in `order`, where `order` is
    /// the container's post-move child order (the moved item included).
    ///
    /// Returns `None` if `index` is out of bounds.
    #[must_use]
    pub fn at(order: &[ItemId], index: usize) -> Option<Self> {
        if index >= order.len() {
            return None;
        }
        let prev = index.checked_sub(1).map(|i| order[i].clone());
        let next = order.get(index + 1).cloned();
        Some(Self { prev, next })
    }

    /// Returns true if the item was placed first.
    #[must_use]
    pub fn is_first(&self) -> bool {
        self.prev.is_none()
    }

    /// Returns true if the item was placed last.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }
}
