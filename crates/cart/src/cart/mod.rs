//! Cart data model and the persisted cart store.
//!
//! A [`Cart`] is an ordered list of [`LineItem`]s, unique by
//! `(item_id, item_type)`, every one with a positive quantity. All mutation
//! rules live on [`Cart`]; [`CartStore`] wraps them in
//! load/mutate/save cycles against a [`KeyValueStore`](crate::storage::KeyValueStore).

mod normalize;
mod store;

pub use normalize::{StoredLine, normalize};
pub use store::CartStore;

use kopernik_core::{ItemId, ItemType, Price};
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogProvider, price_lookup};

/// One `(item, quantity)` entry in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub item_id: ItemId,
    pub item_type: ItemType,
    /// Always greater than zero.
    pub quantity: u32,
}

impl LineItem {
    fn matches(&self, item_id: ItemId, item_type: ItemType) -> bool {
        self.item_id == item_id && self.item_type == item_type
    }
}

/// Ordered collection of line items.
///
/// Serializes as a bare JSON array, which is the persisted shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<LineItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from lines, merging duplicates and dropping empty lines.
    #[must_use]
    pub fn from_lines(lines: impl IntoIterator<Item = LineItem>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            cart.merge_line(line);
        }
        cart
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// The line for `(item_id, item_type)`, if present.
    #[must_use]
    pub fn find(&self, item_id: ItemId, item_type: ItemType) -> Option<&LineItem> {
        self.lines.iter().find(|line| line.matches(item_id, item_type))
    }

    /// Add one unit, appending a new line if the item is not in the cart yet.
    pub fn add_one(&mut self, item_id: ItemId, item_type: ItemType) {
        self.merge_line(LineItem {
            item_id,
            item_type,
            quantity: 1,
        });
    }

    /// Adjust a line's quantity by `delta`.
    ///
    /// A quantity driven to zero or below removes the line. Returns `false`
    /// if the item is not in the cart, in which case nothing changes.
    pub fn change_quantity(&mut self, item_id: ItemId, item_type: ItemType, delta: i32) -> bool {
        let Some(index) = self
            .lines
            .iter()
            .position(|line| line.matches(item_id, item_type))
        else {
            return false;
        };

        let current = self.lines.get(index).map_or(0, |line| i64::from(line.quantity));
        let updated = current + i64::from(delta);
        if updated <= 0 {
            self.lines.remove(index);
        } else if let Some(line) = self.lines.get_mut(index) {
            line.quantity = u32::try_from(updated).unwrap_or(u32::MAX);
        }
        true
    }

    /// Drop the line for `(item_id, item_type)`. Returns whether one was removed.
    pub fn remove(&mut self, item_id: ItemId, item_type: ItemType) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| !line.matches(item_id, item_type));
        self.lines.len() != before
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |sum, line| sum.saturating_add(line.quantity))
    }

    /// Sum of quantity × unit price; unresolved items count as zero.
    #[must_use]
    pub fn total_price<C: CatalogProvider + ?Sized>(&self, catalog: &C) -> Price {
        self.lines
            .iter()
            .map(|line| {
                price_lookup(catalog, line.item_id, line.item_type)
                    .map_or(Price::ZERO, |entry| entry.price)
                    .times(line.quantity)
            })
            .sum()
    }

    fn merge_line(&mut self, line: LineItem) {
        if line.quantity == 0 {
            return;
        }
        match self
            .lines
            .iter_mut()
            .find(|existing| existing.matches(line.item_id, line.item_type))
        {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => self.lines.push(line),
        }
    }
}
