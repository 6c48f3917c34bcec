//! Display data for the checkout cart and the mini-cart dropdown.
//!
//! Views carry resolved names and prices; turning them into markup is up
//! to the host.

use kopernik_core::{ItemId, ItemType, Price};

use crate::cart::Cart;
use crate::catalog::{CatalogProvider, fallback_name, price_lookup};

/// Shown in the checkout area when the cart has no lines.
pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty.";

/// Shown in the mini-cart dropdown when the cart has no lines.
pub const EMPTY_MINI_CART_MESSAGE: &str = "Cart is empty";

/// Where the mini-cart's checkout button leads.
pub const CHECKOUT_HREF: &str = "/checkout";

/// One cart line, resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub item_id: ItemId,
    pub item_type: ItemType,
    /// Catalog name, or `"<type> <id>"` when unresolved.
    pub name: String,
    pub quantity: u32,
    /// Zero when unresolved.
    pub unit_price: Price,
    pub line_price: Price,
    /// Whether the catalog knew this item.
    pub resolved: bool,
}

impl CartItemView {
    /// Name prefixed with the item type's emoji, e.g. `"🍕 Margherita"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.item_type.emoji(), self.name)
    }
}

/// Itemized cart with totals.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: Price,
    pub item_count: u32,
}

impl CartView {
    /// Resolve every line of `cart` against `catalog`.
    #[must_use]
    pub fn build<C: CatalogProvider + ?Sized>(cart: &Cart, catalog: &C) -> Self {
        let items: Vec<CartItemView> = cart
            .lines()
            .iter()
            .map(|line| {
                let entry = price_lookup(catalog, line.item_id, line.item_type);
                let unit_price = entry.map_or(Price::ZERO, |e| e.price);
                CartItemView {
                    item_id: line.item_id,
                    item_type: line.item_type,
                    name: entry.map_or_else(
                        || fallback_name(line.item_id, line.item_type),
                        |e| e.name.clone(),
                    ),
                    quantity: line.quantity,
                    unit_price,
                    line_price: unit_price.times(line.quantity),
                    resolved: entry.is_some(),
                }
            })
            .collect();

        Self {
            total: items.iter().map(|item| item.line_price).sum(),
            item_count: cart.total_count(),
            items,
        }
    }

    /// Whether there is nothing to list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `"Estimated total: €x.xx"`, or an empty string for an empty cart.
    #[must_use]
    pub fn total_label(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!("Estimated total: {}", self.total)
        }
    }
}

/// One line of the mini-cart dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiniCartLine {
    /// e.g. `"🍕 Margherita x2"`.
    pub label: String,
    pub amount: Price,
}

/// Compact cart summary for the header dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MiniCartView {
    pub lines: Vec<MiniCartLine>,
    /// Badge count: total units, not lines.
    pub count: u32,
    /// Present only when there is something to check out.
    pub checkout_href: Option<&'static str>,
}

impl MiniCartView {
    /// Whether the dropdown should show the empty message.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<&CartView> for MiniCartView {
    fn from(view: &CartView) -> Self {
        Self {
            lines: view
                .items
                .iter()
                .map(|item| MiniCartLine {
                    label: format!("{} x{}", item.label(), item.quantity),
                    amount: item.line_price,
                })
                .collect(),
            count: view.item_count,
            checkout_href: (!view.is_empty()).then_some(CHECKOUT_HREF),
        }
    }
}
