//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! kopernik add 7
//! kopernik add drink-2
//! kopernik add 3 --type dessert
//! kopernik decr 2 --type drink
//! kopernik show
//! ```

use kopernik_cart::catalog::parse_item_ref;
use kopernik_core::{ItemId, ItemType};
use tracing::info;

use super::Context;
use crate::output;

/// Toast shown after an add-to-cart.
const ADDED_MESSAGE: &str = "Added to cart";

/// Add one unit of the referenced item.
///
/// # Errors
///
/// Returns an error if the reference is not understood or the cart cannot be saved.
pub fn add(ctx: &Context, reference: &str, type_attr: Option<&str>) -> kopernik_cart::Result<()> {
    let (item_id, item_type) = parse_item_ref(reference, type_attr).ok_or_else(|| {
        kopernik_cart::Error::BadRequest(format!("unknown item reference '{reference}'"))
    })?;

    let store = ctx.cart();
    let cart = store.add(item_id, item_type)?;
    info!(%item_id, %item_type, count = cart.total_count(), "item added");

    output::line(ADDED_MESSAGE);
    output::mini_cart(&store.mini_view());
    Ok(())
}

/// Change a line's quantity by `delta`.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub fn change(ctx: &Context, id: i32, item_type: ItemType, delta: i32) -> kopernik_cart::Result<()> {
    let store = ctx.cart();
    store.change_quantity(ItemId::new(id), item_type, delta)?;
    output::cart(&store.view());
    Ok(())
}

/// Remove a line.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub fn remove(ctx: &Context, id: i32, item_type: ItemType) -> kopernik_cart::Result<()> {
    let store = ctx.cart();
    store.remove(ItemId::new(id), item_type)?;
    output::cart(&store.view());
    Ok(())
}

/// Print the checkout cart.
pub fn show(ctx: &Context) {
    output::cart(&ctx.cart().view());
}

/// Print the mini-cart dropdown.
pub fn mini(ctx: &Context) {
    output::mini_cart(&ctx.cart().mini_view());
}

/// Print the badge count.
pub fn count(ctx: &Context) {
    output::line(&ctx.cart().total_count().to_string());
}
