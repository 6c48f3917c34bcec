//! Place the order.
//!
//! Posts the cart and saved form fields to `<KOPERNIK_BASE_URL>/orders`.
//! The cart is emptied only when the server answers `201 Created`.
//!
//! # Usage
//!
//! ```bash
//! KOPERNIK_BASE_URL=https://pizza.example kopernik checkout
//! ```

use kopernik_cart::{OrderClient, submit_order};

use super::Context;
use crate::output;

/// Submit the cart.
///
/// A rejected order is reported, not returned as an error.
///
/// # Errors
///
/// Returns an error if the cart is empty or the request fails.
pub async fn run(ctx: &Context) -> kopernik_cart::Result<()> {
    let client = OrderClient::new(&ctx.config);
    let outcome = submit_order(&ctx.cart(), &ctx.customer(), &client).await?;

    output::line(&outcome.message());
    if outcome.is_placed() {
        output::mini_cart(&ctx.cart().mini_view());
    }
    Ok(())
}
