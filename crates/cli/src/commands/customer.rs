//! Saved order-form fields.
//!
//! # Usage
//!
//! ```bash
//! kopernik customer set email ada@example.com
//! kopernik customer show
//! kopernik customer clear
//! ```

use kopernik_cart::CustomerField;

use super::Context;
use crate::output;

/// Save one field.
///
/// # Errors
///
/// Returns an error if the fields cannot be written.
pub fn set(ctx: &Context, field: CustomerField, value: &str) -> kopernik_cart::Result<()> {
    let fields = ctx.customer().set_field(field, value)?;
    output::customer(&fields);
    Ok(())
}

/// Print the saved fields.
pub fn show(ctx: &Context) {
    output::customer(&ctx.customer().load());
}

/// Forget all saved fields.
///
/// # Errors
///
/// Returns an error if storage cannot be written.
pub fn clear(ctx: &Context) -> kopernik_cart::Result<()> {
    ctx.customer().clear()?;
    Ok(())
}
