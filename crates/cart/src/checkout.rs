//! The order form's submit flow.
//!
//! 1. An empty cart is rejected before anything is sent.
//! 2. The cart and saved form fields become an [`OrderRequest`].
//! 3. On `201 Created` the persisted cart is cleared; on any other status it
//!    is left intact so the customer can fix the problem and resubmit.
//!
//! Saved customer fields are never touched. Nothing is retried, and a
//! transport failure is returned to the caller as-is.

use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::cart::CartStore;
use crate::catalog::CatalogProvider;
use crate::customer::CustomerStore;
use crate::order::{OrderConfirmation, OrderError, OrderReply, OrderRequest, OrderSubmitter};
use crate::storage::KeyValueStore;

/// Errors that abort a checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to order. No request was sent.
    #[error("Cart is empty")]
    EmptyCart,

    /// The order could not be delivered or its response understood.
    #[error("order submission failed: {0}")]
    Order(#[from] OrderError),
}

/// Result of a submitted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// The order was created and the cart cleared.
    Placed(OrderConfirmation),
    /// The server refused the order; the cart is unchanged.
    Rejected { status: u16, message: String },
}

impl CheckoutOutcome {
    /// Message for the order result area.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Placed(confirmation) => confirmation.message(),
            Self::Rejected { message, .. } => format!("Error: {message}"),
        }
    }

    /// Whether the order went through.
    #[must_use]
    pub const fn is_placed(&self) -> bool {
        matches!(self, Self::Placed(_))
    }
}

/// Submit the persisted cart as an order.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] without sending anything when the
/// cart is empty, and [`CheckoutError::Order`] when the request fails in
/// transit or the response is not understood.
#[instrument(skip_all)]
pub async fn submit_order<S, C, T, O>(
    cart: &CartStore<S, C>,
    customer: &CustomerStore<T>,
    submitter: &O,
) -> Result<CheckoutOutcome, CheckoutError>
where
    S: KeyValueStore,
    C: CatalogProvider,
    T: KeyValueStore,
    O: OrderSubmitter,
{
    let current = cart.load();
    if current.is_empty() {
        warn!("checkout attempted with an empty cart");
        return Err(CheckoutError::EmptyCart);
    }

    let request = OrderRequest::from_cart(&current, &customer.load());
    info!(
        lines = request.items.len(),
        units = current.total_count(),
        "submitting order"
    );

    match submitter.submit(&request).await? {
        OrderReply::Created(confirmation) => {
            info!(order_id = ?confirmation.order_id, total = ?confirmation.total, "order placed");
            // The order already exists server-side, so report it as placed regardless.
            if let Err(e) = cart.clear() {
                error!(error = %e, "order placed but the cart could not be cleared");
            }
            Ok(CheckoutOutcome::Placed(confirmation))
        }
        OrderReply::Rejected { status, message } => {
            Ok(CheckoutOutcome::Rejected { status, message })
        }
    }
}
