//! Order submission to `POST /orders`.
//!
//! # Wire format
//!
//! ```json
//! {
//!   "customer": {"name": "...", "email": "...", "phone": "...", "address": "...", "birthday": "..."},
//!   "items": [{"item_id": 1, "item_type": "pizza", "quantity": 2, "pizza_id": 1}],
//!   "discount_code": "..."
//! }
//! ```
//!
//! `birthday` and `discount_code` are omitted when blank. `pizza_id` mirrors
//! `item_id` on pizza lines for servers that predate typed items. The server
//! answers `201 Created` with `{order_id, total, delivery_person}`; any other
//! status is a rejection carrying `{"error": "..."}` or some other JSON body.

use std::future::Future;

use kopernik_core::{ItemId, ItemType, OrderId};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::cart::Cart;
use crate::config::CartConfig;
use crate::customer::{CustomerField, CustomerFields};

/// Courier text the server uses when nobody is available to deliver.
const NO_COURIER_PREFIX: &str = "No courier";

/// Errors that can occur when submitting an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The request never got a response.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with something other than JSON.
    #[error("invalid JSON in order response (HTTP {status}): {source}")]
    Parse {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

// =============================================================================
// Request
// =============================================================================

/// Customer block of an order request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
}

/// One ordered line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItemPayload {
    pub item_id: ItemId,
    pub item_type: ItemType,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pizza_id: Option<ItemId>,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRequest {
    pub customer: CustomerPayload,
    pub items: Vec<OrderItemPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_code: Option<String>,
}

impl OrderRequest {
    /// Build a request from the cart and the order form fields.
    #[must_use]
    pub fn from_cart(cart: &Cart, fields: &CustomerFields) -> Self {
        let items = cart
            .lines()
            .iter()
            .map(|line| OrderItemPayload {
                item_id: line.item_id,
                item_type: line.item_type,
                quantity: line.quantity,
                pizza_id: (line.item_type == ItemType::Pizza).then_some(line.item_id),
            })
            .collect();

        Self {
            customer: CustomerPayload {
                name: fields.value(CustomerField::Name).to_owned(),
                email: fields.value(CustomerField::Email).to_owned(),
                phone: fields.value(CustomerField::Phone).to_owned(),
                address: fields.value(CustomerField::Address).to_owned(),
                birthday: fields.non_empty(CustomerField::Birthday).map(str::to_owned),
            },
            items,
            discount_code: fields
                .non_empty(CustomerField::DiscountCode)
                .map(str::to_owned),
        }
    }
}

// =============================================================================
// Response
// =============================================================================

/// Body of a `201 Created` order response.
///
/// The order exists once the server answers 201, so every field is read
/// leniently: a missing or mistyped value is `None`, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderConfirmation {
    pub order_id: Option<OrderId>,
    pub total: Option<Decimal>,
    pub delivery_person: Option<String>,
}

impl OrderConfirmation {
    /// Read a confirmation from a response body.
    #[must_use]
    pub fn from_json(json: &serde_json::Value) -> Self {
        let order_id = json
            .get("order_id")
            .and_then(serde_json::Value::as_i64)
            .and_then(|id| i32::try_from(id).ok())
            .map(OrderId::new);
        let total = json
            .get("total")
            .filter(|v| v.is_number() || v.is_string())
            .and_then(|v| serde_json::from_value::<Decimal>(v.clone()).ok());
        let delivery_person = json
            .get("delivery_person")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned);

        Self {
            order_id,
            total,
            delivery_person,
        }
    }

    /// Whether the server placed the order without a courier.
    #[must_use]
    pub fn courier_unavailable(&self) -> bool {
        self.delivery_person
            .as_deref()
            .is_some_and(|p| p.starts_with(NO_COURIER_PREFIX))
    }

    /// Message shown in the order result area.
    ///
    /// Absent values print as `null`, as the order page always has.
    #[must_use]
    pub fn message(&self) -> String {
        let placed = format!(
            "Order placed! id={}, total={}",
            or_null(self.order_id.as_ref()),
            or_null(self.total.as_ref())
        );
        let courier = or_null(self.delivery_person.as_ref());
        if self.courier_unavailable() {
            format!("{placed} ⚠️ {courier}")
        } else {
            format!("{placed}, delivery by {courier}")
        }
    }
}

fn or_null<T: std::fmt::Display>(value: Option<&T>) -> String {
    value.map_or_else(|| "null".to_owned(), ToString::to_string)
}

/// Outcome of a submitted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderReply {
    /// `201 Created`.
    Created(OrderConfirmation),
    /// Any other status.
    Rejected { status: u16, message: String },
}

impl OrderReply {
    /// Interpret a response status and body.
    ///
    /// Any 201 is a created order, whatever its body holds. The rejection
    /// message is the body's `error` string when present, otherwise the body
    /// re-serialized as compact JSON.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Parse`] if a non-201 body is not JSON.
    pub fn from_response(status: u16, body: &str) -> Result<Self, OrderError> {
        if status == 201 {
            let json = serde_json::from_str(body).unwrap_or_else(|e| {
                warn!(error = %e, "order created but the response body is not JSON");
                serde_json::Value::Null
            });
            return Ok(Self::Created(OrderConfirmation::from_json(&json)));
        }

        let json: serde_json::Value =
            serde_json::from_str(body).map_err(|source| OrderError::Parse { status, source })?;

        let message = match json.get("error") {
            Some(serde_json::Value::String(error)) if !error.is_empty() => error.clone(),
            _ => json.to_string(),
        };
        Ok(Self::Rejected { status, message })
    }
}

// =============================================================================
// Submission
// =============================================================================

/// Something that can deliver an [`OrderRequest`] to the order endpoint.
pub trait OrderSubmitter {
    /// Send `order` and interpret the response.
    fn submit(
        &self,
        order: &OrderRequest,
    ) -> impl Future<Output = Result<OrderReply, OrderError>> + Send;
}

/// HTTP client for the order endpoint.
#[derive(Debug, Clone)]
pub struct OrderClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl OrderClient {
    /// Create a client posting to the configured storefront's `/orders`.
    #[must_use]
    pub fn new(config: &CartConfig) -> Self {
        Self::with_endpoint(config.orders_url())
    }

    /// Create a client posting to an explicit endpoint.
    #[must_use]
    pub fn with_endpoint(endpoint: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    /// The URL orders are posted to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl OrderSubmitter for OrderClient {
    #[instrument(skip(self, order), fields(endpoint = %self.endpoint, lines = order.items.len()))]
    async fn submit(&self, order: &OrderRequest) -> Result<OrderReply, OrderError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(order)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(status, bytes = body.len(), "order response received");

        let reply = OrderReply::from_response(status, &body)?;
        if let OrderReply::Rejected { status, message } = &reply {
            warn!(status, message = %message, "order rejected by server");
        }
        Ok(reply)
    }
}
