//! Integration tests for the Kopernik cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p kopernik-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout` - Order submission against a mock `POST /orders`
//! - `file_storage` - Cart and customer data persisted to a storage file
//!
//! The mock server binds an ephemeral port on `127.0.0.1`, so no external
//! services are needed.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use url::Url;

/// Canned answer and request log shared with the handler.
#[derive(Debug)]
struct MockState {
    status: StatusCode,
    body: String,
    received: Mutex<Vec<Value>>,
}

/// A `POST /orders` endpoint that records every body and answers with a
/// fixed status and body.
#[derive(Debug)]
pub struct MockOrderServer {
    addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockOrderServer {
    /// Start a server answering every order with `status` and `body`.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn start(status: u16, body: impl Into<String>) -> std::io::Result<Self> {
        let status = StatusCode::from_u16(status)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        let state = Arc::new(MockState {
            status,
            body: body.into(),
            received: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/orders", post(create_order))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { addr, state })
    }

    /// Start a server that accepts every order.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn accepting() -> std::io::Result<Self> {
        Self::start(
            201,
            r#"{"order_id": 42, "total": 28.5, "delivery_person": "Mia"}"#,
        )
        .await
    }

    /// The server's base URL, suitable for `KOPERNIK_BASE_URL`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// The full `/orders` endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the bound address does not form a URL.
    pub fn orders_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!("http://{}/orders", self.addr))
    }

    /// Bodies received so far, in arrival order.
    #[must_use]
    pub fn received(&self) -> Vec<Value> {
        self.state
            .received
            .lock()
            .map(|bodies| bodies.clone())
            .unwrap_or_default()
    }
}

async fn create_order(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if let Ok(mut received) = state.received.lock() {
        received.push(body);
    }
    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body.clone(),
    )
}
