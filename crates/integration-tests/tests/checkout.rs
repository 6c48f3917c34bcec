//! Integration tests for order submission.
//!
//! Each test starts its own mock `POST /orders` on an ephemeral port.

#![allow(clippy::unwrap_used)]

use kopernik_cart::storage::{CART_KEY, CUSTOMER_STORAGE_KEY};
use kopernik_cart::{
    CartConfig, CartStore, Catalog, CatalogEntry, CheckoutError, CheckoutOutcome,
    CustomerField, CustomerStore, KeyValueStore, MemoryStore, OrderClient, OrderError,
    submit_order,
};
use kopernik_core::{ItemId, ItemType, OrderId, Price};
use kopernik_integration_tests::MockOrderServer;
use serde_json::json;

fn catalog() -> Catalog {
    Catalog::combined_from(vec![
        CatalogEntry::new(ItemId::new(1), "Margherita", Price::from_cents(950), ItemType::Pizza),
        CatalogEntry::new(ItemId::new(2), "Cola", Price::from_cents(250), ItemType::Drink),
    ])
}

fn fill_customer(customer: &CustomerStore<&MemoryStore>) {
    customer.set_field(CustomerField::Name, "Ada Lovelace").unwrap();
    customer.set_field(CustomerField::Email, "ada@example.com").unwrap();
    customer.set_field(CustomerField::Phone, "+31 6 1234").unwrap();
    customer.set_field(CustomerField::Address, "Main St 1, 10001").unwrap();
}

fn client_for(server: &MockOrderServer) -> OrderClient {
    let base_url = server.base_url();
    let config = CartConfig::from_lookup(|key| {
        (key == "KOPERNIK_BASE_URL").then(|| base_url.clone())
    })
    .unwrap();
    OrderClient::new(&config)
}

// ============================================================================
// Placed Orders
// ============================================================================

#[tokio::test]
async fn test_placed_order_clears_cart_and_keeps_customer() {
    let server = MockOrderServer::accepting().await.unwrap();
    let storage = MemoryStore::new();
    let cart = CartStore::new(&storage, catalog());
    let customer = CustomerStore::new(&storage);
    fill_customer(&customer);

    cart.add(ItemId::new(1), ItemType::Pizza).unwrap();
    cart.add(ItemId::new(1), ItemType::Pizza).unwrap();
    cart.add(ItemId::new(2), ItemType::Drink).unwrap();

    let outcome = submit_order(&cart, &customer, &client_for(&server))
        .await
        .unwrap();

    let CheckoutOutcome::Placed(confirmation) = &outcome else {
        panic!("expected a placed order, got {outcome:?}");
    };
    assert_eq!(confirmation.order_id, Some(OrderId::new(42)));
    assert_eq!(
        outcome.message(),
        "Order placed! id=42, total=28.5, delivery by Mia"
    );

    assert_eq!(storage.get_item(CART_KEY).unwrap(), None);
    assert_eq!(cart.total_count(), 0);
    assert_eq!(
        customer.load().get(CustomerField::Name),
        Some("Ada Lovelace")
    );
    assert!(storage.get_item(CUSTOMER_STORAGE_KEY).unwrap().is_some());
}

#[tokio::test]
async fn test_request_payload_sent_to_server() {
    let server = MockOrderServer::accepting().await.unwrap();
    let storage = MemoryStore::new();
    let cart = CartStore::new(&storage, catalog());
    let customer = CustomerStore::new(&storage);
    fill_customer(&customer);
    customer.set_field(CustomerField::DiscountCode, "WELCOME10").unwrap();

    cart.add(ItemId::new(1), ItemType::Pizza).unwrap();
    cart.add(ItemId::new(2), ItemType::Drink).unwrap();
    cart.change_quantity(ItemId::new(2), ItemType::Drink, 2).unwrap();

    submit_order(&cart, &customer, &client_for(&server))
        .await
        .unwrap();

    assert_eq!(
        server.received(),
        vec![json!({
            "customer": {
                "name": "Ada Lovelace",
                "email": "ada@example.com",
                "phone": "+31 6 1234",
                "address": "Main St 1, 10001"
            },
            "items": [
                {"item_id": 1, "item_type": "pizza", "quantity": 1, "pizza_id": 1},
                {"item_id": 2, "item_type": "drink", "quantity": 3}
            ],
            "discount_code": "WELCOME10"
        })]
    );
}

#[tokio::test]
async fn test_legacy_cart_is_submitted_as_typed_items() {
    let server = MockOrderServer::accepting().await.unwrap();
    let storage = MemoryStore::new();
    storage
        .set_item(CART_KEY, r#"[{"pizza_id": 3, "quantity": "2"}]"#)
        .unwrap();
    let cart = CartStore::new(&storage, Catalog::empty());
    let customer = CustomerStore::new(&storage);

    let outcome = submit_order(&cart, &customer, &client_for(&server))
        .await
        .unwrap();

    assert!(outcome.is_placed());
    let received = server.received();
    assert_eq!(
        received[0]["items"],
        json!([{"item_id": 3, "item_type": "pizza", "quantity": 2, "pizza_id": 3}])
    );
    assert_eq!(received[0]["customer"]["name"], "");
}

#[tokio::test]
async fn test_no_courier_warning() {
    let server = MockOrderServer::start(
        201,
        r#"{"order_id": 7, "total": "12.00", "delivery_person": "No courier available"}"#,
    )
    .await
    .unwrap();
    let storage = MemoryStore::new();
    let cart = CartStore::new(&storage, catalog());
    let customer = CustomerStore::new(&storage);
    cart.add(ItemId::new(1), ItemType::Pizza).unwrap();

    let outcome = submit_order(&cart, &customer, &client_for(&server))
        .await
        .unwrap();

    assert_eq!(
        outcome.message(),
        "Order placed! id=7, total=12.00 ⚠️ No courier available"
    );
}

#[tokio::test]
async fn test_created_order_with_unexpected_body_still_clears_cart() {
    let server = MockOrderServer::start(
        201,
        r#"{"success": true, "order_id": 9, "total": null, "delivery_person": null}"#,
    )
    .await
    .unwrap();
    let storage = MemoryStore::new();
    let cart = CartStore::new(&storage, catalog());
    let customer = CustomerStore::new(&storage);
    cart.add(ItemId::new(1), ItemType::Pizza).unwrap();

    let outcome = submit_order(&cart, &customer, &client_for(&server))
        .await
        .unwrap();

    assert!(outcome.is_placed());
    assert_eq!(
        outcome.message(),
        "Order placed! id=9, total=null, delivery by null"
    );
    assert_eq!(server.received().len(), 1);
    assert_eq!(storage.get_item(CART_KEY).unwrap(), None);
}

// ============================================================================
// Rejections and Failures
// ============================================================================

#[tokio::test]
async fn test_rejection_with_error_message_keeps_cart() {
    let server = MockOrderServer::start(400, r#"{"error": "Invalid discount code"}"#)
        .await
        .unwrap();
    let storage = MemoryStore::new();
    let cart = CartStore::new(&storage, catalog());
    let customer = CustomerStore::new(&storage);
    cart.add(ItemId::new(1), ItemType::Pizza).unwrap();
    let before = storage.get_item(CART_KEY).unwrap();

    let outcome = submit_order(&cart, &customer, &client_for(&server))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        CheckoutOutcome::Rejected {
            status: 400,
            message: "Invalid discount code".to_string()
        }
    );
    assert_eq!(outcome.message(), "Error: Invalid discount code");
    assert_eq!(storage.get_item(CART_KEY).unwrap(), before);
}

#[tokio::test]
async fn test_rejection_without_error_field_shows_raw_json() {
    let server = MockOrderServer::start(422, r#"{"detail": "address required"}"#)
        .await
        .unwrap();
    let storage = MemoryStore::new();
    let cart = CartStore::new(&storage, catalog());
    let customer = CustomerStore::new(&storage);
    cart.add(ItemId::new(2), ItemType::Drink).unwrap();

    let outcome = submit_order(&cart, &customer, &client_for(&server))
        .await
        .unwrap();

    assert_eq!(
        outcome.message(),
        r#"Error: {"detail":"address required"}"#
    );
    assert_eq!(cart.total_count(), 1);
}

#[tokio::test]
async fn test_non_json_response_is_an_error() {
    let server = MockOrderServer::start(502, "Bad Gateway").await.unwrap();
    let storage = MemoryStore::new();
    let cart = CartStore::new(&storage, catalog());
    let customer = CustomerStore::new(&storage);
    cart.add(ItemId::new(1), ItemType::Pizza).unwrap();

    let err = submit_order(&cart, &customer, &client_for(&server))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CheckoutError::Order(OrderError::Parse { status: 502, .. })
    ));
    assert_eq!(cart.total_count(), 1);
}

#[tokio::test]
async fn test_empty_cart_sends_no_request() {
    let server = MockOrderServer::accepting().await.unwrap();
    let storage = MemoryStore::new();
    let cart = CartStore::new(&storage, catalog());
    let customer = CustomerStore::new(&storage);
    fill_customer(&customer);

    let err = submit_order(&cart, &customer, &client_for(&server))
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::EmptyCart));
    assert!(server.received().is_empty());
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let storage = MemoryStore::new();
    let cart = CartStore::new(&storage, catalog());
    let customer = CustomerStore::new(&storage);
    cart.add(ItemId::new(1), ItemType::Pizza).unwrap();

    let client =
        OrderClient::with_endpoint(format!("http://{addr}/orders").parse().unwrap());
    let err = submit_order(&cart, &customer, &client).await.unwrap_err();

    assert!(matches!(err, CheckoutError::Order(OrderError::Http(_))));
    assert_eq!(cart.total_count(), 1);
}

#[tokio::test]
async fn test_explicit_endpoint() {
    let server = MockOrderServer::accepting().await.unwrap();
    let client = OrderClient::with_endpoint(server.orders_url().unwrap());
    assert_eq!(client.endpoint().path(), "/orders");

    let storage = MemoryStore::new();
    let cart = CartStore::new(&storage, catalog());
    let customer = CustomerStore::new(&storage);
    cart.add(ItemId::new(2), ItemType::Drink).unwrap();

    assert!(submit_order(&cart, &customer, &client).await.unwrap().is_placed());
    assert_eq!(server.received().len(), 1);
}
