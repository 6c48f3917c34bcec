//! Integration tests for the file-backed store shared by cart and customer data.

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use kopernik_cart::storage::CART_KEY;
use kopernik_cart::{
    CartStore, Catalog, CustomerField, CustomerStore, FileStore, KeyValueStore, MemoryStore,
};
use kopernik_core::{ItemId, ItemType};

fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("kopernik-it-{}", uuid::Uuid::new_v4()))
}

const HOST_CATALOG: &str = r#"{
    "pizzas": [
        {"id": 1, "name": "Margherita", "price": 9.5},
        {"id": "2", "name": "Funghi", "price": "11.00"}
    ],
    "all_items": [
        {"id": 1, "name": "Tiramisu", "price": 6, "type": "dessert"}
    ],
    "cards": [
        {"data-pid": "drink-4", "data-price": "2.50", "data-name": "Cola"}
    ]
}"#;

#[test]
fn test_cart_survives_reopening() {
    let path = temp_dir().join("storage.json");

    let first = CartStore::new(FileStore::new(&path), Catalog::empty());
    first.add(ItemId::new(1), ItemType::Pizza).unwrap();
    first.add(ItemId::new(1), ItemType::Pizza).unwrap();
    first.add(ItemId::new(4), ItemType::Drink).unwrap();

    let second = CartStore::new(FileStore::new(&path), Catalog::empty());
    assert_eq!(second.load(), first.load());
    assert_eq!(second.total_count(), 3);

    second
        .change_quantity(ItemId::new(1), ItemType::Pizza, -2)
        .unwrap();
    assert_eq!(first.total_count(), 1);
}

#[test]
fn test_cart_and_customer_share_one_file() {
    let path = temp_dir().join("storage.json");
    let storage = FileStore::new(&path);

    let cart = CartStore::new(&storage, Catalog::empty());
    let customer = CustomerStore::new(&storage);
    cart.add(ItemId::new(2), ItemType::Dessert).unwrap();
    customer.set_field(CustomerField::Email, "ada@example.com").unwrap();

    cart.clear().unwrap();

    assert_eq!(storage.get_item(CART_KEY).unwrap(), None);
    assert_eq!(
        CustomerStore::new(FileStore::new(&path))
            .load()
            .get(CustomerField::Email),
        Some("ada@example.com")
    );
}

#[test]
fn test_legacy_file_is_rewritten_on_first_change() {
    let path = temp_dir().join("storage.json");
    let storage = FileStore::new(&path);
    storage
        .set_item(
            CART_KEY,
            r#"[{"pizza_id": 5, "quantity": 1}, {"pizza_id": 5, "quantity": 2}, null]"#,
        )
        .unwrap();

    let cart = CartStore::new(&storage, Catalog::empty());
    cart.add(ItemId::new(5), ItemType::Pizza).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&storage.get_item(CART_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(
        raw,
        serde_json::json!([{"item_id": 5, "item_type": "pizza", "quantity": 4}])
    );
}

#[test]
fn test_corrupt_storage_file_is_replaced_on_next_change() {
    let dir = temp_dir();
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("storage.json");
    std::fs::write(&path, "not json").unwrap();

    let cart = CartStore::new(FileStore::new(&path), Catalog::empty());
    assert!(cart.load().is_empty());

    cart.add(ItemId::new(1), ItemType::Pizza).unwrap();
    cart.add(ItemId::new(1), ItemType::Pizza).unwrap();
    assert_eq!(cart.total_count(), 2);

    let customer = CustomerStore::new(FileStore::new(&path));
    customer.set_field(CustomerField::Name, "Ada").unwrap();
    assert_eq!(customer.load().get(CustomerField::Name), Some("Ada"));
    assert_eq!(cart.total_count(), 2);
}

#[test]
fn test_host_catalog_file_prices_the_cart() {
    let dir = temp_dir();
    std::fs::create_dir_all(&dir).unwrap();
    let catalog_path = dir.join("catalog.json");
    std::fs::write(&catalog_path, HOST_CATALOG).unwrap();

    let cart = CartStore::new(MemoryStore::new(), Catalog::from_path(&catalog_path).unwrap());
    cart.add(ItemId::new(1), ItemType::Pizza).unwrap();
    cart.add(ItemId::new(2), ItemType::Pizza).unwrap();
    cart.add(ItemId::new(4), ItemType::Drink).unwrap();
    cart.add(ItemId::new(1), ItemType::Dessert).unwrap();

    let view = cart.view();
    let labels: Vec<String> = view.items.iter().map(|item| item.label()).collect();
    assert_eq!(
        labels,
        vec!["🍕 Margherita", "🍕 Funghi", "🥤 Cola", "🍰 Tiramisu"]
    );
    assert_eq!(view.total_label(), "Estimated total: €29.00");

    let mini = cart.mini_view();
    assert_eq!(mini.count, 4);
    assert_eq!(mini.checkout_href, Some("/checkout"));
}

#[test]
fn test_missing_catalog_file_is_an_error() {
    let path = temp_dir().join("missing.json");
    let err = Catalog::from_path(&path).unwrap_err();
    assert!(err.to_string().starts_with("Failed to read catalog"));
}
