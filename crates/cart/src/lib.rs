//! Kopernik Cart - client-local shopping cart for the Kopernik storefront.
//!
//! # Architecture
//!
//! - [`storage`] - String key/value store shaped like browser local storage
//! - [`catalog`] - Host-supplied menu catalogs and price lookup
//! - [`cart`] - Line items, legacy-record migration, and the persisted [`CartStore`]
//! - [`view`] - Resolved display data for the checkout cart and mini-cart
//! - [`customer`] - Persisted order-form fields
//! - [`order`] - `POST /orders` payloads and the HTTP client
//! - [`checkout`] - The submit flow tying cart, customer fields, and client together
//!
//! # Example
//!
//! ```rust
//! use kopernik_cart::{CartStore, Catalog, CatalogEntry, MemoryStore};
//! use kopernik_core::{ItemId, ItemType, Price};
//!
//! let catalog = Catalog::combined_from(vec![CatalogEntry::new(
//!     ItemId::new(1),
//!     "Margherita",
//!     Price::from_cents(950),
//!     ItemType::Pizza,
//! )]);
//! let store = CartStore::new(MemoryStore::new(), catalog);
//!
//! store.add(ItemId::new(1), ItemType::Pizza)?;
//! store.add(ItemId::new(1), ItemType::Pizza)?;
//!
//! assert_eq!(store.total_count(), 2);
//! assert_eq!(store.total_price().to_string(), "€19.00");
//! # Ok::<(), kopernik_cart::StorageError>(())
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod customer;
pub mod error;
pub mod order;
pub mod storage;
pub mod view;

pub use cart::{Cart, CartStore, LineItem};
pub use catalog::{Catalog, CatalogEntry, CatalogProvider, HostCatalog, ItemCard, price_lookup};
pub use checkout::{CheckoutError, CheckoutOutcome, submit_order};
pub use config::{CartConfig, ConfigError};
pub use customer::{CustomerField, CustomerFieldError, CustomerFields, CustomerStore};
pub use error::{Error, Result};
pub use order::{OrderClient, OrderConfirmation, OrderError, OrderReply, OrderRequest, OrderSubmitter};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use view::{CartItemView, CartView, MiniCartLine, MiniCartView};
