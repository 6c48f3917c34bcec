use kopernik_core::{ItemId, ItemType, Price};
use tracing::{debug, instrument, warn};

use super::{Cart, normalize};
use crate::catalog::{CatalogEntry, CatalogProvider, price_lookup};
use crate::storage::{CART_KEY, KeyValueStore, StorageError};
use crate::view::{CartView, MiniCartView};

/// The persisted cart.
///
/// Every operation is a full load/mutate/save cycle against the backing
/// store, so the store is always the source of truth. The catalog is fixed
/// at construction and only used for pricing and display.
#[derive(Debug, Clone)]
pub struct CartStore<S, C> {
    storage: S,
    catalog: C,
}

impl<S: KeyValueStore, C: CatalogProvider> CartStore<S, C> {
    /// Create a cart store over `storage`, priced by `catalog`.
    pub const fn new(storage: S, catalog: C) -> Self {
        Self { storage, catalog }
    }

    /// The backing store.
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// The injected catalog.
    pub const fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Load and normalize the persisted cart.
    ///
    /// Storage failures are logged and yield an empty cart.
    pub fn load(&self) -> Cart {
        match self.storage.get_item(CART_KEY) {
            Ok(raw) => normalize(raw.as_deref()),
            Err(e) => {
                warn!(error = %e, "failed to read stored cart, starting empty");
                Cart::new()
            }
        }
    }

    /// Persist `cart` as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be written to storage.
    pub fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        let json = serde_json::to_string(cart)?;
        self.storage.set_item(CART_KEY, &json)
    }

    /// Add one unit of an item and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be written to storage.
    #[instrument(skip(self))]
    pub fn add(&self, item_id: ItemId, item_type: ItemType) -> Result<Cart, StorageError> {
        let mut cart = self.load();
        cart.add_one(item_id, item_type);
        self.save(&cart)?;
        debug!(count = cart.total_count(), "item added to cart");
        Ok(cart)
    }

    /// Adjust an item's quantity by `delta` and persist.
    ///
    /// Items not in the cart are ignored and nothing is written. A quantity
    /// driven to zero or below removes the line.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be written to storage.
    #[instrument(skip(self))]
    pub fn change_quantity(
        &self,
        item_id: ItemId,
        item_type: ItemType,
        delta: i32,
    ) -> Result<Cart, StorageError> {
        let mut cart = self.load();
        if !cart.change_quantity(item_id, item_type, delta) {
            debug!("item not in cart, ignoring quantity change");
            return Ok(cart);
        }
        self.save(&cart)?;
        Ok(cart)
    }

    /// Remove an item's line and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be written to storage.
    #[instrument(skip(self))]
    pub fn remove(&self, item_id: ItemId, item_type: ItemType) -> Result<Cart, StorageError> {
        let mut cart = self.load();
        cart.remove(item_id, item_type);
        self.save(&cart)?;
        Ok(cart)
    }

    /// Delete the persisted cart.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove_item(CART_KEY)
    }

    /// Resolve an item against the injected catalog.
    pub fn price_lookup(&self, item_id: ItemId, item_type: ItemType) -> Option<&CatalogEntry> {
        price_lookup(&self.catalog, item_id, item_type)
    }

    /// Total number of units in the persisted cart.
    pub fn total_count(&self) -> u32 {
        self.load().total_count()
    }

    /// Total price of the persisted cart.
    pub fn total_price(&self) -> Price {
        self.load().total_price(&self.catalog)
    }

    /// Itemized checkout view of the persisted cart.
    pub fn view(&self) -> CartView {
        CartView::build(&self.load(), &self.catalog)
    }

    /// Mini-cart dropdown view of the persisted cart.
    pub fn mini_view(&self) -> MiniCartView {
        MiniCartView::from(&self.view())
    }
}
