//! Command implementations.

pub mod cart;
pub mod checkout;
pub mod customer;

use kopernik_cart::{CartConfig, CartStore, Catalog, CustomerStore, FileStore};
use tracing::warn;

/// Everything a command needs: configuration, storage, and the menu.
pub struct Context {
    pub config: CartConfig,
    pub storage: FileStore,
    pub catalog: Catalog,
}

impl Context {
    /// Open the configured storage file and catalog.
    ///
    /// A catalog that cannot be read leaves every item unresolved rather than
    /// failing the command.
    pub fn load(config: CartConfig) -> Self {
        let catalog = match config.catalog_path.as_deref() {
            Some(path) => Catalog::from_path(path).unwrap_or_else(|e| {
                warn!(error = %e, "catalog unavailable, prices will show as zero");
                Catalog::empty()
            }),
            None => Catalog::empty(),
        };

        Self {
            storage: FileStore::new(config.storage_path.clone()),
            catalog,
            config,
        }
    }

    /// The persisted cart.
    pub const fn cart(&self) -> CartStore<&FileStore, &Catalog> {
        CartStore::new(&self.storage, &self.catalog)
    }

    /// The saved order-form fields.
    pub const fn customer(&self) -> CustomerStore<&FileStore> {
        CustomerStore::new(&self.storage)
    }
}
