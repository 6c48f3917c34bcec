//! Crate-level error type.
//!
//! Each concern has its own error enum; [`Error`] unifies them for hosts
//! that drive the whole cart (the CLI returns `Result<T>` from every command).

use std::path::PathBuf;

use thiserror::Error;

use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::order::OrderError;
use crate::storage::StorageError;

/// Any failure surfaced by the cart library.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Client-local storage could not be written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Order submission failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Checkout was aborted.
    #[error("{0}")]
    Checkout(#[from] CheckoutError),

    /// The catalog file could not be read.
    #[error("Failed to read catalog {path}: {source}")]
    CatalogIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog file is not a valid host catalog.
    #[error("Invalid catalog {path}: {source}")]
    CatalogFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid input from the host.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Result type alias for [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
