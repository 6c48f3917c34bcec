//! Core types for Kopernik.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod item_type;
pub mod price;

pub use id::*;
pub use item_type::{ItemType, ItemTypeError};
pub use price::Price;
