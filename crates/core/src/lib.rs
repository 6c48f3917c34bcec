//! Kopernik Core - Shared types library.
//!
//! This crate provides common types used across all Kopernik components:
//! - `cart` - Persisted cart, catalog lookup, and order submission
//! - `cli` - Command-line host for the cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, item types, and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
