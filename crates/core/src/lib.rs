//! Inventory core data models.
//!
//! This crate defines the product records managed by the inventory and the
//! validation rules every record passes through before it is stored.

#![warn(missing_docs)]

// Identity
mod code;

// Validation
pub mod validation;

// Products
mod expiration;
mod product;

// Re-exports
pub use code::ProductCode;
pub use expiration::Expiration;
pub use product::{Product, ProductDetails, ProductKind, ProductRecord, ProductUpdate, RawProduct};
pub use validation::ValidationError;
