//! Storage abstraction and implementations for the inventory.
//!
//! This crate provides a trait-based product gateway with a JSON document
//! implementation and, behind the `sqlite` feature, a relational one.

#![warn(missing_docs)]

pub mod config;
pub mod trait_;
pub mod json_storage;
#[cfg(feature = "sqlite")]
pub mod sqlite_storage;

pub use config::{open_store, StorageConfig};
pub use trait_::{Listing, ProductStore, RecordFailure, Result, StorageError};
pub use json_storage::JsonStore;
#[cfg(feature = "sqlite")]
pub use sqlite_storage::SqliteStore;
