//! CRUD orchestration for the inventory.
//!
//! Turns raw user input into validated products and hands them to the
//! configured storage backend.

#![warn(missing_docs)]

mod error;
mod manager;

pub use error::{InventoryError, Result};
pub use manager::Inventory;
