//! User-facing error taxonomy.

use inventory_core::{ProductCode, ValidationError};
use inventory_storage::StorageError;

/// Result type for inventory operations.
pub type Result<T> = std::result::Result<T, InventoryError>;

/// Why an inventory operation did not go through.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// A field value was rejected
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Create was called with a code that is already taken
    #[error("a product with code {0} already exists")]
    Duplicate(ProductCode),

    /// The code does not name any product
    #[error("no product with code {0}")]
    NotFound(ProductCode),

    /// The store could not be read or written; nothing was changed
    #[error("storage failure: {0}")]
    Persistence(#[source] StorageError),
}

impl From<StorageError> for InventoryError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Duplicate(code) => Self::Duplicate(code),
            StorageError::NotFound(code) => Self::NotFound(code),
            other => Self::Persistence(other),
        }
    }
}
