//! Storage trait abstraction.

use async_trait::async_trait;
use inventory_core::{Product, ProductCode, ProductUpdate};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A product with this code already exists
    #[error("product {0} already exists")]
    Duplicate(ProductCode),

    /// No product with this code
    #[error("product {0} not found")]
    NotFound(ProductCode),

    /// A stored record could not be turned back into a product
    #[error("stored record {code} is invalid: {reason}")]
    Corrupt {
        /// Key of the broken record
        code: String,
        /// Why reconstruction failed
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Database error
    #[error("database error: {0}")]
    Database(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Other error
    #[error("{0}")]
    Other(String),
}

#[cfg(feature = "sqlite")]
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(Box::new(err))
    }
}

/// A stored record that was skipped while listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFailure {
    /// Key of the record as stored
    pub code: String,
    /// Why it could not be reconstructed
    pub reason: String,
}

/// Result of listing every product.
///
/// Listing never aborts because of a single bad record: such records land in
/// `failures` and the rest are returned in `products`.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    /// Products that were reconstructed
    pub products: Vec<Product>,
    /// Records that were skipped
    pub failures: Vec<RecordFailure>,
}

/// Persistence gateway for products.
///
/// This trait allows different storage backends to be plugged in. Every
/// method runs to completion before returning; there is no locking against
/// other processes writing the same store.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Short backend name used in logs.
    fn backend_name(&self) -> &'static str;

    /// Insert a new product. Fails with `Duplicate` if the code is taken.
    async fn create(&mut self, product: &Product) -> Result<()>;

    /// Load a product by code.
    async fn read(&self, code: &ProductCode) -> Result<Product>;

    /// Overwrite cost, price and quantity and return the updated product.
    async fn update(&mut self, code: &ProductCode, update: &ProductUpdate) -> Result<Product>;

    /// Remove a product and its variant data.
    async fn delete(&mut self, code: &ProductCode) -> Result<()>;

    /// Load every product.
    async fn list_all(&self) -> Result<Listing>;
}
