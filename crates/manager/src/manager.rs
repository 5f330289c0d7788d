//! Inventory management service.

use inventory_core::{Product, ProductCode, ProductUpdate, RawProduct};
use inventory_storage::{open_store, Listing, ProductStore, StorageConfig};
use tracing::info;

use crate::error::Result;

/// Inventory service over a single storage backend.
///
/// Each method validates its raw input, performs exactly one gateway
/// operation, and returns the outcome. Duplicate and missing codes come back
/// as [`InventoryError::Duplicate`](crate::InventoryError::Duplicate) and
/// [`InventoryError::NotFound`](crate::InventoryError::NotFound).
pub struct Inventory {
    store: Box<dyn ProductStore>,
}

impl Inventory {
    /// Wrap an already opened store.
    pub fn new(store: Box<dyn ProductStore>) -> Self {
        Self { store }
    }

    /// Open the configured backend.
    pub async fn open(config: &StorageConfig) -> Result<Self> {
        Ok(Self::new(open_store(config).await?))
    }

    /// Name of the backend in use.
    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Create an electronic product.
    pub async fn add_electronic(&mut self, raw: RawProduct<'_>, category: &str) -> Result<Product> {
        let product = Product::electronic(raw, category)?;
        self.add(product).await
    }

    /// Create a food product.
    pub async fn add_food(&mut self, raw: RawProduct<'_>, expiration: &str) -> Result<Product> {
        let product = Product::food(raw, expiration)?;
        self.add(product).await
    }

    async fn add(&mut self, product: Product) -> Result<Product> {
        self.store.create(&product).await?;
        info!(code = %product.code(), kind = %product.kind(), "product created");
        Ok(product)
    }

    /// Look up a product by code.
    pub async fn find(&self, code: &str) -> Result<Product> {
        let code = ProductCode::parse(code)?;
        Ok(self.store.read(&code).await?)
    }

    /// Replace cost, price and quantity of an existing product.
    pub async fn update(
        &mut self,
        code: &str,
        cost: &str,
        price: &str,
        quantity: &str,
    ) -> Result<Product> {
        let code = ProductCode::parse(code)?;
        let update = ProductUpdate::parse(cost, price, quantity)?;
        let product = self.store.update(&code, &update).await?;
        info!(%code, "product updated");
        Ok(product)
    }

    /// Delete a product, returning the code that was removed.
    pub async fn remove(&mut self, code: &str) -> Result<ProductCode> {
        let code = ProductCode::parse(code)?;
        self.store.delete(&code).await?;
        info!(%code, "product deleted");
        Ok(code)
    }

    /// List every product, along with records that could not be read.
    pub async fn list(&self) -> Result<Listing> {
        let listing = self.store.list_all().await?;
        info!(
            products = listing.products.len(),
            failures = listing.failures.len(),
            "products listed"
        );
        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InventoryError;
    use inventory_core::ProductKind;

    fn raw<'a>(code: &'a str, name: &'a str) -> RawProduct<'a> {
        RawProduct { code, name, cost: "500.0", price: "800.0", quantity: "3" }
    }

    async fn json_inventory(dir: &tempfile::TempDir) -> Inventory {
        let config = StorageConfig::Json { path: dir.path().join("inventory.json") };
        Inventory::open(&config).await.unwrap()
    }

    async fn sqlite_inventory(dir: &tempfile::TempDir) -> Inventory {
        let config = StorageConfig::Sqlite { path: dir.path().join("inventory.db") };
        Inventory::open(&config).await.unwrap()
    }

    async fn exercise_full_lifecycle(mut inventory: Inventory) {
        let created = inventory.add_electronic(raw("A1", "laptop"), "computing").await.unwrap();
        assert_eq!(inventory.find("A1").await.unwrap(), created);

        let dup = inventory.add_food(raw("A1", "apple"), "2026-01-01").await.unwrap_err();
        assert!(matches!(dup, InventoryError::Duplicate(_)));
        assert_eq!(inventory.find("A1").await.unwrap(), created);

        let updated = inventory.update("A1", "10.0", "20.0", "5").await.unwrap();
        assert_eq!((updated.cost(), updated.price(), updated.quantity()), (10.0, 20.0, 5));
        assert_eq!(updated.name(), created.name());
        assert_eq!(updated.category(), created.category());

        let removed = inventory.remove("A1").await.unwrap();
        assert_eq!(removed.as_str(), "A1");
        assert!(matches!(inventory.find("A1").await, Err(InventoryError::NotFound(_))));
        assert!(matches!(inventory.remove("A1").await, Err(InventoryError::NotFound(_))));
        assert!(inventory.list().await.unwrap().products.is_empty());
    }

    #[tokio::test]
    async fn test_lifecycle_json() {
        let dir = tempfile::tempdir().unwrap();
        exercise_full_lifecycle(json_inventory(&dir).await).await;
    }

    #[tokio::test]
    async fn test_lifecycle_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        exercise_full_lifecycle(sqlite_inventory(&dir).await).await;
    }

    #[tokio::test]
    async fn test_single_electronic_listing() {
        let dir = tempfile::tempdir().unwrap();
        let mut inventory = json_inventory(&dir).await;
        inventory.add_electronic(raw("A1", "laptop"), "computing").await.unwrap();

        let listing = inventory.list().await.unwrap();
        assert_eq!(listing.products.len(), 1);
        assert_eq!(listing.products[0].kind(), ProductKind::Electronic);
        assert_eq!(listing.products[0].category(), Some("computing"));
    }

    #[tokio::test]
    async fn test_validation_failures_do_not_touch_storage() {
        let dir = tempfile::tempdir().unwrap();
        let mut inventory = json_inventory(&dir).await;

        let bad = RawProduct { code: "B1", name: "tv", cost: "-5", price: "10", quantity: "1" };
        let err = inventory.add_electronic(bad, "video").await.unwrap_err();
        assert!(matches!(err, InventoryError::Validation(ref e) if e.field == "cost"));
        assert!(!dir.path().join("inventory.json").exists());

        inventory.add_food(raw("F1", "rice"), "2027-05-01").await.unwrap();
        let err = inventory.update("F1", "1", "2", "-3").await.unwrap_err();
        assert!(matches!(err, InventoryError::Validation(ref e) if e.field == "quantity"));
        assert_eq!(inventory.find("F1").await.unwrap().quantity(), 3);

        assert!(matches!(inventory.find("  ").await, Err(InventoryError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut inventory = sqlite_inventory(&dir).await;

        let err = inventory.update("nope", "1", "2", "3").await.unwrap_err();
        assert!(matches!(err, InventoryError::NotFound(c) if c.as_str() == "nope"));
    }

    #[tokio::test]
    async fn test_unreadable_document_is_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.json");
        std::fs::write(&path, "not json").unwrap();
        let mut inventory = json_inventory(&dir).await;

        let err = inventory.add_food(raw("F1", "rice"), "soon").await.unwrap_err();
        assert!(matches!(err, InventoryError::Persistence(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json");
    }
}
