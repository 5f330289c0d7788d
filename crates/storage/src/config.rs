//! Backend selection.

use std::path::PathBuf;

use tracing::info;

use super::{JsonStore, ProductStore, Result};

/// Which backend to use and where it keeps its data.
///
/// Built once at process start and handed to [`open_store`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// Single JSON document
    Json {
        /// Path of the document
        path: PathBuf,
    },
    /// SQLite database
    Sqlite {
        /// Path of the database file
        path: PathBuf,
    },
}

/// Open the configured backend.
pub async fn open_store(config: &StorageConfig) -> Result<Box<dyn ProductStore>> {
    let store: Box<dyn ProductStore> = match config {
        StorageConfig::Json { path } => Box::new(JsonStore::new(path)),
        #[cfg(feature = "sqlite")]
        StorageConfig::Sqlite { path } => Box::new(super::SqliteStore::open(path).await?),
        #[cfg(not(feature = "sqlite"))]
        StorageConfig::Sqlite { .. } => {
            return Err(super::StorageError::Other(
                "built without the `sqlite` feature".to_string(),
            ))
        }
    };

    info!(backend = store.backend_name(), ?config, "storage opened");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_json() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig::Json { path: dir.path().join("inv.json") };

        let store = open_store(&config).await.unwrap();
        assert_eq!(store.backend_name(), "json");
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn test_open_sqlite_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inv.db");

        let store = open_store(&StorageConfig::Sqlite { path: path.clone() }).await.unwrap();
        assert_eq!(store.backend_name(), "sqlite");
        assert!(path.exists());
    }
}
