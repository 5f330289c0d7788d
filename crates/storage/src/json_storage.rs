//! JSON document storage implementation.
//!
//! The whole collection lives in a single JSON object keyed by product code.
//! Every mutation reads the full document, changes it in memory, and writes
//! the full document back through a temporary file that is renamed over the
//! original, so readers never observe a half-written file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use inventory_core::{Product, ProductCode, ProductUpdate};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::fs;
use tracing::{debug, warn};

use super::{Listing, ProductStore, RecordFailure, Result, StorageError};

/// File-based JSON storage backend.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// Create storage backed by `path`. The file is created on first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Location of the document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| StorageError::Other(format!("{} is not a file path", self.path.display())))?;
        let mut temp = file_name.to_os_string();
        temp.push(".tmp");
        Ok(self.path.with_file_name(temp))
    }

    /// Read the raw document. A missing or blank file is an empty collection.
    ///
    /// Records are kept as raw values so that rewriting the document never
    /// touches records this call did not change, including broken ones.
    async fn load(&self) -> Result<Map<String, Value>> {
        let text = match fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Replace the document with `records`.
    async fn save(&self, records: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let json = to_pretty_json(records)?;
        let temp = self.temp_path()?;
        let written = match fs::write(&temp, &json).await {
            Ok(()) => fs::rename(&temp, &self.path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            // A partial temp file must not outlive a failed save.
            let _ = fs::remove_file(&temp).await;
            return Err(e.into());
        }

        debug!(path = %self.path.display(), records = records.len(), "document written");
        Ok(())
    }
}

#[async_trait]
impl ProductStore for JsonStore {
    fn backend_name(&self) -> &'static str {
        "json"
    }

    async fn create(&mut self, product: &Product) -> Result<()> {
        let mut records = self.load().await?;
        if records.contains_key(product.code().as_str()) {
            return Err(StorageError::Duplicate(product.code().clone()));
        }

        records.insert(product.code().to_string(), Value::Object(product.to_mapping()));
        self.save(&records).await
    }

    async fn read(&self, code: &ProductCode) -> Result<Product> {
        let records = self.load().await?;
        let value = records
            .get(code.as_str())
            .ok_or_else(|| StorageError::NotFound(code.clone()))?;

        decode(code.as_str(), value).map_err(|reason| StorageError::Corrupt {
            code: code.to_string(),
            reason,
        })
    }

    async fn update(&mut self, code: &ProductCode, update: &ProductUpdate) -> Result<Product> {
        let mut records = self.load().await?;
        let value = records
            .get(code.as_str())
            .ok_or_else(|| StorageError::NotFound(code.clone()))?;

        let mut product = decode(code.as_str(), value).map_err(|reason| StorageError::Corrupt {
            code: code.to_string(),
            reason,
        })?;
        product.apply(update);

        records.insert(code.to_string(), Value::Object(product.to_mapping()));
        self.save(&records).await?;
        Ok(product)
    }

    async fn delete(&mut self, code: &ProductCode) -> Result<()> {
        let mut records = self.load().await?;
        if records.remove(code.as_str()).is_none() {
            return Err(StorageError::NotFound(code.clone()));
        }
        self.save(&records).await
    }

    async fn list_all(&self) -> Result<Listing> {
        let records = self.load().await?;
        let mut listing = Listing::default();

        for (key, value) in &records {
            match decode(key, value) {
                Ok(product) => listing.products.push(product),
                Err(reason) => {
                    warn!(code = %key, %reason, "skipping invalid record");
                    listing.failures.push(RecordFailure {
                        code: key.clone(),
                        reason,
                    });
                }
            }
        }

        Ok(listing)
    }
}

/// Rebuild one stored record, checking that it sits under its own code.
fn decode(key: &str, value: &Value) -> std::result::Result<Product, String> {
    let map = value
        .as_object()
        .ok_or_else(|| "record is not a JSON object".to_string())?;
    let product = Product::from_mapping(map).map_err(|e| e.to_string())?;
    if product.code().as_str() != key {
        return Err(format!("stored under `{key}` but has code `{}`", product.code()));
    }
    Ok(product)
}

/// Pretty-print with a 4-space indent and a trailing newline.
fn to_pretty_json(records: &Map<String, Value>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}
