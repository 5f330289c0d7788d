//! SQLite storage backend for the inventory.
//!
//! Products are split across a base table and one table per variant:
//!
//! - `producto(codigo, tipo, nombre, costo, precio, cantidad)`
//! - `productoelectronico(codigo, categoria)`
//! - `productoalimenticio(codigo, vencimiento)`
//!
//! The `tipo` column names the variant, so reads join straight to the right
//! table. A connection is opened for each operation and closed before the
//! operation returns, whether it succeeded or not. Multi-statement writes run
//! inside a transaction that is only committed once every statement succeeded;
//! dropping an uncommitted transaction rolls it back.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use inventory_core::{
    Product, ProductCode, ProductDetails, ProductKind, ProductRecord, ProductUpdate,
};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{ConnectOptions, Connection, Row};
use tracing::{debug, warn};

use super::trait_::{Listing, ProductStore, RecordFailure, Result, StorageError};

const SELECT_PRODUCT: &str = "SELECT p.codigo AS codigo, p.tipo AS tipo, p.nombre AS nombre,
        p.costo AS costo, p.precio AS precio, p.cantidad AS cantidad,
        e.categoria AS categoria, a.vencimiento AS vencimiento
    FROM producto p
    LEFT JOIN productoelectronico e ON e.codigo = p.codigo AND p.tipo = 'electronic'
    LEFT JOIN productoalimenticio a ON a.codigo = p.codigo AND p.tipo = 'food'";

/// SQLite storage implementation.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
    options: SqliteConnectOptions,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and ensure the schema.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .foreign_keys(true);

        let store = Self { path, options };
        store.init_schema().await?;

        Ok(store)
    }

    /// Location of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn connect(&self) -> Result<SqliteConnection> {
        Ok(self.options.connect().await?)
    }

    /// Initialize the database schema.
    async fn init_schema(&self) -> Result<()> {
        let mut conn = self.connect().await?;
        let result = create_tables(&mut conn).await;
        release(conn, result).await?;

        debug!(path = %self.path.display(), "schema ready");
        Ok(())
    }
}

#[async_trait]
impl ProductStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn create(&mut self, product: &Product) -> Result<()> {
        let mut conn = self.connect().await?;
        let result = insert_product(&mut conn, product).await;
        release(conn, result).await
    }

    async fn read(&self, code: &ProductCode) -> Result<Product> {
        let mut conn = self.connect().await?;
        let result = fetch_product(&mut conn, code).await;
        release(conn, result).await
    }

    async fn update(&mut self, code: &ProductCode, update: &ProductUpdate) -> Result<Product> {
        let mut conn = self.connect().await?;
        let result = update_product(&mut conn, code, update).await;
        release(conn, result).await
    }

    async fn delete(&mut self, code: &ProductCode) -> Result<()> {
        let mut conn = self.connect().await?;
        let result = delete_product(&mut conn, code).await;
        release(conn, result).await
    }

    async fn list_all(&self) -> Result<Listing> {
        let mut conn = self.connect().await?;
        let result = fetch_all_products(&mut conn).await;
        release(conn, result).await
    }
}

/// Close the connection, then hand back the operation's own result.
///
/// An operation error takes precedence over an error while closing.
async fn release<T>(conn: SqliteConnection, result: Result<T>) -> Result<T> {
    let closed = conn.close().await;
    let value = result?;
    closed?;
    Ok(value)
}

async fn create_tables(conn: &mut SqliteConnection) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS producto (
            codigo TEXT PRIMARY KEY,
            tipo TEXT NOT NULL CHECK (tipo IN ('electronic', 'food')),
            nombre TEXT NOT NULL CHECK (length(trim(nombre)) > 0),
            costo REAL NOT NULL CHECK (costo > 0),
            precio REAL NOT NULL CHECK (precio > 0),
            cantidad INTEGER NOT NULL CHECK (cantidad >= 0)
        )",
    )
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS productoelectronico (
            codigo TEXT PRIMARY KEY REFERENCES producto(codigo),
            categoria TEXT NOT NULL
        )",
    )
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS productoalimenticio (
            codigo TEXT PRIMARY KEY REFERENCES producto(codigo),
            vencimiento TEXT NOT NULL
        )",
    )
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn insert_product(conn: &mut SqliteConnection, product: &Product) -> Result<()> {
    let code = product.code();
    let mut tx = conn.begin().await?;

    let existing = sqlx::query("SELECT 1 FROM producto WHERE codigo = ?")
        .bind(code.as_str())
        .fetch_optional(&mut *tx)
        .await?;
    if existing.is_some() {
        return Err(StorageError::Duplicate(code.clone()));
    }

    sqlx::query(
        "INSERT INTO producto (codigo, tipo, nombre, costo, precio, cantidad)
        VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(code.as_str())
    .bind(product.kind().as_str())
    .bind(product.name())
    .bind(product.cost())
    .bind(product.price())
    .bind(i64::from(product.quantity()))
    .execute(&mut *tx)
    .await
    .map_err(|e| insert_error(e, code))?;

    match product.details() {
        ProductDetails::Electronic { category } => {
            sqlx::query("INSERT INTO productoelectronico (codigo, categoria) VALUES (?, ?)")
                .bind(code.as_str())
                .bind(category.as_str())
                .execute(&mut *tx)
                .await
                .map_err(|e| insert_error(e, code))?;
        }
        ProductDetails::Food { expiration } => {
            sqlx::query("INSERT INTO productoalimenticio (codigo, vencimiento) VALUES (?, ?)")
                .bind(code.as_str())
                .bind(expiration.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| insert_error(e, code))?;
        }
    }

    tx.commit().await?;
    debug!(code = %code, kind = %product.kind(), "product inserted");
    Ok(())
}

async fn fetch_product(conn: &mut SqliteConnection, code: &ProductCode) -> Result<Product> {
    let sql = format!("{SELECT_PRODUCT} WHERE p.codigo = ?");
    let row = sqlx::query(&sql)
        .bind(code.as_str())
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| StorageError::NotFound(code.clone()))?;

    decode_row(&row).map_err(|reason| StorageError::Corrupt {
        code: code.to_string(),
        reason,
    })
}

async fn fetch_all_products(conn: &mut SqliteConnection) -> Result<Listing> {
    let sql = format!("{SELECT_PRODUCT} ORDER BY p.codigo");
    let rows = sqlx::query(&sql).fetch_all(&mut *conn).await?;

    let mut listing = Listing::default();
    for row in &rows {
        match decode_row(row) {
            Ok(product) => listing.products.push(product),
            Err(reason) => {
                let code: String = row.try_get("codigo").unwrap_or_default();
                warn!(%code, %reason, "skipping invalid row");
                listing.failures.push(RecordFailure { code, reason });
            }
        }
    }

    Ok(listing)
}

async fn update_product(
    conn: &mut SqliteConnection,
    code: &ProductCode,
    update: &ProductUpdate,
) -> Result<Product> {
    let mut tx = conn.begin().await?;

    let done = sqlx::query("UPDATE producto SET costo = ?, precio = ?, cantidad = ? WHERE codigo = ?")
        .bind(update.cost())
        .bind(update.price())
        .bind(i64::from(update.quantity()))
        .bind(code.as_str())
        .execute(&mut *tx)
        .await?;
    if done.rows_affected() == 0 {
        return Err(StorageError::NotFound(code.clone()));
    }

    // Read back inside the transaction so a broken row aborts the update.
    let product = fetch_product(&mut *tx, code).await?;
    tx.commit().await?;

    debug!(code = %code, "product updated");
    Ok(product)
}

async fn delete_product(conn: &mut SqliteConnection, code: &ProductCode) -> Result<()> {
    let mut tx = conn.begin().await?;

    sqlx::query("DELETE FROM productoelectronico WHERE codigo = ?")
        .bind(code.as_str())
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM productoalimenticio WHERE codigo = ?")
        .bind(code.as_str())
        .execute(&mut *tx)
        .await?;
    let done = sqlx::query("DELETE FROM producto WHERE codigo = ?")
        .bind(code.as_str())
        .execute(&mut *tx)
        .await?;
    if done.rows_affected() == 0 {
        return Err(StorageError::NotFound(code.clone()));
    }

    tx.commit().await?;
    debug!(code = %code, "product deleted");
    Ok(())
}

fn insert_error(err: sqlx::Error, code: &ProductCode) -> StorageError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StorageError::Duplicate(code.clone()),
        _ => err.into(),
    }
}

fn decode_row(row: &SqliteRow) -> std::result::Result<Product, String> {
    let kind: String = row.try_get("tipo").map_err(|e| e.to_string())?;
    let record = ProductRecord {
        code: row.try_get("codigo").map_err(|e| e.to_string())?,
        name: row.try_get("nombre").map_err(|e| e.to_string())?,
        cost: row.try_get("costo").map_err(|e| e.to_string())?,
        price: row.try_get("precio").map_err(|e| e.to_string())?,
        quantity: row.try_get("cantidad").map_err(|e| e.to_string())?,
        kind: kind.parse::<ProductKind>().map_err(|e| e.to_string())?,
        category: row.try_get("categoria").map_err(|e| e.to_string())?,
        expiration: row.try_get("vencimiento").map_err(|e| e.to_string())?,
    };
    Product::try_from(record).map_err(|e| e.to_string())
}
