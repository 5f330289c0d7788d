//! Inventory CLI - manage electronic and food products.

mod menu;
mod render;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use inventory_core::RawProduct;
use inventory_manager::Inventory;
use inventory_storage::StorageConfig;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::menu::Menu;
use crate::render::{write_listing, write_product};

#[derive(Parser)]
#[command(name = "inventory")]
#[command(about = "Product inventory backed by a JSON file or SQLite", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Storage backend
    #[arg(long, value_enum, env = "INVENTORY_BACKEND", default_value_t = Backend::Json, global = true)]
    backend: Backend,

    /// JSON document used by the json backend
    #[arg(long, env = "INVENTORY_FILE", default_value = "inventario.json", global = true)]
    file: PathBuf,

    /// Database file used by the sqlite backend
    #[arg(long, env = "INVENTORY_DATABASE", default_value = "inventario.db", global = true)]
    database: PathBuf,

    /// Log operations to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

impl Cli {
    fn storage_config(&self) -> StorageConfig {
        match self.backend {
            Backend::Json => StorageConfig::Json { path: self.file.clone() },
            Backend::Sqlite => StorageConfig::Sqlite { path: self.database.clone() },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    Json,
    Sqlite,
}

/// Fields shared by both create commands.
#[derive(clap::Args)]
struct ProductArgs {
    /// Unique product code
    code: String,
    /// Product name
    #[arg(long)]
    name: String,
    /// Unit cost
    #[arg(long, allow_hyphen_values = true)]
    cost: String,
    /// Unit sale price
    #[arg(long, allow_hyphen_values = true)]
    price: String,
    /// Units in stock
    #[arg(long, allow_hyphen_values = true)]
    quantity: String,
}

impl ProductArgs {
    fn raw(&self) -> RawProduct<'_> {
        RawProduct {
            code: &self.code,
            name: &self.name,
            cost: &self.cost,
            price: &self.price,
            quantity: &self.quantity,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu (the default)
    Menu,
    /// Add an electronic product
    AddElectronic {
        #[command(flatten)]
        product: ProductArgs,
        /// Category, e.g. "computing"
        #[arg(long)]
        category: String,
    },
    /// Add a food product
    AddFood {
        #[command(flatten)]
        product: ProductArgs,
        /// Expiration date (YYYY-MM-DD, DD/MM/YYYY) or free text
        #[arg(long)]
        expiration: String,
    },
    /// Show one product
    Show {
        /// Product code
        code: String,
    },
    /// Set cost, price and quantity of a product
    Update {
        /// Product code
        code: String,
        /// New unit cost
        #[arg(long, allow_hyphen_values = true)]
        cost: String,
        /// New unit price
        #[arg(long, allow_hyphen_values = true)]
        price: String,
        /// New stock quantity
        #[arg(long, allow_hyphen_values = true)]
        quantity: String,
    },
    /// Delete a product
    Remove {
        /// Product code
        code: String,
    },
    /// List all products
    List,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut inventory = Inventory::open(&cli.storage_config()).await?;
    debug!(backend = inventory.backend_name(), "inventory ready");
    let today = chrono::Local::now().date_naive();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            let stdin = std::io::stdin();
            Menu::new(stdin.lock(), &mut out, today).run(&mut inventory).await?;
        }
        Commands::AddElectronic { product, category } => {
            let created = inventory.add_electronic(product.raw(), &category).await?;
            writeln!(out, "Created {created}")?;
        }
        Commands::AddFood { product, expiration } => {
            let created = inventory.add_food(product.raw(), &expiration).await?;
            writeln!(out, "Created {created}")?;
        }
        Commands::Show { code } => {
            let product = inventory.find(&code).await?;
            write_product(&mut out, &product, today)?;
        }
        Commands::Update { code, cost, price, quantity } => {
            let product = inventory.update(&code, &cost, &price, &quantity).await?;
            write!(out, "Updated ")?;
            write_product(&mut out, &product, today)?;
        }
        Commands::Remove { code } => {
            let code = inventory.remove(&code).await?;
            writeln!(out, "Deleted {code}")?;
        }
        Commands::List => {
            let listing = inventory.list().await?;
            write_listing(&mut out, &listing, today)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_json_backend() {
        let cli = Cli::parse_from(["inventory"]);
        assert!(cli.command.is_none());
        assert_eq!(
            cli.storage_config(),
            StorageConfig::Json { path: PathBuf::from("inventario.json") }
        );
    }

    #[test]
    fn test_sqlite_backend_uses_database_path() {
        let cli = Cli::parse_from(["inventory", "--backend", "sqlite", "--database", "/tmp/x.db", "list"]);
        assert!(matches!(cli.command, Some(Commands::List)));
        assert_eq!(cli.storage_config(), StorageConfig::Sqlite { path: PathBuf::from("/tmp/x.db") });
    }

    #[test]
    fn test_negative_values_reach_validation() {
        let cli = Cli::parse_from([
            "inventory", "update", "A1", "--cost", "-5", "--price", "2", "--quantity", "-1",
        ]);
        match cli.command {
            Some(Commands::Update { cost, quantity, .. }) => {
                assert_eq!(cost, "-5");
                assert_eq!(quantity, "-1");
            }
            _ => panic!("expected update command"),
        }
    }

    #[test]
    fn test_add_electronic_arguments() {
        let cli = Cli::parse_from([
            "inventory", "add-electronic", "A1", "--name", "laptop", "--cost", "500",
            "--price", "800", "--quantity", "3", "--category", "computing",
        ]);
        match cli.command {
            Some(Commands::AddElectronic { product, category }) => {
                assert_eq!(product.raw().code, "A1");
                assert_eq!(category, "computing");
            }
            _ => panic!("expected add-electronic command"),
        }
    }
}
