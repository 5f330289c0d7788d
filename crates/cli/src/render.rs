//! Text output for products and listings.

use std::io::{self, Write};

use chrono::NaiveDate;
use inventory_core::Product;
use inventory_storage::Listing;

/// One line per product: identity, variant detail, then stock figures.
pub fn write_product(out: &mut impl Write, product: &Product, today: NaiveDate) -> io::Result<()> {
    write!(
        out,
        "{} | cost {:.2} | price {:.2} | qty {}",
        product,
        product.cost(),
        product.price(),
        product.quantity()
    )?;
    if product.expiration().is_some_and(|exp| exp.is_past(today)) {
        write!(out, " | EXPIRED")?;
    }
    writeln!(out)
}

/// Every product, then any records that could not be read.
pub fn write_listing(out: &mut impl Write, listing: &Listing, today: NaiveDate) -> io::Result<()> {
    if listing.products.is_empty() {
        writeln!(out, "No products in inventory")?;
    } else {
        writeln!(out, "Products ({})", listing.products.len())?;
        for product in &listing.products {
            write!(out, "  ")?;
            write_product(out, product, today)?;
        }
    }

    if !listing.failures.is_empty() {
        writeln!(out, "Unreadable records ({})", listing.failures.len())?;
        for failure in &listing.failures {
            writeln!(out, "  {}: {}", failure.code, failure.reason)?;
        }
    }
    Ok(())
}
