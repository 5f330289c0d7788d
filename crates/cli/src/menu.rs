//! Interactive numbered menu.

use std::io::{self, BufRead, Write};

use chrono::NaiveDate;
use inventory_core::validation::{
    parse_nonempty_text, parse_nonnegative_integer, parse_positive_decimal,
};
use inventory_core::{ProductCode, ProductKind, RawProduct, ValidationError};
use inventory_manager::Inventory;

use crate::render::{write_listing, write_product};

const MENU: &str = "\
Inventory menu
1. Create electronic product
2. Create food product
3. Find product
4. Update product
5. Delete product
6. List all products
7. Exit";

/// Menu loop over any line source and sink.
pub struct Menu<R, W> {
    input: R,
    output: W,
    today: NaiveDate,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    /// Create a menu reading from `input` and printing to `output`.
    pub fn new(input: R, output: W, today: NaiveDate) -> Self {
        Self { input, output, today }
    }

    /// Run until the user picks exit or input ends.
    pub async fn run(&mut self, inventory: &mut Inventory) -> io::Result<()> {
        loop {
            writeln!(self.output, "\n{MENU}")?;
            let Some(choice) = self.read_line("Choose an option: ")? else {
                break;
            };

            let done = match choice.as_str() {
                "1" => self.create(inventory, ProductKind::Electronic).await?,
                "2" => self.create(inventory, ProductKind::Food).await?,
                "3" => self.find(inventory).await?,
                "4" => self.update(inventory).await?,
                "5" => self.delete(inventory).await?,
                "6" => self.list(inventory).await?,
                "7" => break,
                other => {
                    writeln!(self.output, "Invalid option: {other}")?;
                    Step::Continue
                }
            };
            if done == Step::Quit {
                break;
            }
        }

        writeln!(self.output, "Goodbye")?;
        Ok(())
    }

    async fn create(&mut self, inventory: &mut Inventory, kind: ProductKind) -> io::Result<Step> {
        let Some(code) = self.ask("Code: ", |s| ProductCode::parse(s).map(drop))? else {
            return Ok(Step::Quit);
        };
        let Some(name) = self.ask("Name: ", |s| parse_nonempty_text("name", s).map(drop))? else {
            return Ok(Step::Quit);
        };
        let Some(cost) = self.ask("Cost: ", |s| parse_positive_decimal("cost", s).map(drop))? else {
            return Ok(Step::Quit);
        };
        let Some(price) = self.ask("Price: ", |s| parse_positive_decimal("price", s).map(drop))? else {
            return Ok(Step::Quit);
        };
        let Some(quantity) =
            self.ask("Quantity: ", |s| parse_nonnegative_integer("quantity", s).map(drop))?
        else {
            return Ok(Step::Quit);
        };

        let raw = RawProduct {
            code: &code,
            name: &name,
            cost: &cost,
            price: &price,
            quantity: &quantity,
        };
        let result = match kind {
            ProductKind::Electronic => {
                let Some(category) = self.read_line("Category: ")? else {
                    return Ok(Step::Quit);
                };
                inventory.add_electronic(raw, &category).await
            }
            ProductKind::Food => {
                let Some(expiration) = self.read_line("Expiration: ")? else {
                    return Ok(Step::Quit);
                };
                inventory.add_food(raw, &expiration).await
            }
        };

        match result {
            Ok(product) => writeln!(self.output, "Created {product}")?,
            Err(e) => writeln!(self.output, "Error: {e}")?,
        }
        Ok(Step::Continue)
    }

    async fn find(&mut self, inventory: &Inventory) -> io::Result<Step> {
        let Some(code) = self.ask("Code: ", |s| ProductCode::parse(s).map(drop))? else {
            return Ok(Step::Quit);
        };
        match inventory.find(&code).await {
            Ok(product) => write_product(&mut self.output, &product, self.today)?,
            Err(e) => writeln!(self.output, "Error: {e}")?,
        }
        Ok(Step::Continue)
    }

    async fn update(&mut self, inventory: &mut Inventory) -> io::Result<Step> {
        let Some(code) = self.ask("Code: ", |s| ProductCode::parse(s).map(drop))? else {
            return Ok(Step::Quit);
        };
        let Some(cost) = self.ask("New cost: ", |s| parse_positive_decimal("cost", s).map(drop))?
        else {
            return Ok(Step::Quit);
        };
        let Some(price) =
            self.ask("New price: ", |s| parse_positive_decimal("price", s).map(drop))?
        else {
            return Ok(Step::Quit);
        };
        let Some(quantity) =
            self.ask("New quantity: ", |s| parse_nonnegative_integer("quantity", s).map(drop))?
        else {
            return Ok(Step::Quit);
        };

        match inventory.update(&code, &cost, &price, &quantity).await {
            Ok(product) => {
                write!(self.output, "Updated ")?;
                write_product(&mut self.output, &product, self.today)?;
            }
            Err(e) => writeln!(self.output, "Error: {e}")?,
        }
        Ok(Step::Continue)
    }

    async fn delete(&mut self, inventory: &mut Inventory) -> io::Result<Step> {
        let Some(code) = self.ask("Code: ", |s| ProductCode::parse(s).map(drop))? else {
            return Ok(Step::Quit);
        };
        match inventory.remove(&code).await {
            Ok(code) => writeln!(self.output, "Deleted {code}")?,
            Err(e) => writeln!(self.output, "Error: {e}")?,
        }
        Ok(Step::Continue)
    }

    async fn list(&mut self, inventory: &Inventory) -> io::Result<Step> {
        match inventory.list().await {
            Ok(listing) => write_listing(&mut self.output, &listing, self.today)?,
            Err(e) => writeln!(self.output, "Error: {e}")?,
        }
        Ok(Step::Continue)
    }

    /// Prompt until `check` accepts the answer. `None` means input ended.
    fn ask(
        &mut self,
        prompt: &str,
        check: impl Fn(&str) -> Result<(), ValidationError>,
    ) -> io::Result<Option<String>> {
        loop {
            let Some(answer) = self.read_line(prompt)? else {
                return Ok(None);
            };
            match check(&answer) {
                Ok(()) => return Ok(Some(answer)),
                Err(e) => writeln!(self.output, "{e}, try again")?,
            }
        }
    }

    /// Prompt for one trimmed line. `None` means input ended.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_storage::StorageConfig;
    use std::io::Cursor;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    async fn run_script(inventory: &mut Inventory, script: &str) -> String {
        let mut output = Vec::new();
        Menu::new(Cursor::new(script.as_bytes()), &mut output, today())
            .run(inventory)
            .await
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    async fn inventory_in(dir: &tempfile::TempDir) -> Inventory {
        let config = StorageConfig::Json { path: dir.path().join("inventory.json") };
        Inventory::open(&config).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_reasks_invalid_fields() {
        let dir = tempfile::tempdir().unwrap();
        let mut inventory = inventory_in(&dir).await;

        let out = run_script(
            &mut inventory,
            "1\nA1\n\nlaptop\nabc\n0\n500\n800\n-3\n3\ncomputing\n7\n",
        )
        .await;

        assert!(out.contains("invalid name: must not be empty, try again"));
        assert!(out.contains("invalid cost: `abc` is not a number, try again"));
        assert!(out.contains("invalid cost: must be greater than zero, try again"));
        assert!(out.contains("invalid quantity: must not be negative, try again"));
        assert!(out.contains("Created A1 Laptop - category: computing"));
        assert!(out.ends_with("Goodbye\n"));

        assert_eq!(inventory.find("A1").await.unwrap().quantity(), 3);
    }

    #[tokio::test]
    async fn test_every_menu_entry_is_wired() {
        let dir = tempfile::tempdir().unwrap();
        let mut inventory = inventory_in(&dir).await;

        let out = run_script(
            &mut inventory,
            "2\nF1\nmilk\n1\n2\n10\n2025-05-01\n\
             3\nF1\n\
             4\nF1\n1.5\n2.5\n7\n\
             6\n\
             5\nF1\n\
             3\nF1\n\
             7\n",
        )
        .await;

        assert!(out.contains("Created F1 Milk - expiration: 2025-05-01"));
        assert!(out.contains("F1 Milk - expiration: 2025-05-01 | cost 1.00 | price 2.00 | qty 10 | EXPIRED"));
        assert!(out.contains("Updated F1 Milk - expiration: 2025-05-01 | cost 1.50 | price 2.50 | qty 7"));
        assert!(out.contains("Products (1)"));
        assert!(out.contains("Deleted F1"));
        assert!(out.contains("Error: no product with code F1"));
    }

    #[tokio::test]
    async fn test_duplicate_and_missing_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut inventory = inventory_in(&dir).await;

        let out = run_script(
            &mut inventory,
            "1\nA1\nlaptop\n500\n800\n3\ncomputing\n\
             2\nA1\nbread\n1\n2\n3\ntomorrow\n\
             4\nZZ\n1\n2\n3\n\
             5\nZZ\n\
             7\n",
        )
        .await;

        assert!(out.contains("Error: a product with code A1 already exists"));
        assert_eq!(out.matches("Error: no product with code ZZ").count(), 2);
        assert_eq!(inventory.list().await.unwrap().products.len(), 1);
    }

    #[tokio::test]
    async fn test_update_of_missing_code_asks_values_then_reports() {
        let dir = tempfile::tempdir().unwrap();
        let mut inventory = inventory_in(&dir).await;

        let out = run_script(&mut inventory, "4\nZZ\n1\n2\n3\n7\n").await;

        let reported = out.find("Error: no product with code ZZ").unwrap();
        assert!(out.find("New quantity: ").unwrap() < reported);
        assert!(!out.contains("Current: "));
        assert!(out.ends_with("Goodbye\n"));
        assert!(!dir.path().join("inventory.json").exists());
    }

    #[tokio::test]
    async fn test_invalid_option_and_end_of_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut inventory = inventory_in(&dir).await;

        let out = run_script(&mut inventory, "9\n6\n").await;
        assert!(out.contains("Invalid option: 9"));
        assert!(out.contains("No products in inventory"));
        assert!(out.ends_with("Goodbye\n"));
    }

    #[tokio::test]
    async fn test_input_ending_mid_prompt_stops_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let mut inventory = inventory_in(&dir).await;

        let out = run_script(&mut inventory, "1\nA1\nlaptop\n").await;
        assert!(out.ends_with("Goodbye\n"));
        assert!(inventory.list().await.unwrap().products.is_empty());
    }
}
