//! Product model - the record the inventory stores.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::code::ProductCode;
use crate::expiration::Expiration;
use crate::validation::{
    ensure_nonnegative, ensure_positive, parse_nonempty_text, parse_nonnegative_integer,
    parse_positive_decimal, ValidationError,
};

/// Discriminant naming which variant a product is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    /// Electronic product, carries a category
    Electronic,
    /// Food product, carries an expiration
    Food,
}

impl ProductKind {
    /// Stable lowercase name used in documents and database rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Electronic => "electronic",
            Self::Food => "food",
        }
    }
}

impl std::fmt::Display for ProductKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProductKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "electronic" => Ok(Self::Electronic),
            "food" => Ok(Self::Food),
            other => Err(ValidationError::new("kind", format!("unknown product kind `{other}`"))),
        }
    }
}

/// Variant-specific data.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductDetails {
    /// Electronic product
    Electronic {
        /// Free-text category, e.g. "computing"
        category: String,
    },
    /// Food product
    Food {
        /// Expiration date or free-text date
        expiration: Expiration,
    },
}

impl ProductDetails {
    /// Details for an electronic product.
    pub fn electronic(category: &str) -> Self {
        Self::Electronic {
            category: category.trim().to_string(),
        }
    }

    /// Details for a food product.
    pub fn food(expiration: &str) -> Self {
        Self::Food {
            expiration: Expiration::parse(expiration),
        }
    }

    /// The discriminant of these details.
    pub fn kind(&self) -> ProductKind {
        match self {
            Self::Electronic { .. } => ProductKind::Electronic,
            Self::Food { .. } => ProductKind::Food,
        }
    }
}

/// Unvalidated text for the shared product fields, as typed by a user.
#[derive(Debug, Clone, Copy)]
pub struct RawProduct<'a> {
    /// Product code
    pub code: &'a str,
    /// Product name
    pub name: &'a str,
    /// Unit cost
    pub cost: &'a str,
    /// Unit sale price
    pub price: &'a str,
    /// Units in stock
    pub quantity: &'a str,
}

/// A validated inventory item.
///
/// Every constructor validates eagerly, so a `Product` value always
/// satisfies `cost > 0`, `price > 0` and a non-empty name. Code, name and
/// variant details are fixed once created; only the stock figures change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProductRecord", into = "ProductRecord")]
pub struct Product {
    code: ProductCode,
    name: String,
    cost: f64,
    price: f64,
    quantity: u32,
    details: ProductDetails,
}

impl Product {
    /// Build an electronic product from raw input.
    pub fn electronic(raw: RawProduct<'_>, category: &str) -> Result<Self, ValidationError> {
        Self::parse(raw, ProductDetails::electronic(category))
    }

    /// Build a food product from raw input.
    pub fn food(raw: RawProduct<'_>, expiration: &str) -> Result<Self, ValidationError> {
        Self::parse(raw, ProductDetails::food(expiration))
    }

    fn parse(raw: RawProduct<'_>, details: ProductDetails) -> Result<Self, ValidationError> {
        let code = ProductCode::parse(raw.code)?;
        let cost = parse_positive_decimal("cost", raw.cost)?;
        let price = parse_positive_decimal("price", raw.price)?;
        let quantity = parse_nonnegative_integer("quantity", raw.quantity)?;
        Self::from_parts(code, raw.name, cost, price, quantity, details)
    }

    /// Build a product from already typed values.
    pub fn from_parts(
        code: ProductCode,
        name: &str,
        cost: f64,
        price: f64,
        quantity: u32,
        details: ProductDetails,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            code,
            name: capitalize(&parse_nonempty_text("name", name)?),
            cost: ensure_positive("cost", cost)?,
            price: ensure_positive("price", price)?,
            quantity,
            details,
        })
    }

    /// Product code
    pub fn code(&self) -> &ProductCode {
        &self.code
    }

    /// Display name (first letter upper-cased, rest lower-cased)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit cost
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Unit sale price
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Units in stock
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Variant details
    pub fn details(&self) -> &ProductDetails {
        &self.details
    }

    /// Which variant this product is.
    pub fn kind(&self) -> ProductKind {
        self.details.kind()
    }

    /// Category, for electronic products.
    pub fn category(&self) -> Option<&str> {
        match &self.details {
            ProductDetails::Electronic { category } => Some(category),
            ProductDetails::Food { .. } => None,
        }
    }

    /// Expiration, for food products.
    pub fn expiration(&self) -> Option<&Expiration> {
        match &self.details {
            ProductDetails::Food { expiration } => Some(expiration),
            ProductDetails::Electronic { .. } => None,
        }
    }

    /// Replace the unit cost. The current value is kept on failure.
    pub fn set_cost(&mut self, cost: f64) -> Result<(), ValidationError> {
        self.cost = ensure_positive("cost", cost)?;
        Ok(())
    }

    /// Replace the unit price. The current value is kept on failure.
    pub fn set_price(&mut self, price: f64) -> Result<(), ValidationError> {
        self.price = ensure_positive("price", price)?;
        Ok(())
    }

    /// Replace the stock quantity. The current value is kept on failure.
    pub fn set_quantity(&mut self, quantity: i64) -> Result<(), ValidationError> {
        self.quantity = ensure_nonnegative("quantity", quantity)?;
        Ok(())
    }

    /// Apply a validated stock update.
    pub fn apply(&mut self, update: &ProductUpdate) {
        self.cost = update.cost;
        self.price = update.price;
        self.quantity = update.quantity;
    }

    /// Flatten into a field name to value mapping.
    pub fn to_mapping(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("code".into(), Value::from(self.code.as_str()));
        map.insert("name".into(), Value::from(self.name.as_str()));
        map.insert("cost".into(), Value::from(self.cost));
        map.insert("price".into(), Value::from(self.price));
        map.insert("quantity".into(), Value::from(self.quantity));
        map.insert("kind".into(), Value::from(self.kind().as_str()));
        match &self.details {
            ProductDetails::Electronic { category } => {
                map.insert("category".into(), Value::from(category.as_str()));
            }
            ProductDetails::Food { expiration } => {
                map.insert("expiration".into(), Value::from(expiration.to_string()));
            }
        }
        map
    }

    /// Rebuild a product from a mapping, validating every field.
    pub fn from_mapping(map: &Map<String, Value>) -> Result<Self, ValidationError> {
        let record: ProductRecord = serde_json::from_value(Value::Object(map.clone()))
            .map_err(|e| ValidationError::new("record", e.to_string()))?;
        Self::try_from(record)
    }
}

impl std::fmt::Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.code, self.name)?;
        match &self.details {
            ProductDetails::Electronic { category } => write!(f, " - category: {category}"),
            ProductDetails::Food { expiration } => write!(f, " - expiration: {expiration}"),
        }
    }
}

/// Flat, unvalidated form of a product as it appears in storage.
///
/// Converting a record into a [`Product`] runs the full validation, so
/// storage backends decode into this type and then call `try_from`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Product code
    pub code: String,
    /// Product name
    pub name: String,
    /// Unit cost
    pub cost: f64,
    /// Unit sale price
    pub price: f64,
    /// Units in stock
    pub quantity: i64,
    /// Variant discriminant
    pub kind: ProductKind,
    /// Electronic category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Food expiration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<String>,
}

impl TryFrom<ProductRecord> for Product {
    type Error = ValidationError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        let details = match (record.kind, record.category, record.expiration) {
            (ProductKind::Electronic, Some(category), None) => ProductDetails::electronic(&category),
            (ProductKind::Food, None, Some(expiration)) => ProductDetails::food(&expiration),
            (ProductKind::Electronic, _, _) => {
                return Err(ValidationError::new(
                    "category",
                    "electronic products need a category and no expiration",
                ))
            }
            (ProductKind::Food, _, _) => {
                return Err(ValidationError::new(
                    "expiration",
                    "food products need an expiration and no category",
                ))
            }
        };

        Self::from_parts(
            ProductCode::parse(&record.code)?,
            &record.name,
            record.cost,
            record.price,
            ensure_nonnegative("quantity", record.quantity)?,
            details,
        )
    }
}

impl From<Product> for ProductRecord {
    fn from(product: Product) -> Self {
        let kind = product.kind();
        let (category, expiration) = match product.details {
            ProductDetails::Electronic { category } => (Some(category), None),
            ProductDetails::Food { expiration } => (None, Some(expiration.to_string())),
        };
        Self {
            code: product.code.into(),
            name: product.name,
            cost: product.cost,
            price: product.price,
            quantity: i64::from(product.quantity),
            kind,
            category,
            expiration,
        }
    }
}

/// New cost, price and quantity for an existing product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductUpdate {
    cost: f64,
    price: f64,
    quantity: u32,
}

impl ProductUpdate {
    /// Validate typed values.
    pub fn new(cost: f64, price: f64, quantity: u32) -> Result<Self, ValidationError> {
        Ok(Self {
            cost: ensure_positive("cost", cost)?,
            price: ensure_positive("price", price)?,
            quantity,
        })
    }

    /// Validate raw input.
    pub fn parse(cost: &str, price: &str, quantity: &str) -> Result<Self, ValidationError> {
        Self::new(
            parse_positive_decimal("cost", cost)?,
            parse_positive_decimal("price", price)?,
            parse_nonnegative_integer("quantity", quantity)?,
        )
    }

    /// New unit cost
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// New unit price
    pub fn price(&self) -> f64 {
        self.price
    }

    /// New stock quantity
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
