//! Fixtures
//!
//! YAML catalog files under `<base>/products/<name>.yml`, an alternative to
//! the seeded generators when a table needs hand-picked records.

use std::{fs, path::PathBuf};

use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::debug;

use crate::{
    products::Product,
    store::{RecordStore, StoreError},
};

pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Timestamp parsing error
    #[error("Invalid timestamp: {0}")]
    Timestamp(#[from] jiff::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Maximum price below minimum price
    #[error("Invalid price range for {0}: maximum is below minimum")]
    InvalidPriceRange(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Duplicate ids or SKUs
    #[error("Invalid catalog: {0}")]
    Store(#[from] StoreError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Products in file order
    products: Vec<Product<'static>>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            products: Vec::new(),
            currency: None,
        }
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if there are currency mismatches.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: products::ProductsFixture = serde_norway::from_str(&contents)?;

        for product_fixture in fixture.products {
            let product = Product::try_from(product_fixture)?;
            let currency = product.price.min.currency();

            // Validate currency consistency
            if let Some(existing_currency) = self.currency {
                if existing_currency != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        existing_currency.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
            } else {
                self.currency = Some(currency);
            }

            self.products.push(product);
        }

        debug!(
            path = %file_path.display(),
            products = self.products.len(),
            "loaded product fixture"
        );

        Ok(self)
    }

    /// Get all products
    pub fn products(&self) -> &[Product<'static>] {
        &self.products
    }

    /// Currency of the loaded products, if any are loaded
    pub fn currency(&self) -> Option<&'static Currency> {
        self.currency
    }

    /// Move the loaded products into a record store
    ///
    /// # Errors
    ///
    /// Returns an error if product ids or variant SKUs are duplicated.
    pub fn into_store(self) -> Result<RecordStore<Product<'static>>, FixtureError> {
        Ok(RecordStore::with_records(self.products)?)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::stock::StockStatus;

    use super::*;

    fn write_fixture(dir: &Path, name: &str, contents: &str) -> TestResult {
        let products = dir.join("products");
        fs::create_dir_all(&products)?;
        fs::write(products.join(format!("{name}.yml")), contents)?;

        Ok(())
    }

    #[test]
    fn loads_products_in_file_order() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(
            dir.path(),
            "mini",
            r#"
products:
  - id: PRD-2
    title: Desk Lamp
    category: Home
    price: "34.99 USD"
    updated_at: "2024-05-01T10:00:00Z"
    stock: 0
  - id: PRD-1
    title: Wireless Headphones
    category: Electronics
    price: "79.99 USD"
    max_price: "99.99 USD"
    status: Draft
    visibility: Unpublished
    updated_at: "2024-05-02T10:00:00Z"
    variants:
      - sku: WH-BLK-M
        color: Black
        size: M
        stock: 12
      - sku: WH-WHT-M
        color: White
        size: M
        stock: 3
        reserved: 1
"#,
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_products("mini")?;

        assert_eq!(fixture.currency(), Some(USD));

        let store = fixture.into_store()?;
        let ids: Vec<&str> = store.iter().map(|product| product.id.as_str()).collect();

        assert_eq!(ids, vec!["PRD-2", "PRD-1"]);

        let lamp = store.get("PRD-2").ok_or("missing lamp")?;
        let headphones = store.get("PRD-1").ok_or("missing headphones")?;

        assert_eq!(lamp.stock_status(), StockStatus::OutOfStock);
        assert_eq!(headphones.total_stock, 15);
        assert_eq!(headphones.reserved_stock, 1);
        assert_eq!(headphones.variants().len(), 2);

        Ok(())
    }

    #[test]
    fn currency_mismatch_errors() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(
            dir.path(),
            "mixed",
            r#"
products:
  - id: A
    title: A
    category: X
    price: "1.00 USD"
    updated_at: "2024-05-01T10:00:00Z"
  - id: B
    title: B
    category: X
    price: "1.00 GBP"
    updated_at: "2024-05-01T10:00:00Z"
"#,
        )?;

        let result = Fixture::with_base_path(dir.path())
            .load_products("mixed")
            .map(|_fixture| ());

        assert!(matches!(result, Err(FixtureError::CurrencyMismatch(_, _))));

        Ok(())
    }

    #[test]
    fn duplicate_skus_fail_store_conversion() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(
            dir.path(),
            "dupes",
            r#"
products:
  - id: A
    title: A
    category: X
    price: "1.00 USD"
    updated_at: "2024-05-01T10:00:00Z"
    variants:
      - sku: SAME
        stock: 1
  - id: B
    title: B
    category: X
    price: "1.00 USD"
    updated_at: "2024-05-01T10:00:00Z"
    variants:
      - sku: SAME
        stock: 1
"#,
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_products("dupes")?;

        assert!(matches!(
            fixture.into_store(),
            Err(FixtureError::Store(StoreError::DuplicateChildKey(_)))
        ));

        Ok(())
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = Fixture::with_base_path("/definitely/not/here")
            .load_products("nope")
            .map(|_fixture| ());

        assert!(matches!(result, Err(FixtureError::Io(_))));
    }

    #[test]
    fn bundled_sample_loads() -> TestResult {
        let mut fixture =
            Fixture::with_base_path(Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures"));
        fixture.load_products("sample")?;

        let store = fixture.into_store()?;

        assert!(!store.is_empty());

        Ok(())
    }
}
