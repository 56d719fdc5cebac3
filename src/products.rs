//! Products
//!
//! Catalog and inventory records. A product's aggregate stock is the sum of
//! its variants' stock whenever it has variants; stock statuses are always
//! derived on read.

use std::fmt;

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use smallvec::SmallVec;
use tracing::info;

use crate::{
    criteria::{Filterable, contains_ignore_case},
    stock::StockStatus,
    store::{Record, RecordStore, StoreError},
    table::{EditError, Editable},
};

/// Product lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ProductStatus {
    /// Listed and sellable.
    Active,

    /// Listed but not sellable.
    Inactive,

    /// Not yet listed.
    Draft,
}

impl ProductStatus {
    /// Display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ProductStatus::Active => "Active",
            ProductStatus::Inactive => "Inactive",
            ProductStatus::Draft => "Draft",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Storefront visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Visibility {
    /// Shown on the storefront.
    Published,

    /// Hidden from the storefront.
    Unpublished,
}

impl Visibility {
    /// Display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Visibility::Published => "Published",
            Visibility::Unpublished => "Unpublished",
        }
    }

    /// Parse a filter label; anything else (including "All …") is `None`.
    #[must_use]
    pub fn parse_filter(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "published" => Some(Visibility::Published),
            "unpublished" => Some(Visibility::Unpublished),
            _ => None,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Price range, in a single currency.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRange<'a> {
    /// Lowest price.
    pub min: Money<'a, Currency>,

    /// Highest price, when variants are priced differently.
    pub max: Option<Money<'a, Currency>>,
}

impl<'a> PriceRange<'a> {
    /// A single price.
    #[must_use]
    pub fn single(price: Money<'a, Currency>) -> Self {
        PriceRange {
            min: price,
            max: None,
        }
    }
}

impl fmt::Display for PriceRange<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.max {
            Some(max) if max != &self.min => write!(f, "{} - {}", self.min, max),
            _ => write!(f, "{}", self.min),
        }
    }
}

/// Product thumbnail, falling back to a placeholder when no image is usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Thumbnail<'p> {
    /// Image URL.
    Image(&'p str),

    /// Placeholder icon.
    Placeholder,
}

impl<'p> Thumbnail<'p> {
    /// Resolve a thumbnail from an optional image URL.
    #[must_use]
    pub fn resolve(image: Option<&'p str>) -> Self {
        match image.map(str::trim) {
            Some(url) if !url.is_empty() => Thumbnail::Image(url),
            _ => Thumbnail::Placeholder,
        }
    }
}

/// A sellable variant of a product.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    /// Stock keeping unit, unique across the catalog.
    pub sku: String,

    /// Size attribute.
    pub size: Option<String>,

    /// Colour attribute.
    pub color: Option<String>,

    /// Units on hand.
    pub stock: u32,

    /// Units reserved by open orders.
    pub reserved: u32,

    /// Lifecycle status.
    pub status: ProductStatus,
}

impl Variant {
    /// Derived stock status.
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::derive(self.stock)
    }

    /// Units not reserved.
    pub fn available(&self) -> u32 {
        self.stock.saturating_sub(self.reserved)
    }

    /// Size and colour joined for display.
    pub fn attributes(&self) -> String {
        [self.size.as_deref(), self.color.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    /// Product identifier
    pub id: String,

    /// Product title
    pub title: String,

    /// Product category
    pub category: String,

    /// Product price range
    pub price: PriceRange<'a>,

    /// Units on hand across all variants
    pub total_stock: u32,

    /// Units reserved across all variants
    pub reserved_stock: u32,

    /// Lifecycle status
    pub status: ProductStatus,

    /// Storefront visibility
    pub visibility: Visibility,

    /// Last update
    pub updated_at: Timestamp,

    /// Product image
    pub image: Option<String>,

    variants: Vec<Variant>,
}

impl<'a> Product<'a> {
    /// Create a product without variants.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
        price: PriceRange<'a>,
        updated_at: Timestamp,
    ) -> Self {
        Product {
            id: id.into(),
            title: title.into(),
            category: category.into(),
            price,
            total_stock: 0,
            reserved_stock: 0,
            status: ProductStatus::Active,
            visibility: Visibility::Published,
            updated_at,
            image: None,
            variants: Vec::new(),
        }
    }

    /// Set aggregate stock for a product without variants.
    #[must_use]
    pub fn with_stock(mut self, total: u32, reserved: u32) -> Self {
        self.total_stock = total;
        self.reserved_stock = reserved.min(total);
        self
    }

    /// Set variants; aggregate stock becomes their sum.
    #[must_use]
    pub fn with_variants(mut self, variants: impl Into<Vec<Variant>>) -> Self {
        self.variants = variants.into();
        self.recompute_aggregates();
        self
    }

    /// Set the lifecycle status.
    #[must_use]
    pub fn with_status(mut self, status: ProductStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the visibility.
    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Set the image URL.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Variants in display order.
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    /// Whether the product has variant rows.
    pub fn has_variants(&self) -> bool {
        !self.variants.is_empty()
    }

    /// Look up a variant by SKU.
    pub fn variant(&self, sku: &str) -> Option<&Variant> {
        self.variants.iter().find(|variant| variant.sku == sku)
    }

    /// Derived stock status of the aggregate stock.
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::derive(self.total_stock)
    }

    /// Units not reserved.
    pub fn available(&self) -> u32 {
        self.total_stock.saturating_sub(self.reserved_stock)
    }

    /// Thumbnail to display.
    pub fn thumbnail(&self) -> Thumbnail<'_> {
        Thumbnail::resolve(self.image.as_deref())
    }

    fn recompute_aggregates(&mut self) {
        if self.variants.is_empty() {
            return;
        }

        self.total_stock = self
            .variants
            .iter()
            .fold(0u32, |sum, variant| sum.saturating_add(variant.stock));
        self.reserved_stock = self
            .variants
            .iter()
            .fold(0u32, |sum, variant| sum.saturating_add(variant.reserved));
    }

    fn variant_mut(&mut self, sku: &str) -> Result<&mut Variant, EditError> {
        self.variants
            .iter_mut()
            .find(|variant| variant.sku == sku)
            .ok_or_else(|| EditError::UnknownVariant(sku.to_string()))
    }
}

impl Record for Product<'_> {
    fn id(&self) -> &str {
        &self.id
    }

    fn child_keys(&self) -> SmallVec<[&str; 4]> {
        self.variants
            .iter()
            .map(|variant| variant.sku.as_str())
            .collect()
    }
}

impl Filterable for Product<'_> {
    fn matches_text(&self, needle: &str) -> bool {
        contains_ignore_case(&self.id, needle)
            || contains_ignore_case(&self.title, needle)
            || self
                .variants
                .iter()
                .any(|variant| contains_ignore_case(&variant.sku, needle))
    }

    fn category(&self) -> Option<&str> {
        Some(&self.category)
    }

    fn status_label(&self) -> Option<&str> {
        Some(self.status.label())
    }

    fn aggregate_stock(&self) -> Option<u32> {
        Some(self.total_stock)
    }

    fn visibility(&self) -> Option<Visibility> {
        Some(self.visibility)
    }

    fn timestamp(&self) -> Option<Timestamp> {
        Some(self.updated_at)
    }

    fn title(&self) -> Option<&str> {
        Some(&self.title)
    }

    fn value_minor(&self) -> Option<i64> {
        Some(self.price.min.to_minor_units())
    }
}

/// Inline-editable stock fields of a product row or one of its variant rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockField {
    /// Aggregate stock of a product without variants.
    Total,

    /// Aggregate reserved stock of a product without variants.
    Reserved,

    /// Stock of the variant with this SKU.
    VariantStock(String),

    /// Reserved stock of the variant with this SKU.
    VariantReserved(String),
}

impl fmt::Display for StockField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockField::Total => f.write_str("stock"),
            StockField::Reserved => f.write_str("reserved"),
            StockField::VariantStock(sku) => write!(f, "{sku} stock"),
            StockField::VariantReserved(sku) => write!(f, "{sku} reserved"),
        }
    }
}

impl Editable for Product<'_> {
    type Field = StockField;

    fn apply_edit(&mut self, field: &StockField, value: u32) -> Result<(), EditError> {
        match field {
            StockField::Total | StockField::Reserved if self.has_variants() => {
                return Err(EditError::DerivedField(field.to_string()));
            }
            StockField::Total => {
                ensure_reserved_fits(self.reserved_stock, value)?;
                self.total_stock = value;
            }
            StockField::Reserved => {
                ensure_reserved_fits(value, self.total_stock)?;
                self.reserved_stock = value;
            }
            StockField::VariantStock(sku) => {
                let variant = self.variant_mut(sku)?;
                ensure_reserved_fits(variant.reserved, value)?;
                variant.stock = value;
            }
            StockField::VariantReserved(sku) => {
                let variant = self.variant_mut(sku)?;
                ensure_reserved_fits(value, variant.stock)?;
                variant.reserved = value;
            }
        }

        self.recompute_aggregates();

        Ok(())
    }
}

fn ensure_reserved_fits(reserved: u32, stock: u32) -> Result<(), EditError> {
    if reserved > stock {
        return Err(EditError::ReservedExceedsStock { reserved, stock });
    }

    Ok(())
}

/// Publish or unpublish a set of products.
///
/// Returns the number of products whose visibility changed.
///
/// # Errors
///
/// Returns `StoreError::NotFound` on the first unknown id; earlier products
/// keep their new visibility.
pub fn set_visibility<'i>(
    store: &mut RecordStore<Product<'_>>,
    ids: impl IntoIterator<Item = &'i str>,
    visibility: Visibility,
) -> Result<usize, StoreError> {
    let mut changed = 0usize;

    for id in ids {
        let updated = store.update::<_, StoreError>(id, |product| {
            let differs = product.visibility != visibility;
            product.visibility = visibility;
            Ok(differs)
        })?;

        if updated {
            changed = changed.saturating_add(1);
        }
    }

    info!(changed, visibility = %visibility, "bulk visibility update");

    Ok(changed)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;

    fn variant(sku: &str, stock: u32) -> Variant {
        Variant {
            sku: sku.to_string(),
            size: Some("M".to_string()),
            color: Some("Black".to_string()),
            stock,
            reserved: 0,
            status: ProductStatus::Active,
        }
    }

    fn headphones() -> TestResult<Product<'static>> {
        Ok(Product::new(
            "PRD-1",
            "Wireless Headphones",
            "Electronics",
            PriceRange::single(Money::from_minor(7999, USD)),
            "2024-05-01T10:00:00Z".parse()?,
        )
        .with_variants([variant("WH-BLK-M", 4), variant("WH-WHT-M", 9)]))
    }

    #[test]
    fn variants_drive_aggregate_stock() -> TestResult {
        let product = headphones()?;

        assert_eq!(product.total_stock, 13);
        assert_eq!(product.stock_status(), StockStatus::InStock);
        assert_eq!(
            product.variant("WH-BLK-M").map(Variant::stock_status),
            Some(StockStatus::LowStock)
        );

        Ok(())
    }

    #[test]
    fn search_matches_variant_sku() -> TestResult {
        let product = headphones()?;

        assert!(product.matches_text("wh-blk"));
        assert!(product.matches_text("wireless"));
        assert!(product.matches_text("prd-1"));
        assert!(!product.matches_text("lamp"));

        Ok(())
    }

    #[test]
    fn variant_edit_recomputes_aggregate() -> TestResult {
        let mut product = headphones()?;

        product.apply_edit(&StockField::VariantStock("WH-BLK-M".to_string()), 0)?;

        assert_eq!(product.total_stock, 9);
        assert_eq!(
            product.variant("WH-BLK-M").map(Variant::stock_status),
            Some(StockStatus::OutOfStock)
        );

        Ok(())
    }

    #[test]
    fn total_edit_on_variant_product_is_rejected() -> TestResult {
        let mut product = headphones()?;

        let result = product.apply_edit(&StockField::Total, 50);

        assert_eq!(result, Err(EditError::DerivedField("stock".to_string())));
        assert_eq!(product.total_stock, 13);

        Ok(())
    }

    #[test]
    fn reserved_cannot_exceed_stock() -> TestResult {
        let mut product = Product::new(
            "PRD-2",
            "Desk Lamp",
            "Home",
            PriceRange::single(Money::from_minor(2500, USD)),
            "2024-05-01T10:00:00Z".parse()?,
        )
        .with_stock(5, 0);

        let result = product.apply_edit(&StockField::Reserved, 6);

        assert_eq!(
            result,
            Err(EditError::ReservedExceedsStock {
                reserved: 6,
                stock: 5
            })
        );

        product.apply_edit(&StockField::Reserved, 5)?;

        assert_eq!(product.available(), 0);

        Ok(())
    }

    #[test]
    fn unknown_variant_is_rejected() -> TestResult {
        let mut product = headphones()?;

        let result = product.apply_edit(&StockField::VariantStock("NOPE".to_string()), 1);

        assert_eq!(result, Err(EditError::UnknownVariant("NOPE".to_string())));

        Ok(())
    }

    #[test]
    fn thumbnail_falls_back_to_placeholder() -> TestResult {
        let product = headphones()?;

        assert_eq!(product.thumbnail(), Thumbnail::Placeholder);
        assert_eq!(Thumbnail::resolve(Some("  ")), Thumbnail::Placeholder);
        assert_eq!(
            product.with_image("https://img/wh.png").thumbnail(),
            Thumbnail::Image("https://img/wh.png")
        );

        Ok(())
    }

    #[test]
    fn price_range_display() {
        let single = PriceRange::single(Money::from_minor(1000, USD));
        let range = PriceRange {
            min: Money::from_minor(1000, USD),
            max: Some(Money::from_minor(2000, USD)),
        };

        assert!(!single.to_string().contains(" - "));
        assert!(range.to_string().contains(" - "));
    }

    #[test]
    fn set_visibility_counts_changes() -> TestResult {
        let product = headphones()?;
        let hidden = Product::new(
            "PRD-3",
            "Hidden",
            "Home",
            PriceRange::single(Money::from_minor(100, USD)),
            product.updated_at,
        )
        .with_visibility(Visibility::Unpublished);

        let mut store = RecordStore::with_records([product, hidden])?;

        let changed = set_visibility(&mut store, ["PRD-1", "PRD-3"], Visibility::Published)?;

        assert_eq!(changed, 1);
        assert_eq!(
            store.get("PRD-3").map(|product| product.visibility),
            Some(Visibility::Published)
        );

        Ok(())
    }
}
