//! Product Fixtures

use jiff::Timestamp;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    products::{PriceRange, Product, ProductStatus, Variant, Visibility},
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Products in display order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product identifier
    pub id: String,

    /// Product title
    pub title: String,

    /// Product category
    pub category: String,

    /// Product price (e.g., "29.99 USD")
    pub price: String,

    /// Highest variant price, same format as `price`
    #[serde(default)]
    pub max_price: Option<String>,

    /// Lifecycle status
    #[serde(default = "default_status")]
    pub status: ProductStatus,

    /// Storefront visibility
    #[serde(default = "default_visibility")]
    pub visibility: Visibility,

    /// Last update (RFC 3339)
    pub updated_at: String,

    /// Units on hand; ignored when variants are present
    #[serde(default)]
    pub stock: u32,

    /// Units reserved; ignored when variants are present
    #[serde(default)]
    pub reserved: u32,

    /// Image URL
    #[serde(default)]
    pub image: Option<String>,

    /// Variant rows
    #[serde(default)]
    pub variants: Vec<VariantFixture>,
}

/// Variant Fixture
#[derive(Debug, Deserialize)]
pub struct VariantFixture {
    /// Stock keeping unit
    pub sku: String,

    /// Size attribute
    #[serde(default)]
    pub size: Option<String>,

    /// Colour attribute
    #[serde(default)]
    pub color: Option<String>,

    /// Units on hand
    #[serde(default)]
    pub stock: u32,

    /// Units reserved
    #[serde(default)]
    pub reserved: u32,

    /// Lifecycle status
    #[serde(default = "default_status")]
    pub status: ProductStatus,
}

fn default_status() -> ProductStatus {
    ProductStatus::Active
}

fn default_visibility() -> Visibility {
    Visibility::Published
}

impl From<VariantFixture> for Variant {
    fn from(fixture: VariantFixture) -> Self {
        Variant {
            sku: fixture.sku,
            size: fixture.size,
            color: fixture.color,
            stock: fixture.stock,
            reserved: fixture.reserved.min(fixture.stock),
            status: fixture.status,
        }
    }
}

impl TryFrom<ProductFixture> for Product<'static> {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;
        let min = Money::from_minor(minor_units, currency);

        let max = match fixture.max_price.as_deref() {
            Some(max_price) => {
                let (max_units, max_currency) = parse_price(max_price)?;

                if max_currency != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        currency.iso_alpha_code.to_string(),
                        max_currency.iso_alpha_code.to_string(),
                    ));
                }

                if max_units < minor_units {
                    return Err(FixtureError::InvalidPriceRange(fixture.id));
                }

                Some(Money::from_minor(max_units, currency))
            }
            None => None,
        };

        let updated_at: Timestamp = fixture.updated_at.parse()?;

        let mut product = Product::new(
            fixture.id,
            fixture.title,
            fixture.category,
            PriceRange { min, max },
            updated_at,
        )
        .with_status(fixture.status)
        .with_visibility(fixture.visibility);

        if let Some(image) = fixture.image {
            product = product.with_image(image);
        }

        Ok(if fixture.variants.is_empty() {
            product.with_stock(fixture.stock, fixture.reserved)
        } else {
            product.with_variants(
                fixture
                    .variants
                    .into_iter()
                    .map(Variant::from)
                    .collect::<Vec<_>>(),
            )
        })
    }
}

/// Parse price string (e.g., "2.99 GBP") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}
