//! Mock data generators
//!
//! Seeded generators for catalog, order and ledger records. The same seed and
//! reference time always produce the same records.

use jiff::{SignedDuration, Timestamp};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use rusty_money::{
    Money,
    iso::{Currency, USD},
};
use thiserror::Error;
use tracing::debug;

use crate::{
    finance::{FinanceError, Transaction, TransactionKind, TransactionStatus, with_running_balance},
    orders::{
        Address, Carrier, Customer, Order, OrderItem, RejectionForm, RejectionReason,
        ShipmentForm, TransitionError,
    },
    products::{PriceRange, Product, ProductStatus, Variant, Visibility},
};

/// Reference time generated records are placed before (2024-06-15T12:00:00Z).
pub const REFERENCE_TIME: Timestamp = Timestamp::constant(1_718_452_800, 0);

const SECONDS_PER_DAY: i64 = 86_400;

const CATALOG: [(&str, &str, &str, i64); 10] = [
    ("WH", "Wireless Headphones", "Electronics", 7_999),
    ("SW", "Smart Watch", "Electronics", 14_999),
    ("TS", "Cotton T-Shirt", "Apparel", 1_999),
    ("RJ", "Rain Jacket", "Apparel", 6_999),
    ("CM", "Ceramic Mug", "Home & Kitchen", 1_299),
    ("DL", "Desk Lamp", "Home & Kitchen", 3_499),
    ("YM", "Yoga Mat", "Sports", 2_999),
    ("WB", "Water Bottle", "Sports", 1_599),
    ("FS", "Face Serum", "Beauty", 2_499),
    ("LB", "Lip Balm", "Beauty", 599),
];

const COLORS: [(&str, &str); 4] = [
    ("BLK", "Black"),
    ("WHT", "White"),
    ("NAV", "Navy"),
    ("RED", "Red"),
];

const SIZES: [&str; 3] = ["S", "M", "L"];

const FIRST_NAMES: [&str; 8] = [
    "Ada", "Grace", "Alan", "Katherine", "Linus", "Margaret", "Dennis", "Barbara",
];

const LAST_NAMES: [&str; 8] = [
    "Lovelace", "Hopper", "Turing", "Johnson", "Torvalds", "Hamilton", "Ritchie", "Liskov",
];

const CITIES: [(&str, &str, &str); 5] = [
    ("Austin", "78701", "US"),
    ("Portland", "97201", "US"),
    ("Denver", "80202", "US"),
    ("Chicago", "60601", "US"),
    ("Seattle", "98101", "US"),
];

const STREETS: [&str; 5] = ["Main St", "Oak Ave", "Pine Rd", "Maple Dr", "Cedar Ln"];

const PAYMENT_METHODS: [&str; 3] = ["Credit Card", "PayPal", "Bank Transfer"];

const GENERATED_REJECTIONS: [RejectionReason; 4] = [
    RejectionReason::OutOfStock,
    RejectionReason::CannotShipInTime,
    RejectionReason::PricingError,
    RejectionReason::SuspectedFraud,
];

/// Errors raised while generating mock records.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Timestamp arithmetic left the supported range.
    #[error("Timestamp out of range: {0}")]
    Time(#[from] jiff::Error),

    /// Orders need at least one product to reference.
    #[error("Cannot generate orders from an empty catalog")]
    EmptyCatalog,

    /// A generated fulfilment step was rejected.
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// Ledger balance computation failed.
    #[error(transparent)]
    Finance(#[from] FinanceError),
}

/// Seeded mock data source.
#[derive(Debug, Clone)]
pub struct MockData {
    rng: StdRng,
    now: Timestamp,
    currency: &'static Currency,
}

impl MockData {
    /// Create a generator for a seed, relative to [`REFERENCE_TIME`].
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_reference_time(seed, REFERENCE_TIME)
    }

    /// Create a generator for a seed, relative to `now`.
    #[must_use]
    pub fn with_reference_time(seed: u64, now: Timestamp) -> Self {
        MockData {
            rng: StdRng::seed_from_u64(seed),
            now,
            currency: USD,
        }
    }

    /// Reference time records are generated before.
    pub fn now(&self) -> Timestamp {
        self.now
    }

    /// Currency of generated money values.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Generate `count` products.
    ///
    /// # Errors
    ///
    /// Returns a `GenerateError` if timestamp arithmetic overflows.
    pub fn products(&mut self, count: usize) -> Result<Vec<Product<'static>>, GenerateError> {
        let products = (0..count)
            .zip(CATALOG.iter().cycle())
            .map(|(index, template)| self.product(index, *template))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = products.len(), "generated products");

        Ok(products)
    }

    fn product(
        &mut self,
        index: usize,
        (code, title, category, base_price): (&str, &str, &str, i64),
    ) -> Result<Product<'static>, GenerateError> {
        let number = index.saturating_add(1);
        let id = format!("PRD-{number:04}");
        let title = if index < CATALOG.len() {
            title.to_string()
        } else {
            format!("{title} #{}", index / CATALOG.len() + 1)
        };

        let min = base_price
            .saturating_add(self.rng.gen_range(-500..=500))
            .max(99);
        let has_variants = self.rng.gen_bool(0.6);
        let max = (has_variants && self.rng.gen_bool(0.5)).then(|| {
            Money::from_minor(
                min.saturating_add(self.rng.gen_range(100..=2_000)),
                self.currency,
            )
        });

        let updated_at = self.before_now(0..30 * SECONDS_PER_DAY)?;

        let mut product = Product::new(
            id,
            title,
            category,
            PriceRange {
                min: Money::from_minor(min, self.currency),
                max,
            },
            updated_at,
        )
        .with_status(self.product_status())
        .with_visibility(if self.rng.gen_bool(0.8) {
            Visibility::Published
        } else {
            Visibility::Unpublished
        });

        let variants = if has_variants {
            self.variants(code, number)
        } else {
            Vec::new()
        };

        if variants.is_empty() {
            let stock = self.stock();
            let reserved = self.rng.gen_range(0..=stock / 4);
            product = product.with_stock(stock, reserved);
        } else {
            product = product.with_variants(variants);
        }

        if self.rng.gen_bool(0.8) {
            let image = format!("https://cdn.example.com/products/{}.jpg", product.id);

            product = product.with_image(image);
        }

        Ok(product)
    }

    fn variants(&mut self, code: &str, number: usize) -> Vec<Variant> {
        let color_count = self.rng.gen_range(1..=2);
        let colors: Vec<(&str, &str)> = COLORS
            .choose_multiple(&mut self.rng, color_count)
            .copied()
            .collect();

        let mut variants = Vec::new();

        for (color_code, color) in colors {
            for size in SIZES {
                if !self.rng.gen_bool(0.7) {
                    continue;
                }

                let stock = self.stock();

                variants.push(Variant {
                    sku: format!("{code}-{color_code}-{size}-{number:04}"),
                    size: Some(size.to_string()),
                    color: Some(color.to_string()),
                    stock,
                    reserved: self.rng.gen_range(0..=stock / 4),
                    status: ProductStatus::Active,
                });
            }
        }

        variants
    }

    fn stock(&mut self) -> u32 {
        match self.rng.gen_range(0..10) {
            0 | 1 => 0,
            2..=4 => self.rng.gen_range(1..=10),
            _ => self.rng.gen_range(11..=120),
        }
    }

    fn product_status(&mut self) -> ProductStatus {
        match self.rng.gen_range(0..20) {
            0..=13 => ProductStatus::Active,
            14..=16 => ProductStatus::Inactive,
            _ => ProductStatus::Draft,
        }
    }

    /// Generate `count` orders for SKUs from `catalog`.
    ///
    /// Orders are driven through the fulfilment state machine, so every
    /// generated status is reachable.
    ///
    /// # Errors
    ///
    /// Returns `GenerateError::EmptyCatalog` if the catalog has no products,
    /// or another `GenerateError` if timestamp arithmetic overflows.
    pub fn orders(
        &mut self,
        count: usize,
        catalog: &[Product<'static>],
    ) -> Result<Vec<Order<'static>>, GenerateError> {
        let lines: Vec<(String, String, Money<'static, Currency>)> = catalog
            .iter()
            .flat_map(|product| {
                let price = product.price.min;

                if product.has_variants() {
                    product
                        .variants()
                        .iter()
                        .map(|variant| {
                            (
                                variant.sku.clone(),
                                format!("{} ({})", product.title, variant.attributes()),
                                price,
                            )
                        })
                        .collect::<Vec<_>>()
                } else {
                    vec![(product.id.clone(), product.title.clone(), price)]
                }
            })
            .collect();

        if lines.is_empty() {
            return Err(GenerateError::EmptyCatalog);
        }

        let orders = (0..count)
            .map(|index| self.order(index, &lines))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = orders.len(), "generated orders");

        Ok(orders)
    }

    fn order(
        &mut self,
        index: usize,
        lines: &[(String, String, Money<'static, Currency>)],
    ) -> Result<Order<'static>, GenerateError> {
        let number = index.saturating_add(1);
        let first = pick(&mut self.rng, &FIRST_NAMES);
        let last = pick(&mut self.rng, &LAST_NAMES);
        let (city, postal_code, country) = pick(&mut self.rng, &CITIES);

        let placed_at = self.before_now(0..14 * SECONDS_PER_DAY)?;
        let ship_by = placed_at.checked_add(SignedDuration::from_secs(2 * SECONDS_PER_DAY))?;

        let line_count = self.rng.gen_range(1..=3);
        let items: Vec<OrderItem<'static>> = lines
            .choose_multiple(&mut self.rng, line_count)
            .map(|(sku, name, price)| OrderItem {
                sku: sku.clone(),
                name: name.clone(),
                quantity: self.rng.gen_range(1..=3),
                unit_price: *price,
            })
            .collect();

        let mut order = Order::new(
            format!("ORD-{number:05}"),
            format!("#{}", 10_000_usize.saturating_add(number)),
            Customer {
                name: format!("{first} {last}"),
                email: format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase()),
            },
            self.currency,
            placed_at,
            ship_by,
        )
        .with_items(items)
        .with_address(Address {
            line1: format!(
                "{} {}",
                self.rng.gen_range(1..=999),
                pick(&mut self.rng, &STREETS)
            ),
            city: city.to_string(),
            postal_code: postal_code.to_string(),
            country: country.to_string(),
        })
        .with_payment_method(pick(&mut self.rng, &PAYMENT_METHODS));

        self.advance(&mut order)?;

        Ok(order)
    }

    fn advance(&mut self, order: &mut Order<'static>) -> Result<(), GenerateError> {
        let roll = self.rng.gen_range(0..10);

        if roll == 3 {
            let reason = GENERATED_REJECTIONS
                .choose(&mut self.rng)
                .copied()
                .unwrap_or(RejectionReason::OutOfStock);
            let rejection = RejectionForm {
                reason: Some(reason),
                other_text: String::new(),
            }
            .submit()?;

            order.reject(rejection)?;

            return Ok(());
        }

        if roll >= 4 {
            order.accept()?;
        }

        if roll >= 6 {
            order.pack()?;
        }

        if roll >= 8 {
            let carrier = Carrier::ALL
                .choose(&mut self.rng)
                .copied()
                .unwrap_or(Carrier::Ups);
            let shipment = ShipmentForm {
                carrier: Some(carrier),
                tracking_number: format!(
                    "{}{:010}",
                    carrier.label(),
                    self.rng.gen_range(0..u32::MAX)
                ),
            }
            .submit()?;

            order.ship(shipment)?;
        }

        Ok(())
    }

    /// Generate `count` ledger entries with running balances.
    ///
    /// # Errors
    ///
    /// Returns a `GenerateError` if timestamp arithmetic overflows.
    pub fn transactions(
        &mut self,
        count: usize,
    ) -> Result<Vec<Transaction<'static>>, GenerateError> {
        let mut entries = Vec::with_capacity(count);

        for index in 0..count {
            let (kind, minor) = match self.rng.gen_range(0..10) {
                0..=4 => (TransactionKind::Sale, self.rng.gen_range(1_000..=20_000)),
                5 | 6 => (TransactionKind::Commission, -self.rng.gen_range(200..=2_000)),
                7 => (TransactionKind::Refund, -self.rng.gen_range(500..=8_000)),
                8 => (TransactionKind::Payout, -self.rng.gen_range(5_000..=30_000)),
                _ => (TransactionKind::Adjustment, self.rng.gen_range(-500..=500)),
            };

            let status = match self.rng.gen_range(0..20) {
                0 | 1 => TransactionStatus::Pending,
                2 => TransactionStatus::Failed,
                _ => TransactionStatus::Completed,
            };

            entries.push(Transaction::new(
                format!("TXN-{:05}", index.saturating_add(1)),
                Money::from_minor(minor, self.currency),
                kind,
                status,
                self.before_now(0..30 * SECONDS_PER_DAY)?,
            ));
        }

        let ledger = with_running_balance(Money::from_minor(0, self.currency), entries)?;

        debug!(count = ledger.len(), "generated transactions");

        Ok(ledger)
    }

    fn before_now(&mut self, seconds: std::ops::Range<i64>) -> Result<Timestamp, GenerateError> {
        let offset = self.rng.gen_range(seconds);

        Ok(self.now.checked_sub(SignedDuration::from_secs(offset))?)
    }
}

fn pick<T: Copy + Default>(rng: &mut StdRng, items: &[T]) -> T {
    items.choose(rng).copied().unwrap_or_default()
}
