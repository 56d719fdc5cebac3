//! Stock
//!
//! Stock tiers shared by variant stock status and the inventory-level filter.

use std::fmt;

/// Highest stock count still considered "low".
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// Derived stock status of a variant or product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockStatus {
    /// More than [`LOW_STOCK_THRESHOLD`] units.
    InStock,

    /// Between 1 and [`LOW_STOCK_THRESHOLD`] units.
    LowStock,

    /// No units.
    OutOfStock,
}

impl StockStatus {
    /// Derive the status for a stock count.
    #[must_use]
    pub fn derive(stock: u32) -> Self {
        match stock {
            0 => StockStatus::OutOfStock,
            1..=LOW_STOCK_THRESHOLD => StockStatus::LowStock,
            _ => StockStatus::InStock,
        }
    }

    /// Display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            StockStatus::InStock => "In stock",
            StockStatus::LowStock => "Low stock",
            StockStatus::OutOfStock => "Out of stock",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inventory-level filter over aggregate stock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InventoryLevel {
    /// No constraint.
    #[default]
    All,

    /// Aggregate stock above the low threshold.
    InStock,

    /// Aggregate stock between 1 and the low threshold.
    LowStock,

    /// Zero aggregate stock.
    OutOfStock,
}

impl InventoryLevel {
    /// Parse a filter label such as `"Out of Stock"`.
    ///
    /// Unrecognised labels mean "no constraint".
    #[must_use]
    pub fn parse(label: &str) -> Self {
        let normalised = label.trim().to_ascii_lowercase().replace(['-', '_'], " ");

        match normalised.as_str() {
            "in stock" => InventoryLevel::InStock,
            "low stock" => InventoryLevel::LowStock,
            "out of stock" => InventoryLevel::OutOfStock,
            _ => InventoryLevel::All,
        }
    }

    /// Whether a stock count satisfies this level.
    #[must_use]
    pub fn admits(self, stock: u32) -> bool {
        match self {
            InventoryLevel::All => true,
            InventoryLevel::InStock => StockStatus::derive(stock) == StockStatus::InStock,
            InventoryLevel::LowStock => StockStatus::derive(stock) == StockStatus::LowStock,
            InventoryLevel::OutOfStock => StockStatus::derive(stock) == StockStatus::OutOfStock,
        }
    }
}
