//! Render
//!
//! Terminal tables for the dashboard views.

use std::{io, ops::Range};

use jiff::Timestamp;
use rusty_money::MoneyError;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    finance::{FinanceSummary, Transaction},
    orders::{Order, OrderStatus, StatusCounts},
    pagination::Pagination,
    products::{Product, StockField, Thumbnail, Variant},
    store::RecordStore,
    table::TableState,
};

/// Errors that can occur while rendering a table.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Writing to the output failed.
    #[error("Failed to write table: {0}")]
    Io(#[from] io::Error),

    /// An order total could not be computed.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

const DATE_FORMAT: &str = "%Y-%m-%d";

fn date(timestamp: Timestamp) -> String {
    timestamp.strftime(DATE_FORMAT).to_string()
}

fn selection_marker(selected: bool) -> &'static str {
    if selected { "[x]" } else { "[ ]" }
}

/// Write a page of products.
///
/// Selected rows are marked `[x]`, rows with committed edits carry a `*`
/// after the id, and expanded parents are followed by one row per variant.
/// An open inline editor shows its buffer in brackets in place of the value.
///
/// # Errors
///
/// Returns a `RenderError` if the output cannot be written.
pub fn write_products(
    mut out: impl io::Write,
    page: &[&Product<'_>],
    state: &TableState<StockField>,
    store: &RecordStore<Product<'_>>,
) -> Result<(), RenderError> {
    let mut builder = Builder::default();

    builder.push_record([
        "", "ID", "Product", "Category", "Price", "Stock", "Reserved", "Status", "Visibility",
        "Updated", "Image",
    ]);

    for product in page {
        let id = if store.is_edited(&product.id) {
            format!("{}*", product.id)
        } else {
            product.id.clone()
        };

        let expand_marker = match (product.has_variants(), state.is_expanded(&product.id)) {
            (false, _) => "",
            (true, false) => "▸ ",
            (true, true) => "▾ ",
        };

        builder.push_record([
            selection_marker(state.is_selected(&product.id)).to_string(),
            id,
            format!("{expand_marker}{}", product.title),
            product.category.clone(),
            product.price.to_string(),
            editable_cell(state, &product.id, &StockField::Total, product.total_stock),
            editable_cell(state, &product.id, &StockField::Reserved, product.reserved_stock),
            product.stock_status().to_string(),
            product.visibility.to_string(),
            date(product.updated_at),
            thumbnail_cell(product.thumbnail()),
        ]);

        if state.is_expanded(&product.id) {
            for variant in product.variants() {
                push_variant_row(&mut builder, state, &product.id, variant);
            }
        }
    }

    write_table(&mut out, builder, 4..7)
}

fn push_variant_row(
    builder: &mut Builder,
    state: &TableState<StockField>,
    parent_id: &str,
    variant: &Variant,
) {
    let attributes = variant.attributes();
    let label = if attributes.is_empty() {
        format!("  └ {}", variant.sku)
    } else {
        format!("  └ {} ({attributes})", variant.sku)
    };

    builder.push_record([
        String::new(),
        String::new(),
        label,
        String::new(),
        String::new(),
        editable_cell(
            state,
            parent_id,
            &StockField::VariantStock(variant.sku.clone()),
            variant.stock,
        ),
        editable_cell(
            state,
            parent_id,
            &StockField::VariantReserved(variant.sku.clone()),
            variant.reserved,
        ),
        variant.stock_status().to_string(),
        variant.status.to_string(),
        String::new(),
        String::new(),
    ]);
}

fn editable_cell(
    state: &TableState<StockField>,
    record_id: &str,
    field: &StockField,
    value: u32,
) -> String {
    match state.edit_target() {
        Some(target) if target.record_id == record_id && &target.field == field => {
            format!("[{}]", target.buffer)
        }
        _ => value.to_string(),
    }
}

fn thumbnail_cell(thumbnail: Thumbnail<'_>) -> String {
    match thumbnail {
        Thumbnail::Image(url) => url.to_string(),
        Thumbnail::Placeholder => "(no image)".to_string(),
    }
}

/// Write a page of orders. Overdue ship-by dates are marked with `!`.
///
/// # Errors
///
/// Returns a `RenderError` if an order total cannot be computed or the
/// output cannot be written.
pub fn write_orders(
    mut out: impl io::Write,
    page: &[&Order<'_>],
    now: Timestamp,
) -> Result<(), RenderError> {
    let mut builder = Builder::default();

    builder.push_record([
        "Order", "Placed", "Customer", "Items", "Total", "Status", "Ship By", "Tracking",
    ]);

    for order in page {
        let ship_by = if order.is_overdue(now) {
            format!("{} !", date(order.ship_by))
        } else {
            date(order.ship_by)
        };

        let tracking = order.shipment().map_or_else(String::new, |shipment| {
            format!("{} {}", shipment.carrier(), shipment.tracking_number())
        });

        builder.push_record([
            order.number.clone(),
            date(order.placed_at),
            order.customer.name.clone(),
            order.item_count().to_string(),
            order.total()?.to_string(),
            order.status().to_string(),
            ship_by,
            tracking,
        ]);
    }

    write_table(&mut out, builder, 3..5)
}

/// Write one line with the number of orders per status.
///
/// # Errors
///
/// Returns a `RenderError` if the output cannot be written.
pub fn write_status_counts(
    mut out: impl io::Write,
    counts: &StatusCounts,
) -> Result<(), RenderError> {
    let parts: Vec<String> = OrderStatus::ALL
        .iter()
        .map(|status| format!("{status}: {}", counts.get(*status)))
        .collect();

    writeln!(out, "All: {} | {}", counts.total(), parts.join(" | "))?;

    Ok(())
}

/// Write a page of ledger entries.
///
/// # Errors
///
/// Returns a `RenderError` if the output cannot be written.
pub fn write_transactions(
    mut out: impl io::Write,
    page: &[&Transaction<'_>],
) -> Result<(), RenderError> {
    let mut builder = Builder::default();

    builder.push_record(["ID", "Date", "Type", "Status", "Amount", "Balance"]);

    for transaction in page {
        builder.push_record([
            transaction.id.clone(),
            date(transaction.timestamp),
            transaction.kind.to_string(),
            transaction.status.to_string(),
            transaction.amount.to_string(),
            transaction.balance.to_string(),
        ]);
    }

    write_table(&mut out, builder, 4..6)
}

/// Write the finance overview totals.
///
/// # Errors
///
/// Returns a `RenderError` if the output cannot be written.
pub fn write_finance_summary(
    mut out: impl io::Write,
    summary: &FinanceSummary<'_>,
) -> Result<(), RenderError> {
    let lines = [
        ("Gross sales:", summary.gross_sales.to_string()),
        ("Refunds:", summary.refunds.to_string()),
        ("Commissions:", summary.commissions.to_string()),
        ("Adjustments:", summary.adjustments.to_string()),
        ("Net earnings:", summary.net_earnings.to_string()),
        ("Payouts:", summary.payouts.to_string()),
        ("Available balance:", summary.available_balance.to_string()),
        ("Pending:", summary.pending.to_string()),
    ];

    let label_width = lines.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let value_width = lines.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

    for (label, value) in &lines {
        writeln!(out, " {label:>label_width$}  {value:>value_width$}")?;
    }

    writeln!(out)?;

    Ok(())
}

/// Write the pager line below a table.
///
/// # Errors
///
/// Returns a `RenderError` if the output cannot be written.
pub fn write_page_footer(
    mut out: impl io::Write,
    pagination: &Pagination,
    total: usize,
    selected: usize,
) -> Result<(), RenderError> {
    let range = pagination.range(total);
    let first = if range.is_empty() { 0 } else { range.start + 1 };

    write!(
        out,
        "Showing {first}-{} of {total} | Page {} of {}",
        range.end,
        pagination.index() + 1,
        pagination.page_count(total),
    )?;

    if selected > 0 {
        write!(out, " | {selected} selected")?;
    }

    writeln!(out)?;

    Ok(())
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    numeric_columns: Range<usize>,
) -> Result<(), RenderError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(numeric_columns), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use crate::{
        finance::{TransactionKind, TransactionStatus},
        orders::Customer,
        products::{PriceRange, ProductStatus},
    };

    use super::*;

    fn headphones() -> TestResult<Product<'static>> {
        Ok(Product::new(
            "PRD-1",
            "Wireless Headphones",
            "Electronics",
            PriceRange::single(Money::from_minor(7_999, USD)),
            "2024-06-10T09:30:00Z".parse()?,
        )
        .with_variants(vec![Variant {
            sku: "WH-BLK-M".to_string(),
            size: Some("M".to_string()),
            color: Some("Black".to_string()),
            stock: 4,
            reserved: 0,
            status: ProductStatus::Active,
        }]))
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<(), RenderError>) -> TestResult<String> {
        let mut out = Vec::new();

        f(&mut out)?;

        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn products_show_markers_and_variants_when_expanded() -> TestResult {
        let mut store = RecordStore::with_records(vec![headphones()?])?;
        let mut state = TableState::default();

        state.toggle_select("PRD-1");
        store.mark_edited("PRD-1")?;

        let collapsed = render(|out| {
            write_products(out, &store.iter().collect::<Vec<_>>(), &state, &store)
        })?;

        assert!(collapsed.contains("[x]"));
        assert!(collapsed.contains("PRD-1*"));
        assert!(collapsed.contains("(no image)"));
        assert!(!collapsed.contains("WH-BLK-M"));

        assert!(state.toggle_expand(&store, "PRD-1"));

        let expanded = render(|out| {
            write_products(out, &store.iter().collect::<Vec<_>>(), &state, &store)
        })?;

        assert!(expanded.contains("└ WH-BLK-M (M / Black)"));
        assert!(expanded.contains("Low stock"));

        Ok(())
    }

    #[test]
    fn open_editor_shows_buffer() -> TestResult {
        let store = RecordStore::with_records(vec![headphones()?])?;
        let mut state = TableState::default();

        assert!(state.toggle_expand(&store, "PRD-1"));
        state.begin_edit("PRD-1", StockField::VariantStock("WH-BLK-M".to_string()), 4);
        state.update_edit_buffer("17");

        let output = render(|out| {
            write_products(out, &store.iter().collect::<Vec<_>>(), &state, &store)
        })?;

        assert!(output.contains("[17]"));

        Ok(())
    }

    #[test]
    fn orders_mark_overdue_ship_dates() -> TestResult {
        let order = Order::new(
            "ord-1",
            "#1001",
            Customer {
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
            },
            USD,
            "2024-06-01T00:00:00Z".parse()?,
            "2024-06-03T00:00:00Z".parse()?,
        );

        let now: Timestamp = "2024-06-05T00:00:00Z".parse()?;
        let output = render(|out| write_orders(out, &[&order], now))?;

        assert!(output.contains("#1001"));
        assert!(output.contains("2024-06-03 !"));
        assert!(output.contains("Pending"));

        Ok(())
    }

    #[test]
    fn status_counts_line_lists_every_status() -> TestResult {
        let output = render(|out| write_status_counts(out, &StatusCounts::default()))?;

        assert_eq!(
            output,
            "All: 0 | Pending: 0 | Processing: 0 | Ready to Ship: 0 | Shipped: 0 | Cancelled: 0\n"
        );

        Ok(())
    }

    #[test]
    fn transactions_and_summary_render_amounts() -> TestResult {
        let entry = Transaction::new(
            "txn-1",
            Money::from_minor(2_500, USD),
            TransactionKind::Sale,
            TransactionStatus::Completed,
            "2024-06-01T00:00:00Z".parse()?,
        );

        let table = render(|out| write_transactions(out, &[&entry]))?;

        assert!(table.contains("txn-1"));
        assert!(table.contains("sale"));
        assert!(table.contains("$25.00"));

        let summary = FinanceSummary::from_transactions(USD, [&entry])?;
        let lines = render(|out| write_finance_summary(out, &summary))?;

        assert!(lines.contains("Gross sales:"));
        assert!(lines.contains("Available balance:"));

        Ok(())
    }

    #[test]
    fn footer_reports_range_and_selection() -> TestResult {
        let mut pagination = Pagination::new(10);
        pagination.go_to(1, 25);

        let output = render(|out| write_page_footer(out, &pagination, 25, 2))?;

        assert_eq!(output, "Showing 11-20 of 25 | Page 2 of 3 | 2 selected\n");

        let empty = render(|out| write_page_footer(out, &Pagination::default(), 0, 0))?;

        assert_eq!(empty, "Showing 0-0 of 0 | Page 1 of 1\n");

        Ok(())
    }
}
