//! `sellerdesk products`

use std::{io, path::PathBuf, str::FromStr};

use clap::Args;
use jiff::Timestamp;
use tracing::info;

use sellerdesk::{
    fixtures::Fixture,
    generators::MockData,
    pipeline::derive_view,
    products::{Product, StockField, Visibility, set_visibility},
    render::{write_page_footer, write_products},
    store::{Record, RecordStore},
    table::{EditOutcome, InvalidEditPolicy, KeySignal, TableState},
};

use super::{CliError, ViewArgs};

/// Product table flags.
#[derive(Debug, Args)]
pub struct ProductsArgs {
    /// Data source, filters and paging
    #[command(flatten)]
    pub view: ViewArgs,

    /// Inventory filter (All, In Stock, Low Stock, Out of Stock)
    #[arg(short, long, default_value = "All")]
    pub inventory: String,

    /// Visibility filter (All, Published, Unpublished)
    #[arg(long, default_value = "All")]
    pub visibility: String,

    /// Load products from `<fixtures-dir>/products/<NAME>.yml` instead of generating them
    #[arg(long, value_name = "NAME")]
    pub fixture: Option<String>,

    /// Directory holding fixture files
    #[arg(long, env = "SELLERDESK_FIXTURES", default_value = "./fixtures")]
    pub fixtures_dir: PathBuf,

    /// Inline stock edit, e.g. `PRD-1:stock=15` or `PRD-1:WH-BLK-M/reserved=2`
    #[arg(short, long, value_name = "ID:FIELD=VALUE")]
    pub edit: Vec<EditRequest>,

    /// Fail on the first rejected edit instead of discarding it
    #[arg(long)]
    pub strict_edits: bool,

    /// Select a product by id
    #[arg(long, value_name = "ID")]
    pub select: Vec<String>,

    /// Toggle selection of every product matching the filters, across all pages
    #[arg(long)]
    pub select_all: bool,

    /// Publish the selected products
    #[arg(long, conflicts_with = "unpublish")]
    pub publish: bool,

    /// Unpublish the selected products
    #[arg(long)]
    pub unpublish: bool,

    /// Remove the selected products
    #[arg(long)]
    pub delete: bool,

    /// Log a delete request for a product without removing it
    #[arg(long, value_name = "ID")]
    pub request_delete: Vec<String>,

    /// Show variant rows of a product
    #[arg(short = 'x', long, value_name = "ID")]
    pub expand: Vec<String>,
}

/// One `--edit` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    /// Product id.
    pub product_id: String,

    /// Field to edit.
    pub field: StockField,

    /// Raw input, validated on commit.
    pub value: String,
}

impl FromStr for EditRequest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let usage = || format!("expected ID:FIELD=VALUE, got {s:?}");

        let (target, value) = s.split_once('=').ok_or_else(usage)?;
        let (product_id, field) = target.split_once(':').ok_or_else(usage)?;

        let field = match field {
            "stock" => StockField::Total,
            "reserved" => StockField::Reserved,
            variant => match variant.rsplit_once('/') {
                Some((sku, "stock")) => StockField::VariantStock(sku.to_string()),
                Some((sku, "reserved")) => StockField::VariantReserved(sku.to_string()),
                _ => {
                    return Err(format!(
                        "unknown field {variant:?}; expected stock, reserved, SKU/stock or SKU/reserved"
                    ));
                }
            },
        };

        Ok(EditRequest {
            product_id: product_id.to_string(),
            field,
            value: value.to_string(),
        })
    }
}

fn load_store(args: &ProductsArgs) -> Result<(RecordStore<Product<'static>>, Timestamp), CliError> {
    if let Some(name) = &args.fixture {
        let mut fixture = Fixture::with_base_path(&args.fixtures_dir);
        fixture.load_products(name)?;

        return Ok((fixture.into_store()?, Timestamp::now()));
    }

    let mut data = MockData::new(args.view.seed);
    let products = data.products(args.view.count)?;

    Ok((RecordStore::with_records(products)?, data.now()))
}

fn current_value(product: &Product<'_>, field: &StockField) -> Option<u32> {
    match field {
        StockField::Total => Some(product.total_stock),
        StockField::Reserved => Some(product.reserved_stock),
        StockField::VariantStock(sku) => product.variant(sku).map(|variant| variant.stock),
        StockField::VariantReserved(sku) => product.variant(sku).map(|variant| variant.reserved),
    }
}

fn apply_edits(
    args: &ProductsArgs,
    state: &mut TableState<StockField>,
    store: &mut RecordStore<Product<'static>>,
) -> Result<(), CliError> {
    for request in &args.edit {
        let current = store
            .get(&request.product_id)
            .and_then(|product| current_value(product, &request.field))
            .map_or_else(String::new, |value| value.to_string());

        state.begin_edit(&request.product_id, request.field.clone(), current);
        state.update_edit_buffer(&request.value);

        if let EditOutcome::Committed { record_id, value } =
            state.handle_key(KeySignal::Commit, store)?
        {
            info!(record_id = %record_id, value, "stock updated from command line");
        }
    }

    Ok(())
}

/// Run the products view.
///
/// # Errors
///
/// Returns a `CliError` if loading, editing, bulk actions or output fail.
pub fn run(args: &ProductsArgs, mut out: impl io::Write) -> Result<(), CliError> {
    let (mut store, now) = load_store(args)?;

    let policy = if args.strict_edits {
        InvalidEditPolicy::Keep
    } else {
        InvalidEditPolicy::Discard
    };

    let criteria = args
        .view
        .criteria(now)?
        .with_inventory(&args.inventory)
        .with_visibility(&args.visibility);

    let mut state = TableState::new(args.view.pagination(0), policy);

    apply_edits(args, &mut state, &mut store)?;

    for id in &args.select {
        if !store.contains(id) {
            return Err(CliError::Usage(format!("unknown product {id}")));
        }

        state.toggle_select(id);
    }

    if args.select_all {
        state.toggle_select_all(&derive_view(&store, &criteria));
    }

    let selected: Vec<String> = state.selected().map(str::to_string).collect();

    if args.publish || args.unpublish {
        let visibility = if args.publish {
            Visibility::Published
        } else {
            Visibility::Unpublished
        };

        let changed = set_visibility(&mut store, selected.iter().map(String::as_str), visibility)?;

        writeln!(out, "{changed} product(s) set to {visibility}")?;
    }

    for id in &args.request_delete {
        if !store.contains(id) {
            return Err(CliError::Usage(format!("unknown product {id}")));
        }

        state.request_delete(id);

        writeln!(out, "Delete requested for {id} (not applied)")?;
    }

    if args.delete {
        let removed = state.remove_selected(&mut store);
        let ids: Vec<&str> = removed.iter().map(Record::id).collect();

        writeln!(out, "Removed {} product(s): {}", removed.len(), ids.join(", "))?;
    }

    for id in &args.expand {
        if !state.toggle_expand(&store, id) {
            return Err(CliError::Usage(format!("{id} has no variants to expand")));
        }
    }

    let view = derive_view(&store, &criteria);

    *state.pagination_mut() = args.view.pagination(view.len());

    write_products(&mut out, state.pagination().slice(&view), &state, &store)?;
    write_page_footer(&mut out, state.pagination(), view.len(), state.selected_count())?;

    if store.edited_count() > 0 {
        writeln!(out, "{} product(s) edited (*)", store.edited_count())?;
    }

    Ok(())
}
