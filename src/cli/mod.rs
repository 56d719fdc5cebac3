//! Command-line configuration and dispatch.

use std::io;

use clap::{Args, Parser, Subcommand};
use jiff::{Timestamp, civil::Date, tz::TimeZone};
use thiserror::Error;

use sellerdesk::{
    criteria::{Criteria, DateRange, SortDirection, SortKey},
    finance::FinanceError,
    fixtures::FixtureError,
    generators::GenerateError,
    orders::TransitionError,
    pagination::{DEFAULT_PAGE_SIZE, Pagination},
    render::RenderError,
    store::StoreError,
    table::EditError,
    theme::PreferencesError,
};

pub mod finance;
pub mod logging;
pub mod orders;
pub mod products;
pub mod theme;

/// Seller dashboard tables in the terminal
#[derive(Debug, Parser)]
#[command(name = "sellerdesk", about = "Seller dashboard tables in the terminal", long_about = None)]
pub struct Cli {
    /// Logging settings
    #[command(flatten)]
    pub logging: logging::LoggingConfig,

    /// Dashboard view to show
    #[command(subcommand)]
    pub command: Command,
}

/// Dashboard views.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Product catalog with inline stock edits
    Products(products::ProductsArgs),

    /// Orders and fulfilment actions
    Orders(orders::OrdersArgs),

    /// Payout ledger and totals
    Finance(finance::FinanceArgs),

    /// Resolve or store the colour theme
    Theme(theme::ThemeArgs),
}

/// Errors surfaced by a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid flag combination or value.
    #[error("{0}")]
    Usage(String),

    /// Date arithmetic failed.
    #[error("Invalid date: {0}")]
    Time(#[from] jiff::Error),

    /// Record lookup failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A stock edit was rejected.
    #[error(transparent)]
    Edit(#[from] EditError),

    /// An order action was rejected.
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// Ledger computation failed.
    #[error(transparent)]
    Finance(#[from] FinanceError),

    /// A fixture could not be loaded.
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    /// Mock data generation failed.
    #[error(transparent)]
    Generate(#[from] GenerateError),

    /// The preferences file could not be used.
    #[error(transparent)]
    Preferences(#[from] PreferencesError),

    /// Output failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl From<io::Error> for CliError {
    fn from(error: io::Error) -> Self {
        CliError::Render(RenderError::Io(error))
    }
}

impl Cli {
    /// Load `.env`, then parse arguments and environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments cannot be parsed.
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Run the selected command, writing tables to `out`.
    ///
    /// # Errors
    ///
    /// Returns a `CliError` if the command fails.
    pub fn run(self, out: impl io::Write) -> Result<(), CliError> {
        match self.command {
            Command::Products(args) => products::run(&args, out),
            Command::Orders(args) => orders::run(&args, out),
            Command::Finance(args) => finance::run(&args, out),
            Command::Theme(args) => theme::run(&args, out),
        }
    }
}

/// Data source, filter, sort and paging flags shared by the table views.
#[derive(Debug, Args)]
pub struct ViewArgs {
    /// Seed for the mock data generator
    #[arg(long, env = "SELLERDESK_SEED", default_value_t = 7)]
    pub seed: u64,

    /// Number of records to generate
    #[arg(short = 'n', long, default_value_t = 40)]
    pub count: usize,

    /// Free-text search
    #[arg(short = 'q', long, default_value = "")]
    pub search: String,

    /// Category filter ("All" for no filter)
    #[arg(short, long, default_value = "All")]
    pub category: String,

    /// Status filter ("All" for no filter)
    #[arg(short, long, default_value = "All")]
    pub status: String,

    /// Earliest date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<Date>,

    /// Latest date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<Date>,

    /// Only the last N days before the data's reference time
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub last_days: Option<i64>,

    /// Sort key (id, title, price, stock, updated)
    #[arg(long)]
    pub sort: Option<SortKey>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Page to show, starting at 1
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,
}

impl ViewArgs {
    /// Criteria for the search, category, status, date and sort flags.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Time` if a date bound cannot be converted.
    pub fn criteria(&self, now: Timestamp) -> Result<Criteria, CliError> {
        let date_range = match self.last_days {
            Some(days) => DateRange::last_days(now, days),
            None => DateRange::new(
                self.from.map(start_of_day).transpose()?,
                self.to.map(end_of_day).transpose()?,
            ),
        };

        let criteria = Criteria::default()
            .with_search(self.search.as_str())
            .with_category(&self.category)
            .with_status(&self.status)
            .with_date_range(date_range);

        Ok(match self.sort {
            Some(key) => {
                let direction = if self.desc {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                };

                criteria.sorted_by(key, direction)
            }
            None => criteria,
        })
    }

    /// Pagination positioned on the requested page, clamped to `total` rows.
    pub fn pagination(&self, total: usize) -> Pagination {
        let mut pagination = Pagination::new(self.page_size);

        pagination.go_to(self.page.saturating_sub(1), total);

        pagination
    }
}

fn start_of_day(date: Date) -> Result<Timestamp, jiff::Error> {
    Ok(date.to_zoned(TimeZone::UTC)?.timestamp())
}

fn end_of_day(date: Date) -> Result<Timestamp, jiff::Error> {
    Ok(date
        .at(23, 59, 59, 999_999_999)
        .to_zoned(TimeZone::UTC)?
        .timestamp())
}
