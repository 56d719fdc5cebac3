//! `sellerdesk finance`

use std::io;

use clap::Args;
use rusty_money::Money;

use sellerdesk::{
    finance::{FinanceSummary, with_running_balance},
    generators::MockData,
    pipeline::derive_view,
    render::{write_finance_summary, write_page_footer, write_transactions},
    store::RecordStore,
};

use super::{CliError, ViewArgs};

/// Ledger flags.
#[derive(Debug, Args)]
pub struct FinanceArgs {
    /// Data source, filters and paging. `--category` filters by entry type.
    #[command(flatten)]
    pub view: ViewArgs,

    /// Opening balance in minor units
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub opening_balance: i64,
}

/// Run the finance view. Totals cover the filtered entries, not just the shown page.
///
/// # Errors
///
/// Returns a `CliError` if generation, balance computation or output fails.
pub fn run(args: &FinanceArgs, mut out: impl io::Write) -> Result<(), CliError> {
    let mut data = MockData::new(args.view.seed);
    let currency = data.currency();
    let entries = with_running_balance(
        Money::from_minor(args.opening_balance, currency),
        data.transactions(args.view.count)?,
    )?;
    let store = RecordStore::with_records(entries)?;

    let view = derive_view(&store, &args.view.criteria(data.now())?);
    let pagination = args.view.pagination(view.len());

    write_finance_summary(
        &mut out,
        &FinanceSummary::from_transactions(currency, view.iter().copied())?,
    )?;
    write_transactions(&mut out, pagination.slice(&view))?;
    write_page_footer(&mut out, &pagination, view.len(), 0)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use testresult::TestResult;

    use super::*;
    use crate::cli::{Cli, Command};

    #[test]
    fn category_filters_by_entry_type() -> TestResult {
        let cli = Cli::try_parse_from([
            "sellerdesk",
            "finance",
            "--category",
            "payout",
            "--page-size",
            "100",
        ])?;

        let Command::Finance(args) = cli.command else {
            return Err("expected finance".into());
        };

        let mut out = Vec::new();
        run(&args, &mut out)?;
        let output = String::from_utf8(out)?;

        assert!(output.contains("Gross sales:"));
        assert!(!output.contains(" sale "));
        assert!(!output.contains("commission"));

        Ok(())
    }

    #[test]
    fn negative_opening_balance_parses() -> TestResult {
        let cli = Cli::try_parse_from(["sellerdesk", "finance", "--opening-balance", "-500"])?;

        let Command::Finance(args) = cli.command else {
            return Err("expected finance".into());
        };

        assert_eq!(args.opening_balance, -500);

        Ok(())
    }
}
