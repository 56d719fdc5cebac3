//! Finance
//!
//! Transactions, running balances and the payouts summary.

use std::fmt;

use jiff::Timestamp;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{
    criteria::{Filterable, contains_ignore_case},
    store::Record,
};

/// Kind of ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    /// Customer payment.
    Sale,
    /// Money returned to a customer.
    Refund,
    /// Transfer to the seller's bank account.
    Payout,
    /// Marketplace fee.
    Commission,
    /// Manual correction.
    Adjustment,
}

impl TransactionKind {
    /// Display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Sale => "sale",
            TransactionKind::Refund => "refund",
            TransactionKind::Payout => "payout",
            TransactionKind::Commission => "commission",
            TransactionKind::Adjustment => "adjustment",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Settlement status of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionStatus {
    /// Not yet settled; excluded from the balance.
    Pending,
    /// Settled.
    Completed,
    /// Never settled; excluded from the balance.
    Failed,
}

impl TransactionStatus {
    /// Display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TransactionStatus::Pending => "Pending",
            TransactionStatus::Completed => "Completed",
            TransactionStatus::Failed => "Failed",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors raised while computing balances or summaries.
#[derive(Debug, Error, PartialEq)]
pub enum FinanceError {
    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Ledger entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction<'a> {
    /// Transaction identifier.
    pub id: String,

    /// Signed amount; debits are negative.
    pub amount: Money<'a, Currency>,

    /// Kind of entry.
    pub kind: TransactionKind,

    /// Settlement status.
    pub status: TransactionStatus,

    /// When the entry was recorded.
    pub timestamp: Timestamp,

    /// Settled balance after this entry.
    pub balance: Money<'a, Currency>,
}

impl<'a> Transaction<'a> {
    /// Create an entry whose balance is not yet computed.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        amount: Money<'a, Currency>,
        kind: TransactionKind,
        status: TransactionStatus,
        timestamp: Timestamp,
    ) -> Self {
        Transaction {
            id: id.into(),
            amount,
            kind,
            status,
            timestamp,
            balance: Money::from_minor(0, amount.currency()),
        }
    }

    /// Whether the entry moves the settled balance.
    pub fn is_settled(&self) -> bool {
        self.status == TransactionStatus::Completed
    }
}

impl Record for Transaction<'_> {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Filterable for Transaction<'_> {
    fn matches_text(&self, needle: &str) -> bool {
        contains_ignore_case(&self.id, needle) || contains_ignore_case(self.kind.label(), needle)
    }

    fn category(&self) -> Option<&str> {
        Some(self.kind.label())
    }

    fn status_label(&self) -> Option<&str> {
        Some(self.status.label())
    }

    fn timestamp(&self) -> Option<Timestamp> {
        Some(self.timestamp)
    }

    fn value_minor(&self) -> Option<i64> {
        Some(self.amount.to_minor_units())
    }
}

/// Order entries chronologically and fill in running balances.
///
/// Entries with equal timestamps keep their input order. Only completed
/// entries move the balance.
///
/// # Errors
///
/// Returns a `FinanceError` if an entry is in another currency than the
/// opening balance.
pub fn with_running_balance<'a>(
    opening: Money<'a, Currency>,
    transactions: impl Into<Vec<Transaction<'a>>>,
) -> Result<Vec<Transaction<'a>>, FinanceError> {
    let mut transactions = transactions.into();

    transactions.sort_by_key(|transaction| transaction.timestamp);

    transactions
        .iter_mut()
        .try_fold(opening, |balance, transaction| {
            let next = if transaction.is_settled() {
                balance.add(transaction.amount)?
            } else {
                balance
            };

            transaction.balance = next;

            Ok::<_, FinanceError>(next)
        })?;

    Ok(transactions)
}

/// Totals shown on the finance overview.
#[derive(Debug, Clone, PartialEq)]
pub struct FinanceSummary<'a> {
    /// Completed sales.
    pub gross_sales: Money<'a, Currency>,

    /// Completed refunds (negative).
    pub refunds: Money<'a, Currency>,

    /// Completed commissions (negative).
    pub commissions: Money<'a, Currency>,

    /// Completed adjustments.
    pub adjustments: Money<'a, Currency>,

    /// Completed payouts (negative).
    pub payouts: Money<'a, Currency>,

    /// Sales less refunds, commissions and adjustments.
    pub net_earnings: Money<'a, Currency>,

    /// Net earnings not yet paid out.
    pub available_balance: Money<'a, Currency>,

    /// Sum of pending entries.
    pub pending: Money<'a, Currency>,
}

impl<'a> FinanceSummary<'a> {
    /// Summarise a set of entries.
    ///
    /// # Errors
    ///
    /// Returns a `FinanceError` if an entry is in another currency.
    pub fn from_transactions<'t>(
        currency: &'a Currency,
        transactions: impl IntoIterator<Item = &'t Transaction<'a>>,
    ) -> Result<Self, FinanceError>
    where
        'a: 't,
    {
        let zero = Money::from_minor(0, currency);
        let mut summary = FinanceSummary {
            gross_sales: zero,
            refunds: zero,
            commissions: zero,
            adjustments: zero,
            payouts: zero,
            net_earnings: zero,
            available_balance: zero,
            pending: zero,
        };

        for transaction in transactions {
            match transaction.status {
                TransactionStatus::Failed => continue,
                TransactionStatus::Pending => {
                    summary.pending = summary.pending.add(transaction.amount)?;
                    continue;
                }
                TransactionStatus::Completed => {}
            }

            let bucket = match transaction.kind {
                TransactionKind::Sale => &mut summary.gross_sales,
                TransactionKind::Refund => &mut summary.refunds,
                TransactionKind::Commission => &mut summary.commissions,
                TransactionKind::Adjustment => &mut summary.adjustments,
                TransactionKind::Payout => &mut summary.payouts,
            };

            *bucket = bucket.add(transaction.amount)?;
        }

        summary.net_earnings = summary
            .gross_sales
            .add(summary.refunds)?
            .add(summary.commissions)?
            .add(summary.adjustments)?;
        summary.available_balance = summary.net_earnings.add(summary.payouts)?;

        Ok(summary)
    }
}
