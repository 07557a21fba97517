//! Balance derivation
//!
//! A balance is never stored as source of truth; it is the signed sum over
//! an account's non-void transactions and must always be recomputable from
//! the log alone.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::transaction::Transaction;

/// Current balance over the given transaction slice
pub fn balance(transactions: &[Transaction]) -> Decimal {
    balance_as_of(transactions, None)
}

/// Balance considering only rows with `created_at <= cutoff`
///
/// Voided rows contribute nothing regardless of cutoff. An empty slice sums
/// to zero. Pure over its inputs.
pub fn balance_as_of(transactions: &[Transaction], cutoff: Option<DateTime<Utc>>) -> Decimal {
    transactions
        .iter()
        .filter(|txn| !txn.is_void)
        .filter(|txn| cutoff.map_or(true, |c| txn.created_at <= c))
        .map(Transaction::signed_amount)
        .sum()
}
