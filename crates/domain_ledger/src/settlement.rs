//! Monthly interest settlement
//!
//! The externally-triggered sweep: per active account, ask the scheduler
//! which months are pending, compute each month's interest, and record it
//! through the ledger's at-most-once interest path.
//!
//! A month's interest is the monthly rate applied to the balance as of that
//! month's first instant. When that rounds to zero no row is inserted - a
//! strictly positive amount is a data-model invariant - and the month drops
//! off the schedule once any later month settles, because scheduling resumes
//! after the latest settled month.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::account::Account;
use crate::balance::balance_as_of;
use crate::error::LedgerError;
use crate::interest::schedule_interest;
use crate::ports::{LedgerStore, TransactionFilter};
use crate::service::Ledger;
use crate::transaction::Transaction;

/// Outcome of one settlement sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettlementReport {
    /// Active accounts visited
    pub accounts_processed: usize,
    /// Interest rows inserted
    pub months_recorded: usize,
    /// Accounts whose settlement failed
    pub accounts_failed: usize,
}

/// Settles all pending months for one account
///
/// Interest rows are attributed to the account's creator. Returns the rows
/// actually inserted.
pub async fn settle_account_interest<S: LedgerStore>(
    ledger: &Ledger<S>,
    account: &Account,
    now: DateTime<Utc>,
) -> Result<Vec<Transaction>, LedgerError> {
    let settings = ledger.store().get_settings().await?;
    let history = ledger
        .store()
        .list_transactions(account.id, TransactionFilter::full_history())
        .await?;

    let schedule = schedule_interest(&history, now, &settings);
    let mut recorded = Vec::new();

    for month in &schedule.months_to_settle {
        let opening = balance_as_of(&history, Some(month.first_instant(&settings.timezone)));
        let amount = settings.monthly_interest(opening);
        if amount <= Decimal::ZERO {
            debug!(account = %account.id, %month, %opening, "zero interest, nothing to record");
            continue;
        }

        let note = schedule
            .note_by_month
            .get(month)
            .cloned()
            .unwrap_or_else(|| crate::interest::interest_note(*month, settings.annual_rate));
        if let Some(row) = ledger
            .record_interest(account.id, *month, amount, &note, account.created_by)
            .await?
        {
            recorded.push(row);
        }
    }

    Ok(recorded)
}

/// Settles pending interest for every active account
///
/// Per-account failures are logged and counted, not propagated; one broken
/// account must not starve the rest of the sweep.
pub async fn run_monthly_interest<S: LedgerStore>(
    ledger: &Ledger<S>,
    now: DateTime<Utc>,
) -> Result<SettlementReport, LedgerError> {
    let accounts = ledger.store().list_accounts().await?;
    let mut report = SettlementReport::default();

    for account in accounts.iter().filter(|account| account.is_active) {
        report.accounts_processed += 1;
        match settle_account_interest(ledger, account, now).await {
            Ok(rows) => report.months_recorded += rows.len(),
            Err(err) => {
                warn!(account = %account.id, error = %err, "interest settlement failed");
                report.accounts_failed += 1;
            }
        }
    }

    debug!(
        accounts = report.accounts_processed,
        recorded = report.months_recorded,
        failed = report.accounts_failed,
        "monthly interest sweep finished"
    );
    Ok(report)
}
