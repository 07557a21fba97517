//! Interest settlement scheduling
//!
//! Decides which calendar months still need an interest row for an account
//! and generates the note text for each. The money math lives with the
//! settlement service; this module is pure month selection.
//!
//! A month counts as settled if any `interest` row claims it. Historic rows
//! predate the structured month tag, so the claim resolves in three steps:
//! the `interest_month` field if present, else the legacy note text
//! (`2024年2月结息…`), else the month the row itself was created in.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use core_kernel::{SettlementMonth, Timezone};

use crate::settings::Settings;
use crate::transaction::{Transaction, TransactionKind};

static LEGACY_NOTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})年(\d{1,2})月结息").expect("legacy interest note pattern compiles")
});

/// Parses the settled month out of a legacy-format interest note
pub fn parse_legacy_note(note: &str) -> Option<SettlementMonth> {
    let captures = LEGACY_NOTE.captures(note)?;
    let year = captures.get(1)?.as_str().parse().ok()?;
    let month = captures.get(2)?.as_str().parse().ok()?;
    SettlementMonth::new(year, month).ok()
}

/// The month an interest row settles; `None` for other kinds
pub fn settled_month(txn: &Transaction, tz: &Timezone) -> Option<SettlementMonth> {
    if txn.kind != TransactionKind::Interest {
        return None;
    }
    txn.interest_month
        .or_else(|| txn.note.as_deref().and_then(parse_legacy_note))
        .or_else(|| Some(SettlementMonth::of_instant(txn.created_at, tz)))
}

/// All months the given rows already settle
pub fn settled_months(transactions: &[Transaction], tz: &Timezone) -> BTreeSet<SettlementMonth> {
    transactions
        .iter()
        .filter_map(|txn| settled_month(txn, tz))
        .collect()
}

/// Note text for a month's interest row: `2024年2月结息，利率 10%`
pub fn interest_note(month: SettlementMonth, annual_rate: Decimal) -> String {
    format!(
        "{}年{}月结息，利率 {}%",
        month.year(),
        month.month(),
        annual_rate.normalize()
    )
}

/// Outcome of scheduling: which months to settle, with their note text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterestSchedule {
    /// First candidate month; `None` when the account has no history
    pub start_month: Option<SettlementMonth>,
    /// Unsettled months in chronological order, up to and including the
    /// month before the current one
    pub months_to_settle: Vec<SettlementMonth>,
    /// Generated note per month
    pub note_by_month: BTreeMap<SettlementMonth, String>,
}

impl InterestSchedule {
    fn empty() -> Self {
        Self {
            start_month: None,
            months_to_settle: Vec::new(),
            note_by_month: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.months_to_settle.is_empty()
    }
}

/// Computes the months needing interest for one account
///
/// Walks from the month after the latest settled month (or the month of the
/// earliest transaction, if none is settled) up to the month before `now` in
/// the configured timezone. The current in-progress month is never settled.
/// Already-settled months are skipped, which is what makes re-runs and
/// concurrent invocations idempotent.
///
/// Pure and total over valid inputs; no error conditions.
pub fn schedule_interest(
    transactions: &[Transaction],
    now: DateTime<Utc>,
    settings: &Settings,
) -> InterestSchedule {
    let tz = &settings.timezone;
    let Some(earliest) = transactions.iter().min_by_key(|txn| txn.created_at) else {
        return InterestSchedule::empty();
    };
    let first_month = SettlementMonth::of_instant(earliest.created_at, tz);

    let settled = settled_months(transactions, tz);

    let start_month = settled
        .iter()
        .next_back()
        .map(SettlementMonth::succ)
        .unwrap_or(first_month);

    // The month before the current one; the in-progress month never settles.
    let horizon = SettlementMonth::of_instant(now, tz).pred();

    let mut months_to_settle = Vec::new();
    let mut note_by_month = BTreeMap::new();
    let mut cursor = start_month;
    while cursor <= horizon {
        if !settled.contains(&cursor) {
            months_to_settle.push(cursor);
            note_by_month.insert(cursor, interest_note(cursor, settings.annual_rate));
        }
        cursor = cursor.succ();
    }

    InterestSchedule {
        start_month: Some(start_month),
        months_to_settle,
        note_by_month,
    }
}
