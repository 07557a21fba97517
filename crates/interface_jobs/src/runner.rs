//! Snapshot-backed settlement run

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use tracing::info;

use domain_ledger::{run_monthly_interest, Ledger, SettlementReport};
use infra_store::{LedgerSnapshot, MemoryStore};

/// Loads the snapshot at `path`, settles pending interest for every active
/// account as of `now`, and writes the updated snapshot back in place.
pub async fn settle_snapshot(
    path: impl AsRef<Path>,
    now: DateTime<Utc>,
) -> anyhow::Result<SettlementReport> {
    let path = path.as_ref();
    let snapshot =
        LedgerSnapshot::read_from(path).with_context(|| format!("loading {}", path.display()))?;

    let store = Arc::new(MemoryStore::from_snapshot(snapshot).context("restoring ledger tables")?);
    let ledger = Ledger::new(store.clone());

    let report = run_monthly_interest(&ledger, now)
        .await
        .context("running monthly interest")?;

    let updated = store.snapshot().context("capturing updated snapshot")?;
    updated
        .write_to(path)
        .with_context(|| format!("writing {}", path.display()))?;

    info!(
        accounts = report.accounts_processed,
        recorded = report.months_recorded,
        failed = report.accounts_failed,
        "monthly interest settlement complete"
    );
    Ok(report)
}
