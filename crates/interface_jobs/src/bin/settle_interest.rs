//! Allowance Ledger - Monthly Interest Settlement Job
//!
//! Settles pending interest months for every active account in a ledger
//! snapshot. Intended to be invoked by an external scheduler (cron or a
//! platform function), once a month or as often as desired - re-runs are
//! idempotent.
//!
//! # Usage
//!
//! ```bash
//! # Run against the default snapshot path
//! cargo run --bin settle-interest
//!
//! # Run with environment variables
//! JOBS_SNAPSHOT_PATH=/var/lib/ledger.json JOBS_LOG_LEVEL=debug cargo run --bin settle-interest
//! ```
//!
//! # Environment Variables
//!
//! * `JOBS_SNAPSHOT_PATH` - Ledger snapshot file (default: ledger.json)
//! * `JOBS_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)

use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use interface_jobs::{settle_snapshot, JobsConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = JobsConfig::from_env()?;
    init_tracing(&config.log_level);

    tracing::info!(snapshot = %config.snapshot_path, "starting interest settlement");

    let report = settle_snapshot(&config.snapshot_path, Utc::now()).await?;

    if report.accounts_failed > 0 {
        anyhow::bail!(
            "settlement finished with {} failed account(s)",
            report.accounts_failed
        );
    }
    Ok(())
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
