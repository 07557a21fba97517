//! Scheduled jobs for the allowance ledger
//!
//! The engine never schedules itself; an external trigger (cron, a platform
//! function) invokes these jobs. Currently there is one: the monthly
//! interest settlement sweep over a file-backed ledger snapshot.

pub mod config;
pub mod runner;

pub use config::JobsConfig;
pub use runner::settle_snapshot;
