//! Recurring test constants

use chrono::{DateTime, Utc};
use rust_decimal_macros::dec;

use core_kernel::Currency;
use domain_ledger::Settings;

/// The currency most scenarios run in
pub fn cny() -> Currency {
    Currency::new("CNY").expect("CNY is a valid code")
}

/// Parses an RFC 3339 timestamp
pub fn instant(value: &str) -> DateTime<Utc> {
    value
        .parse()
        .unwrap_or_else(|_| panic!("invalid test timestamp: {}", value))
}

/// Ten percent annually, Singapore months - the canonical scenario settings
pub fn settings_cny() -> Settings {
    Settings::new(
        dec!(10),
        "Asia/Singapore".parse().expect("known timezone"),
    )
}
