//! Ledger-wide settings

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{round_amount, Rate, Timezone};

/// Singleton configuration for interest accrual
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Annual interest rate in percent (e.g. 5 means 5%/year)
    pub annual_rate: Decimal,
    /// IANA zone used to bucket transactions into calendar months
    pub timezone: Timezone,
}

impl Settings {
    pub fn new(annual_rate: Decimal, timezone: Timezone) -> Self {
        Self {
            annual_rate,
            timezone,
        }
    }

    /// Monthly rate as a decimal fraction: `annual_rate / 12 / 100`
    pub fn monthly_rate(&self) -> Decimal {
        Rate::from_percentage(self.annual_rate).monthly().as_decimal()
    }

    /// One month of interest on the given balance, at monetary scale
    pub fn monthly_interest(&self, balance: Decimal) -> Decimal {
        round_amount(Rate::from_percentage(self.annual_rate).monthly().apply(balance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn monthly_rate_divides_percent_by_twelve() {
        let settings = Settings::new(dec!(12), Timezone::default());
        assert_eq!(settings.monthly_rate(), dec!(0.01));
    }

    #[test]
    fn monthly_interest_rounds_to_cents() {
        let settings = Settings::new(dec!(10), Timezone::default());
        // 50 * 10% / 12 = 0.41666... -> 0.42
        assert_eq!(settings.monthly_interest(dec!(50)), dec!(0.42));
    }

    #[test]
    fn settings_deserialize_from_snapshot_shape() {
        let settings: Settings = serde_json::from_str(
            r#"{"annual_rate": 5, "timezone": "Asia/Shanghai"}"#,
        )
        .unwrap();
        assert_eq!(settings.annual_rate, dec!(5));
        assert_eq!(settings.timezone.name(), "Asia/Shanghai");
    }
}
