//! Money primitives with precise decimal arithmetic
//!
//! Monetary amounts are `rust_decimal` values carried alongside an open,
//! ISO-like currency code. Amounts are stored with two decimal places;
//! floating point never enters the picture.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Decimal places carried by every monetary amount.
pub const MONEY_SCALE: u32 = 2;

/// Rounds an amount to the ledger's monetary scale.
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp(MONEY_SCALE)
}

/// Errors that can occur constructing money values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("invalid currency code: {0:?}")]
    InvalidCurrency(String),
}

/// An ISO-like currency code (e.g. `CNY`, `USD`)
///
/// Accounts are denominated in arbitrary uppercase codes rather than a closed
/// set, so the code is validated at construction: 2 to 6 ASCII uppercase
/// letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Creates a currency code, validating shape and case
    pub fn new(code: impl Into<String>) -> Result<Self, MoneyError> {
        let code = code.into();
        let valid = (2..=6).contains(&code.len())
            && code.chars().all(|c| c.is_ascii_uppercase());
        if !valid {
            return Err(MoneyError::InvalidCurrency(code));
        }
        Ok(Self(code))
    }

    /// Returns the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Currency {
    type Error = MoneyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> String {
        currency.0
    }
}

/// A percentage rate (e.g. an annual interest rate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    /// The rate as a decimal fraction (e.g. 0.05 for 5%)
    value: Decimal,
}

impl Rate {
    /// Creates a rate from a decimal fraction (e.g. 0.05 for 5%)
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Creates a rate from a percentage (e.g. 5 for 5%)
    pub fn from_percentage(percentage: Decimal) -> Self {
        Self {
            value: percentage / dec!(100),
        }
    }

    /// Returns the rate as a decimal fraction
    pub fn as_decimal(&self) -> Decimal {
        self.value
    }

    /// Returns the rate as a percentage
    pub fn as_percentage(&self) -> Decimal {
        self.value * dec!(100)
    }

    /// Derives the monthly rate from an annual one
    pub fn monthly(&self) -> Rate {
        Self {
            value: self.value / dec!(12),
        }
    }

    /// Applies this rate to an amount
    pub fn apply(&self, amount: Decimal) -> Decimal {
        amount * self.value
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_accepts_uppercase_codes() {
        let cny = Currency::new("CNY").unwrap();
        assert_eq!(cny.as_str(), "CNY");
    }

    #[test]
    fn currency_rejects_lowercase_and_junk() {
        assert!(Currency::new("cny").is_err());
        assert!(Currency::new("C").is_err());
        assert!(Currency::new("TOOLONGCODE").is_err());
        assert!(Currency::new("US1").is_err());
    }

    #[test]
    fn currency_round_trips_through_serde() {
        let cny = Currency::new("CNY").unwrap();
        let json = serde_json::to_string(&cny).unwrap();
        assert_eq!(json, "\"CNY\"");
        let back: Currency = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cny);
    }

    #[test]
    fn round_amount_uses_two_places() {
        assert_eq!(round_amount(dec!(10.006)), dec!(10.01));
        assert_eq!(round_amount(dec!(10.004)), dec!(10.00));
        assert_eq!(round_amount(dec!(10)), dec!(10));
    }

    #[test]
    fn rate_monthly_derivation() {
        let annual = Rate::from_percentage(dec!(12));
        assert_eq!(annual.monthly().as_decimal(), dec!(0.01));
    }

    #[test]
    fn rate_applies_to_amount() {
        let rate = Rate::from_percentage(dec!(10)).monthly();
        let interest = round_amount(rate.apply(dec!(1200)));
        assert_eq!(interest, dec!(10.00));
    }
}
