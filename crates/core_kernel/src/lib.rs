//! Core Kernel - Foundational types for the allowance ledger
//!
//! This crate provides the building blocks used across the ledger crates:
//! - Monetary amounts with precise decimal arithmetic and open currency codes
//! - Calendar-month handling with timezone-aware bucketing
//! - Strongly-typed identifiers

pub mod identifiers;
pub mod money;
pub mod temporal;

pub use identifiers::{AccountId, TransactionId, UserId};
pub use money::{round_amount, Currency, MoneyError, Rate, MONEY_SCALE};
pub use temporal::{SettlementMonth, TemporalError, Timezone};
