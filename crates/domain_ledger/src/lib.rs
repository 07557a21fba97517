//! Ledger Domain - Family Allowance Accounting Core
//!
//! This crate implements the accounting rules of the allowance ledger:
//! how transactions apply to accounts, how balances derive from the
//! transaction log, how paired transfers stay atomic, how monthly interest
//! settles exactly once per calendar month, and how records are voided
//! without rewriting history.
//!
//! # Invariants
//!
//! - Money is conserved: a transfer moves an amount between two accounts
//!   without creating or destroying value
//! - Balances never go negative through this crate's entry points
//! - A calendar month's interest settles at most once per account
//! - History is append-mostly: rows are never mutated except for the void
//!   flag, and never deleted
//!
//! The durable store is a collaborator behind the [`LedgerStore`] port;
//! this crate owns the rules, not the persistence.

pub mod account;
pub mod balance;
pub mod error;
pub mod interest;
pub mod locks;
pub mod ports;
pub mod service;
pub mod settings;
pub mod settlement;
pub mod transaction;

pub use account::{Account, Role, User};
pub use balance::{balance, balance_as_of};
pub use error::LedgerError;
pub use interest::{schedule_interest, InterestSchedule};
pub use ports::{LedgerStore, StoreError, TransactionFilter};
pub use service::Ledger;
pub use settings::Settings;
pub use settlement::{run_monthly_interest, SettlementReport};
pub use transaction::{NewTransaction, Transaction, TransactionKind};
