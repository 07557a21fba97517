//! Ledger domain errors
//!
//! Every precondition failure maps to a distinct kind so callers can render
//! localized messages; the detail strings here are diagnostics, not UI copy.
//! Business-rule failures are deterministic and must not be retried blindly.

use rust_decimal::Decimal;
use thiserror::Error;

use core_kernel::{AccountId, Currency, TransactionId};

use crate::ports::StoreError;
use crate::transaction::TransactionKind;

/// Errors that can occur in the ledger core
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Target account missing or soft-deleted
    #[error("account not found or inactive: {0}")]
    AccountInactive(AccountId),

    /// Non-positive amount
    #[error("amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    /// Withdrawal or transfer exceeds the current balance
    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        requested: Decimal,
        available: Decimal,
    },

    /// Transfer between accounts of different currency
    #[error("transfer currency mismatch: {from} vs {to}")]
    CurrencyMismatch { from: Currency, to: Currency },

    /// Transfer source equals target
    #[error("transfer source and target are the same account: {0}")]
    SameAccount(AccountId),

    /// Manual adjustment without an explanation
    #[error("a note is required for manual adjustments")]
    MissingNote,

    /// Transaction kind not allowed at this entry point
    #[error("transaction kind {0} cannot be created through this entry point")]
    UnsupportedType(TransactionKind),

    /// Void requested on an already-void transaction
    #[error("transaction is already void: {0}")]
    AlreadyVoid(TransactionId),

    /// Referenced transaction does not exist
    #[error("transaction not found: {0}")]
    NotFound(TransactionId),

    /// Failure in the persistence collaborator
    #[error(transparent)]
    Store(#[from] StoreError),
}
