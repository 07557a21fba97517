//! Transaction rows of the allowance ledger
//!
//! The transaction log is the system's source of truth for money movement.
//! Rows are created once and never mutated except for the void flag.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{AccountId, Currency, SettlementMonth, TransactionId, UserId};

/// Kind of ledger transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Manual credit by a parent
    Deposit,
    /// Manual debit by a parent
    Withdrawal,
    /// Incoming leg of a paired transfer
    TransferIn,
    /// Outgoing leg of a paired transfer
    TransferOut,
    /// Monthly interest settlement
    Interest,
}

impl TransactionKind {
    /// Sign this kind contributes to a balance: credits +1, debits -1
    pub fn signed_direction(&self) -> Decimal {
        match self {
            TransactionKind::Withdrawal | TransactionKind::TransferOut => -Decimal::ONE,
            _ => Decimal::ONE,
        }
    }

    /// Whether this kind may be created through the manual-adjustment entry
    /// point (transfer legs and interest have their own)
    pub fn is_manual(&self) -> bool {
        matches!(self, TransactionKind::Deposit | TransactionKind::Withdrawal)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdrawal => "withdrawal",
            TransactionKind::TransferIn => "transfer_in",
            TransactionKind::TransferOut => "transfer_out",
            TransactionKind::Interest => "interest",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(TransactionKind::Deposit),
            "withdrawal" => Ok(TransactionKind::Withdrawal),
            "transfer_in" => Ok(TransactionKind::TransferIn),
            "transfer_out" => Ok(TransactionKind::TransferOut),
            "interest" => Ok(TransactionKind::Interest),
            _ => Err(format!("invalid transaction kind: {}", s)),
        }
    }
}

/// A recorded ledger transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,
    /// Owning account
    pub account_id: AccountId,
    /// Transaction kind
    pub kind: TransactionKind,
    /// Strictly positive amount, two decimal places
    pub amount: Decimal,
    /// Currency, equal to the owning account's at creation time
    pub currency: Currency,
    /// Explanation; required for manual adjustments, generated for
    /// transfer legs and interest
    pub note: Option<String>,
    /// Counterpart account of a transfer leg
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_account_id: Option<AccountId>,
    /// Acting user
    pub created_by: UserId,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Settled calendar month; interest rows only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_month: Option<SettlementMonth>,
    /// Soft-cancellation flag; voided rows stay in history but are
    /// excluded from balances
    #[serde(default)]
    pub is_void: bool,
}

impl Transaction {
    /// The amount with its balance sign applied (void status is ignored
    /// here; balance computation filters voided rows)
    pub fn signed_amount(&self) -> Decimal {
        self.kind.signed_direction() * self.amount
    }
}

/// Payload for inserting a transaction; the store assigns id and timestamp
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub account_id: AccountId,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub currency: Currency,
    pub note: Option<String>,
    pub related_account_id: Option<AccountId>,
    pub created_by: UserId,
    pub interest_month: Option<SettlementMonth>,
}
