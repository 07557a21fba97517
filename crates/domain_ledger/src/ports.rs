//! Persistence port
//!
//! The ledger core expresses its storage needs as logical operations on this
//! trait; adapters own connections, query construction, and retries for
//! transient failures. Business-rule errors never originate here.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use core_kernel::{AccountId, TransactionId, UserId};

use crate::account::{Account, User};
use crate::settings::Settings;
use crate::transaction::{NewTransaction, Transaction};

/// Errors surfaced by a store adapter
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced row does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The write conflicts with existing data
    #[error("conflict: {0}")]
    Conflict(String),

    /// The underlying store cannot be reached or is not operational
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A persisted record could not be decoded
    #[error("corrupted record: {0}")]
    Corrupted(String),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Filter for transaction queries
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionFilter {
    /// Include voided rows (history views); balance reads leave this off
    pub include_void: bool,
    /// Only rows with `created_at <= until`
    pub until: Option<DateTime<Utc>>,
}

impl TransactionFilter {
    /// Everything, voided rows included - the settlement scan uses this
    pub fn full_history() -> Self {
        Self {
            include_void: true,
            until: None,
        }
    }
}

/// Port to the durable transactional store
///
/// Rows returned by `list_transactions` are ordered by `created_at`
/// ascending. `insert_transactions` is atomic: either every row in the
/// batch becomes visible or none does.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError>;

    async fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    async fn get_settings(&self) -> Result<Settings, StoreError>;

    async fn list_transactions(
        &self,
        account_id: AccountId,
        filter: TransactionFilter,
    ) -> Result<Vec<Transaction>, StoreError>;

    async fn find_transaction(&self, id: TransactionId)
        -> Result<Option<Transaction>, StoreError>;

    async fn insert_transaction(&self, row: NewTransaction) -> Result<Transaction, StoreError>;

    /// Atomic batch insert; used for paired transfer legs
    async fn insert_transactions(
        &self,
        rows: Vec<NewTransaction>,
    ) -> Result<Vec<Transaction>, StoreError>;

    /// Flips the void flag on; the only mutation the ledger ever asks for
    async fn set_transaction_void(&self, id: TransactionId) -> Result<Transaction, StoreError>;

    /// Balance of non-void rows strictly before `cutoff`; the base balance
    /// for windowed history views
    async fn balance_before(
        &self,
        account_id: AccountId,
        cutoff: DateTime<Utc>,
    ) -> Result<Decimal, StoreError>;
}
