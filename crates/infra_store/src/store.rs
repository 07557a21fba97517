//! Lock-guarded in-memory tables implementing the ledger's store port

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use core_kernel::{AccountId, TransactionId, UserId};
use domain_ledger::{
    Account, LedgerStore, NewTransaction, Settings, StoreError, Transaction, TransactionFilter,
    User,
};

fn poisoned(_: impl std::fmt::Debug) -> StoreError {
    StoreError::Unavailable("store lock poisoned".to_string())
}

/// In-memory ledger store
///
/// Tables are guarded by independent read-write locks; the transaction log
/// is a single insertion-ordered vector, so a batch insert under one write
/// guard commits all rows or none - nothing partial is ever observable.
#[derive(Debug)]
pub struct MemoryStore {
    accounts: RwLock<HashMap<AccountId, Account>>,
    users: RwLock<HashMap<UserId, User>>,
    settings: RwLock<Settings>,
    transactions: RwLock<Vec<Transaction>>,
}

impl MemoryStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            users: RwLock::new(HashMap::new()),
            settings: RwLock::new(settings),
            transactions: RwLock::new(Vec::new()),
        }
    }

    /// Inserts or replaces an account
    pub fn upsert_account(&self, account: Account) -> Result<(), StoreError> {
        let mut accounts = self.accounts.write().map_err(poisoned)?;
        accounts.insert(account.id, account);
        Ok(())
    }

    /// Inserts or replaces a user
    pub fn upsert_user(&self, user: User) -> Result<(), StoreError> {
        let mut users = self.users.write().map_err(poisoned)?;
        users.insert(user.id, user);
        Ok(())
    }

    /// Replaces the singleton settings record
    pub fn set_settings(&self, settings: Settings) -> Result<(), StoreError> {
        let mut slot = self.settings.write().map_err(poisoned)?;
        *slot = settings;
        Ok(())
    }

    /// Loads a fully-formed historical row, keeping its id and timestamp;
    /// snapshot restore and test seeding go through here
    pub fn load_transaction(&self, transaction: Transaction) -> Result<(), StoreError> {
        let mut log = self.transactions.write().map_err(poisoned)?;
        if log.iter().any(|existing| existing.id == transaction.id) {
            return Err(StoreError::Conflict(format!(
                "transaction {} already loaded",
                transaction.id
            )));
        }
        log.push(transaction);
        Ok(())
    }

    pub(crate) fn dump_settings(&self) -> Result<Settings, StoreError> {
        let settings = self.settings.read().map_err(poisoned)?;
        Ok(settings.clone())
    }

    pub(crate) fn dump_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let accounts = self.accounts.read().map_err(poisoned)?;
        let mut rows: Vec<Account> = accounts.values().cloned().collect();
        rows.sort_by_key(|account| (account.created_at, account.id));
        Ok(rows)
    }

    pub(crate) fn dump_users(&self) -> Result<Vec<User>, StoreError> {
        let users = self.users.read().map_err(poisoned)?;
        let mut rows: Vec<User> = users.values().cloned().collect();
        rows.sort_by_key(|user| user.id);
        Ok(rows)
    }

    pub(crate) fn dump_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        let log = self.transactions.read().map_err(poisoned)?;
        Ok(log.clone())
    }

    fn new_row(payload: NewTransaction, created_at: DateTime<Utc>) -> Transaction {
        Transaction {
            id: TransactionId::new_v7(),
            account_id: payload.account_id,
            kind: payload.kind,
            amount: payload.amount,
            currency: payload.currency,
            note: payload.note,
            related_account_id: payload.related_account_id,
            created_by: payload.created_by,
            created_at,
            interest_month: payload.interest_month,
            is_void: false,
        }
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.read().map_err(poisoned)?;
        Ok(accounts.get(&id).cloned())
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        self.dump_accounts()
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.get(&id).cloned())
    }

    async fn get_settings(&self) -> Result<Settings, StoreError> {
        let settings = self.settings.read().map_err(poisoned)?;
        Ok(settings.clone())
    }

    async fn list_transactions(
        &self,
        account_id: AccountId,
        filter: TransactionFilter,
    ) -> Result<Vec<Transaction>, StoreError> {
        let log = self.transactions.read().map_err(poisoned)?;
        let mut rows: Vec<Transaction> = log
            .iter()
            .filter(|txn| txn.account_id == account_id)
            .filter(|txn| filter.include_void || !txn.is_void)
            .filter(|txn| filter.until.map_or(true, |cutoff| txn.created_at <= cutoff))
            .cloned()
            .collect();
        // Seeded history may arrive out of order; queries promise ascending
        // created_at. The sort is stable, so same-instant rows keep
        // insertion order.
        rows.sort_by_key(|txn| txn.created_at);
        Ok(rows)
    }

    async fn find_transaction(
        &self,
        id: TransactionId,
    ) -> Result<Option<Transaction>, StoreError> {
        let log = self.transactions.read().map_err(poisoned)?;
        Ok(log.iter().find(|txn| txn.id == id).cloned())
    }

    async fn insert_transaction(&self, row: NewTransaction) -> Result<Transaction, StoreError> {
        let mut log = self.transactions.write().map_err(poisoned)?;
        let inserted = Self::new_row(row, Utc::now());
        log.push(inserted.clone());
        debug!(transaction = %inserted.id, account = %inserted.account_id, "inserted row");
        Ok(inserted)
    }

    async fn insert_transactions(
        &self,
        rows: Vec<NewTransaction>,
    ) -> Result<Vec<Transaction>, StoreError> {
        let mut log = self.transactions.write().map_err(poisoned)?;
        // One write guard and one timestamp for the whole batch: the rows
        // become visible together or, if anything above failed, not at all.
        let now = Utc::now();
        let inserted: Vec<Transaction> = rows
            .into_iter()
            .map(|row| Self::new_row(row, now))
            .collect();
        log.extend(inserted.iter().cloned());
        debug!(rows = inserted.len(), "inserted batch");
        Ok(inserted)
    }

    async fn set_transaction_void(&self, id: TransactionId) -> Result<Transaction, StoreError> {
        let mut log = self.transactions.write().map_err(poisoned)?;
        let row = log
            .iter_mut()
            .find(|txn| txn.id == id)
            .ok_or_else(|| StoreError::not_found("transaction", id))?;
        row.is_void = true;
        Ok(row.clone())
    }

    async fn balance_before(
        &self,
        account_id: AccountId,
        cutoff: DateTime<Utc>,
    ) -> Result<Decimal, StoreError> {
        let log = self.transactions.read().map_err(poisoned)?;
        Ok(log
            .iter()
            .filter(|txn| txn.account_id == account_id)
            .filter(|txn| !txn.is_void)
            .filter(|txn| txn.created_at < cutoff)
            .map(Transaction::signed_amount)
            .sum())
    }
}
