//! JSON snapshots of the whole ledger
//!
//! The settlement job runs against a file-backed snapshot: load, settle,
//! write back. Every field of every row survives the round trip, including
//! void flags and interest month tags.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use domain_ledger::{Account, Settings, StoreError, Transaction, User};

use crate::error::SnapshotError;
use crate::store::MemoryStore;

/// A serializable image of the ledger's tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub settings: Settings,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl LedgerSnapshot {
    /// Reads a snapshot from a JSON file
    pub fn read_from(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Writes the snapshot as pretty-printed JSON
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

impl MemoryStore {
    /// Builds a store from a snapshot image
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Result<Self, StoreError> {
        let store = MemoryStore::new(snapshot.settings);
        for user in snapshot.users {
            store.upsert_user(user)?;
        }
        for account in snapshot.accounts {
            store.upsert_account(account)?;
        }
        for transaction in snapshot.transactions {
            store.load_transaction(transaction)?;
        }
        Ok(store)
    }

    /// Captures the current tables as a snapshot image
    pub fn snapshot(&self) -> Result<LedgerSnapshot, StoreError> {
        Ok(LedgerSnapshot {
            settings: self.dump_settings()?,
            users: self.dump_users()?,
            accounts: self.dump_accounts()?,
            transactions: self.dump_transactions()?,
        })
    }
}
