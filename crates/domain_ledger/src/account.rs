//! Accounts and the users who own them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AccountId, Currency, UserId};

/// Role of an application user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Manages accounts and records adjustments
    Parent,
    /// Owns accounts; read-only from the ledger's point of view
    Child,
}

/// An application user referenced by accounts and transactions
///
/// Only the identity and display name matter to the ledger; credentials and
/// sessions are a caller concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub role: Role,
}

impl User {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            role,
        }
    }
}

/// A named, currency-denominated bucket owned by a child
///
/// The balance is not stored here; it derives from the transaction log.
/// Inactive accounts reject all new transactions but keep their history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,
    /// Display name (e.g. "压岁钱")
    pub name: String,
    /// Currency every transaction on this account must match
    pub currency: Currency,
    /// The beneficiary child
    pub owner_child_id: UserId,
    /// The parent who created the account
    pub created_by: UserId,
    /// Soft-delete flag
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Creates an active account
    pub fn new(
        name: impl Into<String>,
        currency: Currency,
        owner_child_id: UserId,
        created_by: UserId,
    ) -> Self {
        Self {
            id: AccountId::new(),
            name: name.into(),
            currency,
            owner_child_id,
            created_by,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    /// Soft-deletes the account; history is kept, new transactions rejected
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accounts_are_active() {
        let parent = User::new("妈妈", Role::Parent);
        let child = User::new("小明", Role::Child);
        let account = Account::new(
            "零花钱",
            Currency::new("CNY").unwrap(),
            child.id,
            parent.id,
        );
        assert!(account.is_active);
        assert_eq!(account.currency.as_str(), "CNY");
    }

    #[test]
    fn deactivate_flips_the_flag_only() {
        let parent = User::new("爸爸", Role::Parent);
        let child = User::new("小红", Role::Child);
        let mut account = Account::new(
            "教育金",
            Currency::new("USD").unwrap(),
            child.id,
            parent.id,
        );
        let id = account.id;
        account.deactivate();
        assert!(!account.is_active);
        assert_eq!(account.id, id);
    }
}
