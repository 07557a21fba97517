//! Test data builders

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{AccountId, Currency, SettlementMonth, TransactionId, UserId};
use domain_ledger::{Account, Transaction, TransactionKind};

use crate::fixtures::{cny, instant};

/// Builder for accounts with sensible defaults
pub struct AccountBuilder {
    id: AccountId,
    name: String,
    currency: Currency,
    owner_child_id: UserId,
    created_by: UserId,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl Default for AccountBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountBuilder {
    pub fn new() -> Self {
        Self {
            id: AccountId::new(),
            name: "零花钱".to_string(),
            currency: cny(),
            owner_child_id: UserId::new(),
            created_by: UserId::new(),
            is_active: true,
            created_at: instant("2024-01-01T00:00:00Z"),
        }
    }

    pub fn with_id(mut self, id: AccountId) -> Self {
        self.id = id;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_owner(mut self, owner: UserId) -> Self {
        self.owner_child_id = owner;
        self
    }

    pub fn with_creator(mut self, creator: UserId) -> Self {
        self.created_by = creator;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn build(self) -> Account {
        Account {
            id: self.id,
            name: self.name,
            currency: self.currency,
            owner_child_id: self.owner_child_id,
            created_by: self.created_by,
            is_active: self.is_active,
            created_at: self.created_at,
        }
    }
}

/// Builder for transaction rows with sensible defaults
pub struct TransactionBuilder {
    account_id: AccountId,
    kind: TransactionKind,
    amount: Decimal,
    currency: Currency,
    note: Option<String>,
    related_account_id: Option<AccountId>,
    created_by: UserId,
    created_at: DateTime<Utc>,
    interest_month: Option<SettlementMonth>,
    is_void: bool,
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self {
            account_id: AccountId::new(),
            kind: TransactionKind::Deposit,
            amount: dec!(50),
            currency: cny(),
            note: Some("initial".to_string()),
            related_account_id: None,
            created_by: UserId::new(),
            created_at: instant("2024-01-15T10:00:00Z"),
            interest_month: None,
            is_void: false,
        }
    }

    pub fn for_account(mut self, account: &Account) -> Self {
        self.account_id = account.id;
        self.currency = account.currency.clone();
        self
    }

    pub fn with_kind(mut self, kind: TransactionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn without_note(mut self) -> Self {
        self.note = None;
        self
    }

    pub fn with_created_at(mut self, at: &str) -> Self {
        self.created_at = instant(at);
        self
    }

    pub fn with_interest_month(mut self, month: SettlementMonth) -> Self {
        self.interest_month = Some(month);
        self
    }

    pub fn voided(mut self) -> Self {
        self.is_void = true;
        self
    }

    pub fn build(self) -> Transaction {
        Transaction {
            id: TransactionId::new(),
            account_id: self.account_id,
            kind: self.kind,
            amount: self.amount,
            currency: self.currency,
            note: self.note,
            related_account_id: self.related_account_id,
            created_by: self.created_by,
            created_at: self.created_at,
            interest_month: self.interest_month,
            is_void: self.is_void,
        }
    }
}
