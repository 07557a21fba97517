//! Ledger service
//!
//! The mutating entry points of the core: manual adjustments, paired
//! transfers, interest recording, and voiding. Every balance check and the
//! insert it guards run inside the owning account's critical section, so
//! concurrent callers cannot jointly overdraw an account or settle the same
//! month twice.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info};

use core_kernel::{round_amount, AccountId, SettlementMonth, TransactionId, UserId};

use crate::account::Account;
use crate::balance::balance;
use crate::error::LedgerError;
use crate::interest::settled_months;
use crate::locks::AccountLocks;
use crate::ports::{LedgerStore, StoreError, TransactionFilter};
use crate::transaction::{NewTransaction, Transaction, TransactionKind};

/// Note suffix for a transfer without free text
const EMPTY_TRANSFER_NOTE: &str = " （无备注）";

/// The ledger's mutating surface over a store
pub struct Ledger<S> {
    store: Arc<S>,
    locks: AccountLocks,
}

impl<S: LedgerStore> Ledger<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            locks: AccountLocks::new(),
        }
    }

    /// The underlying store collaborator
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Records a manual deposit or withdrawal
    ///
    /// Preconditions, first failure wins: account active; positive amount;
    /// manual kind; sufficient balance for withdrawals; non-empty note.
    pub async fn apply_transaction(
        &self,
        account_id: AccountId,
        kind: TransactionKind,
        amount: Decimal,
        note: &str,
        actor: UserId,
    ) -> Result<Transaction, LedgerError> {
        let _guard = self.locks.lock(account_id).await;

        let account = self.active_account(account_id).await?;
        let amount = positive_amount(amount)?;
        if !kind.is_manual() {
            return Err(LedgerError::UnsupportedType(kind));
        }
        if kind == TransactionKind::Withdrawal {
            self.check_sufficient(account_id, amount).await?;
        }
        let note = note.trim();
        if note.is_empty() {
            return Err(LedgerError::MissingNote);
        }

        let row = self
            .store
            .insert_transaction(NewTransaction {
                account_id,
                kind,
                amount,
                currency: account.currency.clone(),
                note: Some(note.to_string()),
                related_account_id: None,
                created_by: actor,
                interest_month: None,
            })
            .await?;

        debug!(account = %account_id, %kind, %amount, actor = %actor, "recorded manual transaction");
        Ok(row)
    }

    /// Moves an amount between two same-currency accounts as one unit
    ///
    /// Creates exactly two rows - a `transfer_out` on the source and a
    /// `transfer_in` on the target - pointing at each other through
    /// `related_account_id`, committed atomically with a shared timestamp.
    pub async fn transfer(
        &self,
        source_id: AccountId,
        target_id: AccountId,
        amount: Decimal,
        note: &str,
        actor: UserId,
    ) -> Result<(Transaction, Transaction), LedgerError> {
        let _guards = self.locks.lock_pair(source_id, target_id).await;

        let source = self.active_account(source_id).await?;
        let target = self.active_account(target_id).await?;
        if source_id == target_id {
            return Err(LedgerError::SameAccount(source_id));
        }
        if source.currency != target.currency {
            return Err(LedgerError::CurrencyMismatch {
                from: source.currency.clone(),
                to: target.currency.clone(),
            });
        }
        let amount = positive_amount(amount)?;
        self.check_sufficient(source_id, amount).await?;

        let suffix = transfer_note_suffix(note);
        let source_owner = self.owner_name(&source).await?;
        let target_owner = self.owner_name(&target).await?;

        let rows = vec![
            NewTransaction {
                account_id: source_id,
                kind: TransactionKind::TransferOut,
                amount,
                currency: source.currency.clone(),
                note: Some(format!("转出至 {} {}{}", target_owner, target.name, suffix)),
                related_account_id: Some(target_id),
                created_by: actor,
                interest_month: None,
            },
            NewTransaction {
                account_id: target_id,
                kind: TransactionKind::TransferIn,
                amount,
                currency: target.currency.clone(),
                note: Some(format!("来自 {} {}{}", source_owner, source.name, suffix)),
                related_account_id: Some(source_id),
                created_by: actor,
                interest_month: None,
            },
        ];

        let mut inserted = self.store.insert_transactions(rows).await?.into_iter();
        let (outgoing, incoming) = match (inserted.next(), inserted.next()) {
            (Some(out), Some(inc)) => (out, inc),
            _ => {
                return Err(StoreError::Corrupted(
                    "batch insert returned fewer rows than submitted".to_string(),
                )
                .into())
            }
        };

        info!(
            source = %source_id,
            target = %target_id,
            %amount,
            actor = %actor,
            "transferred between accounts"
        );
        Ok((outgoing, incoming))
    }

    /// Records one month of interest, at most once per month
    ///
    /// Returns `Ok(None)` when the month is already settled - the
    /// check-month-then-insert sequence runs inside the account's critical
    /// section, so concurrent settlement runs insert exactly one row.
    /// The settled-month scan covers voided rows too: history, not balance,
    /// decides whether a month was settled.
    pub async fn record_interest(
        &self,
        account_id: AccountId,
        month: SettlementMonth,
        amount: Decimal,
        note: &str,
        actor: UserId,
    ) -> Result<Option<Transaction>, LedgerError> {
        let _guard = self.locks.lock(account_id).await;

        let account = self.active_account(account_id).await?;
        let amount = positive_amount(amount)?;

        let settings = self.store.get_settings().await?;
        let history = self
            .store
            .list_transactions(account_id, TransactionFilter::full_history())
            .await?;
        if settled_months(&history, &settings.timezone).contains(&month) {
            debug!(account = %account_id, %month, "month already settled, skipping");
            return Ok(None);
        }

        let row = self
            .store
            .insert_transaction(NewTransaction {
                account_id,
                kind: TransactionKind::Interest,
                amount,
                currency: account.currency.clone(),
                note: Some(note.to_string()),
                related_account_id: None,
                created_by: actor,
                interest_month: Some(month),
            })
            .await?;

        info!(account = %account_id, %month, %amount, "settled monthly interest");
        Ok(Some(row))
    }

    /// Soft-cancels a transaction without rewriting history
    ///
    /// Only the void flag changes; no compensating row is created. Voiding
    /// one leg of a transfer deliberately leaves the counterpart leg active -
    /// an administrator override that can break pair conservation, preserved
    /// as-is rather than cascading.
    pub async fn void_transaction(
        &self,
        transaction_id: TransactionId,
        actor: UserId,
    ) -> Result<Transaction, LedgerError> {
        let existing = self
            .store
            .find_transaction(transaction_id)
            .await?
            .ok_or(LedgerError::NotFound(transaction_id))?;

        let _guard = self.locks.lock(existing.account_id).await;

        // Re-read under the lock; a concurrent void may have won.
        let existing = self
            .store
            .find_transaction(transaction_id)
            .await?
            .ok_or(LedgerError::NotFound(transaction_id))?;
        if existing.is_void {
            return Err(LedgerError::AlreadyVoid(transaction_id));
        }

        let row = self.store.set_transaction_void(transaction_id).await?;
        info!(
            transaction = %transaction_id,
            account = %row.account_id,
            actor = %actor,
            "voided transaction"
        );
        Ok(row)
    }

    /// Current balance of non-void rows; call inside the account's lock
    pub async fn current_balance(&self, account_id: AccountId) -> Result<Decimal, LedgerError> {
        let transactions = self
            .store
            .list_transactions(account_id, TransactionFilter::default())
            .await?;
        Ok(balance(&transactions))
    }

    async fn active_account(&self, id: AccountId) -> Result<Account, LedgerError> {
        match self.store.get_account(id).await? {
            Some(account) if account.is_active => Ok(account),
            _ => Err(LedgerError::AccountInactive(id)),
        }
    }

    async fn check_sufficient(
        &self,
        account_id: AccountId,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        let available = self.current_balance(account_id).await?;
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                requested: amount,
                available,
            });
        }
        Ok(())
    }

    async fn owner_name(&self, account: &Account) -> Result<String, LedgerError> {
        Ok(self
            .store
            .get_user(account.owner_child_id)
            .await?
            .map(|user| user.name)
            .unwrap_or_default())
    }
}

fn positive_amount(amount: Decimal) -> Result<Decimal, LedgerError> {
    let rounded = round_amount(amount);
    if rounded <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(amount));
    }
    Ok(rounded)
}

/// Free text becomes a ` - text` suffix on the generated transfer notes;
/// its absence is spelled out
fn transfer_note_suffix(note: &str) -> String {
    let trimmed = note.trim();
    if trimmed.is_empty() {
        EMPTY_TRANSFER_NOTE.to_string()
    } else {
        format!(" - {}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn amounts_are_rounded_then_checked() {
        assert_eq!(positive_amount(dec!(10.006)).unwrap(), dec!(10.01));
        assert!(matches!(
            positive_amount(dec!(0)),
            Err(LedgerError::InvalidAmount(_))
        ));
        assert!(matches!(
            positive_amount(dec!(-3)),
            Err(LedgerError::InvalidAmount(_))
        ));
        // Rounds to zero at monetary scale.
        assert!(matches!(
            positive_amount(dec!(0.004)),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn transfer_suffix_spells_out_missing_notes() {
        assert_eq!(transfer_note_suffix("  "), " （无备注）");
        assert_eq!(transfer_note_suffix(" 生日红包 "), " - 生日红包");
    }
}
