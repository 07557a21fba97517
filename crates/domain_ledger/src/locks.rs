//! Per-account critical sections
//!
//! The read-balance-then-insert sequence must be serialized per account so
//! two concurrent withdrawals cannot both pass the sufficiency check against
//! a stale balance. Different accounts proceed independently.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use core_kernel::AccountId;

/// Registry of per-account async mutexes, populated lazily
#[derive(Debug, Default)]
pub struct AccountLocks {
    inner: Mutex<HashMap<AccountId, Arc<AsyncMutex<()>>>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&self, id: AccountId) -> Arc<AsyncMutex<()>> {
        let mut map = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        map.entry(id).or_default().clone()
    }

    /// Acquires the critical section for one account
    pub async fn lock(&self, id: AccountId) -> OwnedMutexGuard<()> {
        self.handle(id).lock_owned().await
    }

    /// Acquires the critical sections for two accounts in ascending id
    /// order, so concurrent opposite-direction transfers cannot deadlock.
    /// Equal ids acquire a single guard.
    pub async fn lock_pair(
        &self,
        a: AccountId,
        b: AccountId,
    ) -> (OwnedMutexGuard<()>, Option<OwnedMutexGuard<()>>) {
        if a == b {
            return (self.lock(a).await, None);
        }
        let (first, second) = if a < b { (a, b) } else { (b, a) };
        let first_guard = self.lock(first).await;
        let second_guard = self.lock(second).await;
        (first_guard, Some(second_guard))
    }
}
