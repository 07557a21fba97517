//! Monthly interest settlement against the in-memory store

use std::sync::Arc;

use rust_decimal_macros::dec;

use core_kernel::SettlementMonth;
use domain_ledger::{
    run_monthly_interest, schedule_interest, Account, Ledger, LedgerStore, Role, Settings,
    TransactionFilter, TransactionKind, User,
};
use infra_store::MemoryStore;
use test_utils::{instant, settings_cny, AccountBuilder, TransactionBuilder};

fn month(year: i32, m: u32) -> SettlementMonth {
    SettlementMonth::new(year, m).unwrap()
}

fn seeded(settings: Settings) -> (Arc<MemoryStore>, Ledger<MemoryStore>, Account) {
    let store = Arc::new(MemoryStore::new(settings));
    let parent = User::new("妈妈", Role::Parent);
    let child = User::new("小明", Role::Child);
    let account = AccountBuilder::new()
        .with_owner(child.id)
        .with_creator(parent.id)
        .build();
    store.upsert_user(parent).unwrap();
    store.upsert_user(child).unwrap();
    store.upsert_account(account.clone()).unwrap();
    let ledger = Ledger::new(store.clone());
    (store, ledger, account)
}

async fn interest_rows(store: &MemoryStore, account: &Account) -> Vec<domain_ledger::Transaction> {
    store
        .list_transactions(account.id, TransactionFilter::full_history())
        .await
        .unwrap()
        .into_iter()
        .filter(|t| t.kind == TransactionKind::Interest)
        .collect()
}

#[tokio::test]
async fn sweep_settles_every_pending_month_once() {
    let (store, ledger, account) = seeded(settings_cny());
    store
        .load_transaction(
            TransactionBuilder::new()
                .for_account(&account)
                .with_amount(dec!(50))
                .with_created_at("2024-01-15T10:00:00Z")
                .build(),
        )
        .unwrap();

    let now = instant("2024-04-10T00:00:00Z");
    let report = run_monthly_interest(&ledger, now).await.unwrap();

    assert_eq!(report.accounts_processed, 1);
    assert_eq!(report.accounts_failed, 0);
    // January's opening balance is zero (the deposit lands mid-month), so
    // only February and March produce rows.
    assert_eq!(report.months_recorded, 2);

    let rows = interest_rows(&store, &account).await;
    let months: Vec<_> = rows.iter().filter_map(|r| r.interest_month).collect();
    assert_eq!(months, vec![month(2024, 2), month(2024, 3)]);

    // 50 * 10% / 12 = 0.42 per settled month.
    for row in &rows {
        assert_eq!(row.amount, dec!(0.42));
        assert_eq!(row.currency, account.currency);
        assert_eq!(row.created_by, account.created_by);
    }
    assert_eq!(
        rows[0].note.as_deref(),
        Some("2024年2月结息，利率 10%")
    );

    assert_eq!(
        ledger.current_balance(account.id).await.unwrap(),
        dec!(50.84)
    );
}

#[tokio::test]
async fn rerunning_the_sweep_is_idempotent() {
    let (store, ledger, account) = seeded(settings_cny());
    store
        .load_transaction(
            TransactionBuilder::new()
                .for_account(&account)
                .with_amount(dec!(50))
                .with_created_at("2024-01-15T10:00:00Z")
                .build(),
        )
        .unwrap();

    let now = instant("2024-04-10T00:00:00Z");
    run_monthly_interest(&ledger, now).await.unwrap();
    let first_pass = interest_rows(&store, &account).await.len();

    let report = run_monthly_interest(&ledger, now).await.unwrap();
    assert_eq!(report.months_recorded, 0);
    assert_eq!(interest_rows(&store, &account).await.len(), first_pass);
}

#[tokio::test]
async fn sweep_resumes_after_legacy_interest_notes() {
    let (store, ledger, account) = seeded(Settings::new(
        dec!(8),
        "Asia/Singapore".parse().unwrap(),
    ));
    store
        .load_transaction(
            TransactionBuilder::new()
                .for_account(&account)
                .with_amount(dec!(50))
                .with_created_at("2024-01-15T10:00:00Z")
                .build(),
        )
        .unwrap();
    // Historic row: legacy note, no structured month tag.
    store
        .load_transaction(
            TransactionBuilder::new()
                .for_account(&account)
                .with_kind(TransactionKind::Interest)
                .with_amount(dec!(0.33))
                .with_note("2024年2月结息，利率 8%")
                .with_created_at("2024-03-01T00:00:00Z")
                .build(),
        )
        .unwrap();

    let now = instant("2024-05-10T00:00:00Z");
    let report = run_monthly_interest(&ledger, now).await.unwrap();
    assert_eq!(report.months_recorded, 2);

    let rows = interest_rows(&store, &account).await;
    let tagged: Vec<_> = rows.iter().filter_map(|r| r.interest_month).collect();
    // February is already covered by the legacy row; March and April settle.
    assert_eq!(tagged, vec![month(2024, 3), month(2024, 4)]);

    // March opens at 50 (the legacy row posts after the month starts);
    // April opens at 50.33.
    let march = rows.iter().find(|r| r.interest_month == Some(month(2024, 3))).unwrap();
    let april = rows.iter().find(|r| r.interest_month == Some(month(2024, 4))).unwrap();
    assert_eq!(march.amount, dec!(0.33));
    assert_eq!(april.amount, dec!(0.34));
}

#[tokio::test]
async fn record_interest_is_at_most_once_per_month() {
    let (_store, ledger, account) = seeded(settings_cny());
    ledger
        .store()
        .load_transaction(
            TransactionBuilder::new()
                .for_account(&account)
                .with_amount(dec!(50))
                .with_created_at("2024-01-15T10:00:00Z")
                .build(),
        )
        .unwrap();

    let first = ledger
        .record_interest(
            account.id,
            month(2024, 2),
            dec!(0.42),
            "2024年2月结息，利率 10%",
            account.created_by,
        )
        .await
        .unwrap();
    assert!(first.is_some());

    let second = ledger
        .record_interest(
            account.id,
            month(2024, 2),
            dec!(0.42),
            "2024年2月结息，利率 10%",
            account.created_by,
        )
        .await
        .unwrap();
    assert!(second.is_none());
}

#[tokio::test]
async fn voided_interest_still_counts_as_settled() {
    let (store, ledger, account) = seeded(settings_cny());
    store
        .load_transaction(
            TransactionBuilder::new()
                .for_account(&account)
                .with_amount(dec!(50))
                .with_created_at("2024-01-15T10:00:00Z")
                .build(),
        )
        .unwrap();
    // A voided interest row: excluded from balances, but history still says
    // the month was settled.
    store
        .load_transaction(
            TransactionBuilder::new()
                .for_account(&account)
                .with_kind(TransactionKind::Interest)
                .with_amount(dec!(0.42))
                .with_interest_month(month(2024, 2))
                .with_note("2024年2月结息，利率 10%")
                .with_created_at("2024-03-02T00:00:00Z")
                .voided()
                .build(),
        )
        .unwrap();

    let schedule = schedule_interest(
        &store
            .list_transactions(account.id, TransactionFilter::full_history())
            .await
            .unwrap(),
        instant("2024-04-10T00:00:00Z"),
        &settings_cny(),
    );
    assert_eq!(schedule.months_to_settle, vec![month(2024, 3)]);

    let result = ledger
        .record_interest(
            account.id,
            month(2024, 2),
            dec!(0.42),
            "2024年2月结息，利率 10%",
            account.created_by,
        )
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn inactive_accounts_are_skipped_by_the_sweep() {
    let (store, ledger, account) = seeded(settings_cny());
    store
        .load_transaction(
            TransactionBuilder::new()
                .for_account(&account)
                .with_amount(dec!(50))
                .with_created_at("2024-01-15T10:00:00Z")
                .build(),
        )
        .unwrap();

    let frozen = AccountBuilder::new().inactive().build();
    store.upsert_account(frozen.clone()).unwrap();
    store
        .load_transaction(
            TransactionBuilder::new()
                .for_account(&frozen)
                .with_amount(dec!(1000))
                .with_created_at("2024-01-02T00:00:00Z")
                .build(),
        )
        .unwrap();

    let report = run_monthly_interest(&ledger, instant("2024-04-10T00:00:00Z"))
        .await
        .unwrap();
    assert_eq!(report.accounts_processed, 1);
    assert!(interest_rows(&store, &frozen).await.is_empty());
}

#[tokio::test]
async fn account_without_history_accrues_nothing() {
    let (store, ledger, account) = seeded(settings_cny());
    let report = run_monthly_interest(&ledger, instant("2024-04-10T00:00:00Z"))
        .await
        .unwrap();
    assert_eq!(report.months_recorded, 0);
    assert!(interest_rows(&store, &account).await.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_sweeps_never_double_settle() {
    let (store, ledger, account) = seeded(settings_cny());
    store
        .load_transaction(
            TransactionBuilder::new()
                .for_account(&account)
                .with_amount(dec!(50))
                .with_created_at("2024-01-15T10:00:00Z")
                .build(),
        )
        .unwrap();

    let ledger = Arc::new(ledger);
    let now = instant("2024-04-10T00:00:00Z");
    let mut tasks = Vec::new();
    for _ in 0..4 {
        let ledger = ledger.clone();
        tasks.push(tokio::spawn(async move {
            run_monthly_interest(&ledger, now).await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let rows = interest_rows(&store, &account).await;
    let mut months: Vec<_> = rows.iter().filter_map(|r| r.interest_month).collect();
    months.sort();
    months.dedup();
    assert_eq!(rows.len(), months.len(), "a month settled more than once");
}
