use std::sync::Arc;

use chrono::NaiveDate;
use laundrybook_api::service::BookingService;
use laundrybook_core::catalog::SlotCatalog;
use laundrybook_core::errors::TimeError;
use laundrybook_core::ledger::Ledger;
use laundrybook_core::models::slot::SlotKey;
use laundrybook_core::policy::{BookingPolicy, BookingRules};
use laundrybook_db::mock::MockLedgerStore;
use laundrybook_db::{LedgerStore, MemoryStore};
use pretty_assertions::assert_eq;

use crate::test_utils::{default_now, FixedClock, TestContext};

fn key(raw: &str) -> SlotKey {
    raw.parse().unwrap()
}

async fn stored_json(store: &MemoryStore) -> String {
    store.load().await.unwrap().to_json().unwrap()
}

#[tokio::test]
async fn test_open_loads_stored_ledger() {
    let store = MemoryStore::with_record(r#"{"2024-06-01-7-10":"alice","junk":"bob"}"#);

    let service = BookingService::open(
        Box::new(store),
        BookingRules::default(),
        Arc::new(FixedClock::at(default_now())),
    )
    .await
    .unwrap();

    let ledger = service.snapshot().await;
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.held_by(&key("2024-06-01-7-10")), Some("alice"));
}

#[tokio::test]
async fn test_open_propagates_load_failure() {
    let mut store = MockLedgerStore::new();
    store
        .expect_load()
        .returning(|| Err(eyre::eyre!("connection refused")));

    let result = BookingService::open(
        Box::new(store),
        BookingRules::default(),
        Arc::new(FixedClock::at(default_now())),
    )
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_mutations_are_written_back() {
    let store = Arc::new(MemoryStore::new());
    let service = TestContext::new().build_service(Box::new(store.clone()));

    service.book("alice", "2024-06-01-7-10").await.unwrap();
    assert_eq!(stored_json(&store).await, r#"{"2024-06-01-7-10":"alice"}"#);

    service.book("alice", "2024-06-01-10-13").await.unwrap();
    assert_eq!(stored_json(&store).await, r#"{"2024-06-01-10-13":"alice"}"#);

    service.cancel("alice", "2024-06-01-10-13").await.unwrap();
    assert_eq!(stored_json(&store).await, "{}");
    assert_eq!(store.load().await.unwrap(), service.snapshot().await);
}

#[tokio::test]
async fn test_no_op_requests_skip_the_store() {
    let ledger: Ledger = [(key("2024-06-01-7-10"), "alice".to_string())]
        .into_iter()
        .collect();
    let mut store = MockLedgerStore::new();
    store.expect_save().never();
    let service = TestContext::new()
        .with_ledger(ledger)
        .build_service(Box::new(store));

    let rebooked = service.book("alice", "2024-06-01-7-10").await.unwrap();
    let cancelled = service.cancel("bob", "2024-06-01-7-10").await.unwrap();

    assert!(rebooked.already_held);
    assert!(!cancelled.cancelled);
}

#[tokio::test]
async fn test_failed_save_leaves_ledger_unchanged() {
    let ledger: Ledger = [(key("2024-06-01-7-10"), "alice".to_string())]
        .into_iter()
        .collect();
    let mut store = MockLedgerStore::new();
    store
        .expect_save()
        .times(2)
        .returning(|_| Err(eyre::eyre!("disk full")));
    let service = TestContext::new()
        .with_ledger(ledger.clone())
        .build_service(Box::new(store));

    let booked = service.book("alice", "2024-06-01-10-13").await;
    let cancelled = service.cancel("alice", "2024-06-01-7-10").await;

    assert!(matches!(booked, Err(TimeError::Storage(_))));
    assert!(matches!(cancelled, Err(TimeError::Storage(_))));
    assert_eq!(service.snapshot().await, ledger);
}

#[tokio::test]
async fn test_rejected_booking_never_reaches_the_store() {
    let ledger: Ledger = [(key("2024-06-01-7-10"), "alice".to_string())]
        .into_iter()
        .collect();
    let mut store = MockLedgerStore::new();
    store.expect_save().never();
    let service = TestContext::new()
        .with_ledger(ledger)
        .build_service(Box::new(store));

    let result = service.book("bob", "2024-06-01-7-10").await;

    assert!(matches!(result, Err(TimeError::Conflict(_))));
}

#[tokio::test]
async fn test_dual_policy_through_service() {
    let rules = BookingRules::new(SlotCatalog::with_hourly_short_slots(), BookingPolicy::Dual);
    let service = TestContext::new()
        .with_rules(rules)
        .build_service(Box::new(MemoryStore::new()));

    service.book("alice", "2024-06-01-7-10").await.unwrap();
    service.book("alice", "2024-06-01-13-14").await.unwrap();
    let moved = service.book("alice", "2024-06-01-14-15").await.unwrap();
    let overlap = service.book("bob", "2024-06-01-8-9").await;

    assert_eq!(moved.released, vec![key("2024-06-01-13-14")]);
    assert!(matches!(overlap, Err(TimeError::Conflict(_))));
    assert_eq!(
        service.my_bookings("alice").await.all,
        vec![key("2024-06-01-7-10"), key("2024-06-01-14-15")]
    );
}

#[tokio::test]
async fn test_upcoming_booking_follows_the_clock() {
    let ledger: Ledger = [
        (key("2024-06-01-7-10"), "alice".to_string()),
        (key("2024-06-02-7-10"), "alice".to_string()),
    ]
    .into_iter()
    .collect();
    let later = NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let service = TestContext::new()
        .with_ledger(ledger)
        .at(later)
        .build_service(Box::new(MemoryStore::new()));

    let mine = service.my_bookings("alice").await;

    assert_eq!(mine.upcoming, Some(key("2024-06-02-7-10")));
    assert_eq!(mine.all.len(), 2);
}
