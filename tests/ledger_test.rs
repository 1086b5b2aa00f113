//! Ledger integration tests
//!
//! End-to-end tests for the reward ledger properties against a real
//! PostgreSQL database. They are `#[ignore]`d by default; run them with
//! `cargo test -- --ignored` after pointing DATABASE_URL at a throwaway
//! database.
//!
//! Covered properties:
//! - Balance identity: balance equals the sum of completed records
//! - At-most-once earning per (user, action, reference)
//! - Daily check-in cap per UTC day
//! - Transfer conservation and insufficient-balance rejection
//! - Failed operations write no records

mod common;

use assert_matches::assert_matches;
use serial_test::serial;
use sqlx::PgPool;
use uuid::Uuid;

use cybev_backend::auth::users::{create_user, User};
use cybev_backend::error::RewardError;
use cybev_backend::rewards::record::{ActionType, NewRecord, RecordStatus};
use cybev_backend::rewards::{balance, policy, store, transfer};

use common::database::TestDatabase;

/// Create a user with a unique username/email
async fn make_user(pool: &PgPool, name: &str) -> User {
    let suffix = Uuid::new_v4().simple().to_string();
    let username = format!("{}_{}", name, &suffix[..8]);
    let email = format!("{}@example.com", username);
    create_user(pool, username, email, "not-a-real-hash".to_string())
        .await
        .expect("Failed to create user")
}

/// Seed a user's balance with a single completed credit
async fn seed_balance(pool: &PgPool, user_id: Uuid, amount: i64) {
    store::append_record(
        pool,
        &NewRecord {
            user_id,
            amount,
            action_type: ActionType::Other,
            reason: "test seed".to_string(),
            reference_id: None,
            reference_kind: None,
            status: RecordStatus::Completed,
        },
    )
    .await
    .expect("Failed to seed balance");
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn balance_equals_sum_of_completed_records() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let user = make_user(pool, "alice").await;

    let r1 = policy::earn(pool, user.id, ActionType::Post, Some("post-1"), Some("post"))
        .await
        .unwrap();
    let r2 = policy::earn(pool, user.id, ActionType::Comment, Some("comment-1"), Some("comment"))
        .await
        .unwrap();

    // A pending record must not count toward balance
    store::append_record(
        pool,
        &NewRecord {
            user_id: user.id,
            amount: 999,
            action_type: ActionType::Other,
            reason: "pending payout".to_string(),
            reference_id: None,
            reference_kind: None,
            status: RecordStatus::Pending,
        },
    )
    .await
    .unwrap();

    let balance = balance::get_balance(pool, user.id).await.unwrap();
    assert_eq!(balance, r1.amount + r2.amount);
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn earning_is_at_most_once_per_reference() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let user = make_user(pool, "bob").await;

    let first = policy::earn(pool, user.id, ActionType::Post, Some("post-42"), Some("post")).await;
    assert!(first.is_ok());

    let second = policy::earn(pool, user.id, ActionType::Post, Some("post-42"), Some("post")).await;
    assert_matches!(second, Err(RewardError::DuplicateClaim { .. }));

    // Exactly one record exists for the reference
    let found = store::find_by_reference(pool, user.id, ActionType::Post, "post-42")
        .await
        .unwrap();
    assert!(found.is_some());
    let total = store::count_by_user(pool, user.id, Some(ActionType::Post))
        .await
        .unwrap();
    assert_eq!(total, 1);
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn same_reference_different_action_is_allowed() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let user = make_user(pool, "carol").await;

    // Liking and sharing the same post are distinct claims
    policy::earn(pool, user.id, ActionType::Like, Some("post-7"), Some("post"))
        .await
        .unwrap();
    policy::earn(pool, user.id, ActionType::Share, Some("post-7"), Some("post"))
        .await
        .unwrap();

    let total = store::count_by_user(pool, user.id, None).await.unwrap();
    assert_eq!(total, 2);
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn daily_checkin_succeeds_once_per_day() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let user = make_user(pool, "dave").await;

    let first = policy::earn(pool, user.id, ActionType::DailyCheckin, None, None)
        .await
        .unwrap();
    assert!((10..=50).contains(&first.amount));

    let second = policy::earn(pool, user.id, ActionType::DailyCheckin, None, None).await;
    assert_matches!(second, Err(RewardError::AlreadyClaimedToday { .. }));

    let total = store::count_by_user(pool, user.id, Some(ActionType::DailyCheckin))
        .await
        .unwrap();
    assert_eq!(total, 1);
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn transfer_conserves_total_balance() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let sender = make_user(pool, "erin").await;
    let recipient = make_user(pool, "frank").await;

    seed_balance(pool, sender.id, 200).await;
    seed_balance(pool, recipient.id, 30).await;

    let new_sender_balance = transfer::transfer(pool, sender.id, recipient.id, 50, Some("thanks"))
        .await
        .unwrap();

    assert_eq!(new_sender_balance, 150);
    assert_eq!(balance::get_balance(pool, sender.id).await.unwrap(), 150);
    assert_eq!(balance::get_balance(pool, recipient.id).await.unwrap(), 80);

    // Sum across both parties is unchanged
    let total = balance::get_balance(pool, sender.id).await.unwrap()
        + balance::get_balance(pool, recipient.id).await.unwrap();
    assert_eq!(total, 230);
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn insufficient_balance_writes_nothing() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let sender = make_user(pool, "grace").await;
    let recipient = make_user(pool, "heidi").await;

    seed_balance(pool, sender.id, 20).await;

    let result = transfer::transfer(pool, sender.id, recipient.id, 50, None).await;
    assert_matches!(
        result,
        Err(RewardError::InsufficientBalance { balance: 20, requested: 50 })
    );

    // No transfer legs were written for either party
    let sender_transfers = store::count_by_user(pool, sender.id, Some(ActionType::Transfer))
        .await
        .unwrap();
    let recipient_records = store::count_by_user(pool, recipient.id, None).await.unwrap();
    assert_eq!(sender_transfers, 0);
    assert_eq!(recipient_records, 0);
    assert_eq!(balance::get_balance(pool, sender.id).await.unwrap(), 20);
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn transfer_to_unknown_user_is_rejected() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let sender = make_user(pool, "ivan").await;
    seed_balance(pool, sender.id, 100).await;

    let result = transfer::transfer(pool, sender.id, Uuid::new_v4(), 10, None).await;
    assert_matches!(result, Err(RewardError::UserNotFound));
    assert_eq!(balance::get_balance(pool, sender.id).await.unwrap(), 100);
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn history_is_paginated_newest_first() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let user = make_user(pool, "judy").await;

    for i in 0..5 {
        policy::earn(
            pool,
            user.id,
            ActionType::Comment,
            Some(&format!("comment-{}", i)),
            Some("comment"),
        )
        .await
        .unwrap();
    }

    let page1 = store::list_by_user(pool, user.id, None, 2, 0).await.unwrap();
    let page2 = store::list_by_user(pool, user.id, None, 2, 2).await.unwrap();
    assert_eq!(page1.len(), 2);
    assert_eq!(page2.len(), 2);
    assert!(page1[0].created_at >= page1[1].created_at);
    assert!(page1[1].created_at >= page2[0].created_at);

    let total = store::count_by_user(pool, user.id, None).await.unwrap();
    assert_eq!(total, 5);
}
