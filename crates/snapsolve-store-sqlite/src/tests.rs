//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{TimeZone as _, Utc};
use snapsolve_core::{
  account::{Account, EmailAddress, SubscriptionPlan},
  entitlement::FREE_TRIAL_LIMIT,
  store::{AccountStore, FreeUseOutcome},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory().await.expect("in-memory store")
}

fn email(raw: &str) -> EmailAddress {
  EmailAddress::parse(raw).unwrap()
}

fn account(raw_email: &str) -> Account {
  Account::new(email(raw_email), "Alice", "digest").unwrap()
}

// ─── Upsert / find ───────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_and_find_round_trip() {
  let s = store().await;
  let mut original = account("alice@example.com");
  original.record_free_use();

  s.upsert(&original).await.unwrap();
  let fetched = s.find_by_email(&email("alice@example.com")).await.unwrap();

  let fetched = fetched.expect("account should exist");
  assert_eq!(fetched.email, original.email);
  assert_eq!(fetched.name, "Alice");
  assert_eq!(fetched.credential_digest, "digest");
  assert_eq!(fetched.plan, SubscriptionPlan::None);
  assert!(fetched.subscribed_at.is_none());
  assert_eq!(fetched.free_uses_consumed, 1);
}

#[tokio::test]
async fn find_missing_returns_none() {
  let s = store().await;
  let result = s.find_by_email(&email("nobody@example.com")).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn lookup_is_case_insensitive() {
  let s = store().await;
  s.upsert(&account("Alice@Example.com")).await.unwrap();

  let fetched = s.find_by_email(&email("ALICE@EXAMPLE.COM")).await.unwrap();
  assert!(fetched.is_some());
}

#[tokio::test]
async fn upsert_replaces_rather_than_duplicates() {
  let s = store().await;
  s.upsert(&account("alice@example.com")).await.unwrap();

  let mut updated = account("alice@example.com");
  updated.name = "Alice Liddell".to_string();
  s.upsert(&updated).await.unwrap();

  let fetched = s
    .find_by_email(&email("alice@example.com"))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(fetched.name, "Alice Liddell");
}

#[tokio::test]
async fn subscription_fields_survive_the_round_trip() {
  let s = store().await;
  let started = Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap();
  let mut subscriber = account("bob@example.com");
  subscriber
    .activate_subscription(SubscriptionPlan::Annual, "chk_42", started)
    .unwrap();

  s.upsert(&subscriber).await.unwrap();
  let fetched = s
    .find_by_email(&email("bob@example.com"))
    .await
    .unwrap()
    .unwrap();

  assert_eq!(fetched.plan, SubscriptionPlan::Annual);
  assert_eq!(fetched.subscribed_at, Some(started));
  assert_eq!(fetched.subscription_reference.as_deref(), Some("chk_42"));
}

// ─── consume_free_use ────────────────────────────────────────────────────────

#[tokio::test]
async fn consume_decrements_remaining_until_exhausted() {
  // Scenario: a fresh trial account burns through its three free uses.
  let s = store().await;
  s.upsert(&account("alice@example.com")).await.unwrap();
  let key = email("alice@example.com");
  let now = Utc::now();

  for expected_remaining in (0..FREE_TRIAL_LIMIT).rev() {
    let outcome = s.consume_free_use(&key, now).await.unwrap();
    assert_eq!(
      outcome,
      FreeUseOutcome::Consumed { remaining: expected_remaining },
    );
  }

  let outcome = s.consume_free_use(&key, now).await.unwrap();
  assert_eq!(outcome, FreeUseOutcome::Exhausted);

  let fetched = s.find_by_email(&key).await.unwrap().unwrap();
  assert_eq!(fetched.free_uses_consumed, FREE_TRIAL_LIMIT);
}

#[tokio::test]
async fn consume_leaves_subscribed_accounts_untouched() {
  let s = store().await;
  let started = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
  let now = Utc.with_ymd_and_hms(2024, 6, 11, 0, 0, 0).unwrap();
  let mut subscriber = account("bob@example.com");
  subscriber
    .activate_subscription(SubscriptionPlan::Monthly, "chk_1", started)
    .unwrap();
  s.upsert(&subscriber).await.unwrap();

  let outcome = s
    .consume_free_use(&email("bob@example.com"), now)
    .await
    .unwrap();
  assert_eq!(outcome, FreeUseOutcome::Subscribed);

  let fetched = s
    .find_by_email(&email("bob@example.com"))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(fetched.free_uses_consumed, 0);
}

#[tokio::test]
async fn consume_charges_again_after_subscription_expiry() {
  let s = store().await;
  let started = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
  let after_expiry = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
  let mut subscriber = account("bob@example.com");
  subscriber
    .activate_subscription(SubscriptionPlan::Monthly, "chk_1", started)
    .unwrap();
  s.upsert(&subscriber).await.unwrap();

  let outcome = s
    .consume_free_use(&email("bob@example.com"), after_expiry)
    .await
    .unwrap();
  assert_eq!(
    outcome,
    FreeUseOutcome::Consumed { remaining: FREE_TRIAL_LIMIT - 1 },
  );
}

#[tokio::test]
async fn consume_for_missing_account_fails() {
  let s = store().await;
  let result = s.consume_free_use(&email("nobody@example.com"), Utc::now()).await;
  assert!(matches!(result, Err(Error::AccountNotFound(_))));
}

#[tokio::test]
async fn concurrent_consumes_never_overcount() {
  // Rapid repeated invocation settles against committed state, so exactly
  // FREE_TRIAL_LIMIT of the attempts may succeed.
  let s = store().await;
  s.upsert(&account("alice@example.com")).await.unwrap();
  let now = Utc::now();

  let mut tasks = tokio::task::JoinSet::new();
  for _ in 0..FREE_TRIAL_LIMIT + 3 {
    let s = s.clone();
    let key = email("alice@example.com");
    tasks.spawn(async move { s.consume_free_use(&key, now).await });
  }

  let mut consumed = 0;
  let mut exhausted = 0;
  while let Some(result) = tasks.join_next().await {
    match result.unwrap().unwrap() {
      FreeUseOutcome::Consumed { .. } => consumed += 1,
      FreeUseOutcome::Exhausted => exhausted += 1,
      FreeUseOutcome::Subscribed => panic!("account is not subscribed"),
    }
  }

  assert_eq!(consumed, FREE_TRIAL_LIMIT);
  assert_eq!(exhausted, 3);

  let fetched = s
    .find_by_email(&email("alice@example.com"))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(fetched.free_uses_consumed, FREE_TRIAL_LIMIT);
}
