//! The `AccountStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `snapsolve-store-sqlite`). Higher layers depend on this abstraction, not
//! on any concrete backend. Accounts are keyed by their case-normalised
//! email address; [`EmailAddress`] guarantees the normalisation, so the
//! uniqueness invariant is case-insensitive by construction.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::account::{Account, EmailAddress};

// ─── Free-use consumption ────────────────────────────────────────────────────

/// Result of [`AccountStore::consume_free_use`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreeUseOutcome {
  /// The committed record is covered by a subscription; no counter change.
  Subscribed,
  /// One free use was recorded against the committed record.
  Consumed {
    /// Uses left after the increment.
    remaining: u32,
  },
  /// The committed record had no free uses left; no counter change.
  Exhausted,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a durable account store.
pub trait AccountStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Look up an account by normalised email. Returns `None` if not found.
  fn find_by_email<'a>(
    &'a self,
    email: &'a EmailAddress,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + 'a;

  /// Insert or replace the account keyed by its email.
  fn upsert<'a>(
    &'a self,
    account: &'a Account,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Atomically settle a free-trial use against the most recently committed
  /// record state.
  ///
  /// Within a single transaction the store reloads the record, re-evaluates
  /// entitlement at `now`, and increments `free_uses_consumed` only when the
  /// account is unsubscribed with trial uses left. This closes the gap
  /// between the caller's entitlement check and the counter write under
  /// rapid repeated invocation. Fails if no account exists for `email`.
  fn consume_free_use<'a>(
    &'a self,
    email: &'a EmailAddress,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<FreeUseOutcome, Self::Error>> + Send + 'a;
}
