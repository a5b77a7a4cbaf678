//! The entitlement evaluator — pure functions deciding whether an account
//! may invoke the solver right now.
//!
//! Nothing here reads the clock or touches storage; `now` is always passed
//! in, which keeps every rule trivially testable.

use chrono::{DateTime, Months, Utc};

use crate::account::{Account, SubscriptionPlan};

/// Number of solves an unsubscribed account may perform.
pub const FREE_TRIAL_LIMIT: u32 = 3;

/// The instant at which the account's subscription lapses, or `None` when no
/// subscription was ever started.
///
/// Plan durations are calendar units: one month for `Monthly`, twelve for
/// `Annual`. `checked_add_months` clamps to the last valid day on rollover,
/// so a subscription started Jan 31 expires at the end of February rather
/// than on an invalid date.
pub fn subscription_expiry(account: &Account) -> Option<DateTime<Utc>> {
  let started = account.subscribed_at?;
  let duration = match account.plan {
    SubscriptionPlan::None => return None,
    SubscriptionPlan::Monthly => Months::new(1),
    SubscriptionPlan::Annual => Months::new(12),
  };
  started.checked_add_months(duration)
}

/// Whether the account holds an unexpired subscription at `now`.
/// The window is half-open: an account is no longer subscribed exactly at
/// the expiry instant.
pub fn is_subscribed(account: &Account, now: DateTime<Utc>) -> bool {
  subscription_expiry(account).is_some_and(|expiry| now < expiry)
}

/// Free-trial uses left, floored at zero.
pub fn free_uses_remaining(account: &Account) -> u32 {
  FREE_TRIAL_LIMIT.saturating_sub(account.free_uses_consumed)
}

/// Whether the account may invoke the solve pipeline at `now`.
pub fn can_solve(account: &Account, now: DateTime<Utc>) -> bool {
  is_subscribed(account, now) || free_uses_remaining(account) > 0
}
