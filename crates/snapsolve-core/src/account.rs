//! The account record — identity, credential digest, and entitlement fields.
//!
//! Entitlement itself is never stored. It is recomputed from the plan and
//! start timestamp by [`crate::entitlement`]; the record only carries the
//! inputs.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Email ───────────────────────────────────────────────────────────────────

/// A case-normalised email address — the identity key for accounts.
///
/// Uniqueness across the store is case-insensitive, so the address is
/// lowercased once at construction and every lookup keys on that form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
  /// Parse and normalise an address. Requires a non-empty local part and
  /// domain separated by `@`.
  pub fn parse(raw: &str) -> Result<Self> {
    let normalised = raw.trim().to_lowercase();
    let Some((local, domain)) = normalised.split_once('@') else {
      return Err(Error::InvalidEmail(raw.to_string()));
    };
    if local.is_empty() || domain.is_empty() {
      return Err(Error::InvalidEmail(raw.to_string()));
    }
    Ok(Self(normalised))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for EmailAddress {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl FromStr for EmailAddress {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::parse(s) }
}

impl<'de> Deserialize<'de> for EmailAddress {
  fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    let raw = String::deserialize(deserializer)?;
    Self::parse(&raw).map_err(serde::de::Error::custom)
  }
}

// ─── Subscription plan ───────────────────────────────────────────────────────

/// The account's subscription plan. Durations are calendar units, applied by
/// [`crate::entitlement::subscription_expiry`].
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
  #[default]
  None,
  Monthly,
  Annual,
}

impl FromStr for SubscriptionPlan {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.to_lowercase().as_str() {
      "none" => Ok(Self::None),
      "monthly" => Ok(Self::Monthly),
      "annual" => Ok(Self::Annual),
      other => Err(Error::UnknownPlan(other.to_string())),
    }
  }
}

// ─── Checkout collaborator ───────────────────────────────────────────────────

/// Terminal event reported by the external payment checkout.
///
/// On `Completed`, the caller applies
/// [`Account::activate_subscription`] with the carried reference and
/// persists the record; `Cancelled` leaves the account untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckoutEvent {
  Completed { reference: String },
  Cancelled,
}

// ─── Account ─────────────────────────────────────────────────────────────────

/// A registered account.
///
/// Invariants maintained by the constructors and mutating methods:
/// `subscribed_at` is `Some` exactly when `plan != None`, and
/// `free_uses_consumed` only ever increases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
  pub email:                  EmailAddress,
  pub name:                   String,
  /// SHA-256 hex digest of the account secret; never compared in plaintext.
  pub credential_digest:      String,
  pub plan:                   SubscriptionPlan,
  /// Set on successful checkout; `None` exactly when `plan` is `None`.
  pub subscribed_at:          Option<DateTime<Utc>>,
  /// Opaque reference from the external payment provider.
  pub subscription_reference: Option<String>,
  pub free_uses_consumed:     u32,
}

impl Account {
  /// The registration shape: no plan, no uses consumed.
  pub fn new(
    email: EmailAddress,
    name: impl Into<String>,
    credential_digest: impl Into<String>,
  ) -> Result<Self> {
    let name = name.into();
    if name.trim().is_empty() {
      return Err(Error::EmptyName);
    }
    Ok(Self {
      email,
      name,
      credential_digest: credential_digest.into(),
      plan: SubscriptionPlan::None,
      subscribed_at: None,
      subscription_reference: None,
      free_uses_consumed: 0,
    })
  }

  /// Apply a successful checkout: set the plan, start the clock at `now`,
  /// and record the payment reference. Rejects [`SubscriptionPlan::None`].
  pub fn activate_subscription(
    &mut self,
    plan: SubscriptionPlan,
    reference: impl Into<String>,
    now: DateTime<Utc>,
  ) -> Result<()> {
    if plan == SubscriptionPlan::None {
      return Err(Error::PlanRequired);
    }
    self.plan = plan;
    self.subscribed_at = Some(now);
    self.subscription_reference = Some(reference.into());
    Ok(())
  }

  /// Record one consumed free-trial use. Called only after a successful
  /// solve while the account is not covered by a subscription.
  pub fn record_free_use(&mut self) {
    self.free_uses_consumed += 1;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn email_is_normalised_to_lowercase() {
    let email = EmailAddress::parse("  Alice@Example.COM ").unwrap();
    assert_eq!(email.as_str(), "alice@example.com");
  }

  #[test]
  fn email_without_at_sign_is_rejected() {
    assert!(matches!(
      EmailAddress::parse("alice.example.com"),
      Err(Error::InvalidEmail(_))
    ));
  }

  #[test]
  fn email_with_empty_parts_is_rejected() {
    assert!(EmailAddress::parse("@example.com").is_err());
    assert!(EmailAddress::parse("alice@").is_err());
  }

  #[test]
  fn deserialised_email_is_normalised() {
    let email: EmailAddress = serde_json::from_str("\"Bob@Example.Com\"").unwrap();
    assert_eq!(email.as_str(), "bob@example.com");
  }

  #[test]
  fn new_account_starts_unsubscribed() {
    let email = EmailAddress::parse("alice@example.com").unwrap();
    let account = Account::new(email, "Alice", "digest").unwrap();
    assert_eq!(account.plan, SubscriptionPlan::None);
    assert!(account.subscribed_at.is_none());
    assert!(account.subscription_reference.is_none());
    assert_eq!(account.free_uses_consumed, 0);
  }

  #[test]
  fn blank_name_is_rejected() {
    let email = EmailAddress::parse("alice@example.com").unwrap();
    assert!(matches!(
      Account::new(email, "   ", "digest"),
      Err(Error::EmptyName)
    ));
  }

  #[test]
  fn activate_subscription_sets_plan_start_and_reference() {
    let email = EmailAddress::parse("alice@example.com").unwrap();
    let mut account = Account::new(email, "Alice", "digest").unwrap();
    let now = Utc::now();

    account
      .activate_subscription(SubscriptionPlan::Monthly, "chk_123", now)
      .unwrap();

    assert_eq!(account.plan, SubscriptionPlan::Monthly);
    assert_eq!(account.subscribed_at, Some(now));
    assert_eq!(account.subscription_reference.as_deref(), Some("chk_123"));
  }

  #[test]
  fn activate_subscription_rejects_plan_none() {
    let email = EmailAddress::parse("alice@example.com").unwrap();
    let mut account = Account::new(email, "Alice", "digest").unwrap();
    assert!(matches!(
      account.activate_subscription(SubscriptionPlan::None, "chk", Utc::now()),
      Err(Error::PlanRequired)
    ));
  }

  #[test]
  fn account_serialises_with_named_keys() {
    let email = EmailAddress::parse("alice@example.com").unwrap();
    let account = Account::new(email, "Alice", "abc123").unwrap();
    let json = serde_json::to_value(&account).unwrap();

    assert_eq!(json["email"], "alice@example.com");
    assert_eq!(json["name"], "Alice");
    assert_eq!(json["credential_digest"], "abc123");
    assert_eq!(json["plan"], "none");
    assert_eq!(json["free_uses_consumed"], 0);
  }
}
