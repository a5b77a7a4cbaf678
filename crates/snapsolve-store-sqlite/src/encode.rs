//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, plans as their lowercase
//! discriminants, and emails as the already-normalised key form.

use chrono::{DateTime, Utc};
use snapsolve_core::account::{Account, EmailAddress, SubscriptionPlan};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── SubscriptionPlan ────────────────────────────────────────────────────────

pub fn encode_plan(plan: SubscriptionPlan) -> &'static str {
  match plan {
    SubscriptionPlan::None => "none",
    SubscriptionPlan::Monthly => "monthly",
    SubscriptionPlan::Annual => "annual",
  }
}

pub fn decode_plan(s: &str) -> Result<SubscriptionPlan> {
  match s {
    "none" => Ok(SubscriptionPlan::None),
    "monthly" => Ok(SubscriptionPlan::Monthly),
    "annual" => Ok(SubscriptionPlan::Annual),
    other => Err(Error::UnknownPlan(other.to_string())),
  }
}

// ─── Account rows ────────────────────────────────────────────────────────────

/// Column order used by every account SELECT.
pub const ACCOUNT_COLUMNS: &str = "email, name, credential_digest, plan, \
                                   subscribed_at, subscription_reference, \
                                   free_uses_consumed";

/// One row of the `accounts` table, still in column form.
pub struct RawAccount {
  pub email:                  String,
  pub name:                   String,
  pub credential_digest:      String,
  pub plan:                   String,
  pub subscribed_at:          Option<String>,
  pub subscription_reference: Option<String>,
  pub free_uses_consumed:     i64,
}

impl RawAccount {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      email: row.get(0)?,
      name: row.get(1)?,
      credential_digest: row.get(2)?,
      plan: row.get(3)?,
      subscribed_at: row.get(4)?,
      subscription_reference: row.get(5)?,
      free_uses_consumed: row.get(6)?,
    })
  }
}

pub fn decode_account(raw: RawAccount) -> Result<Account> {
  Ok(Account {
    email: EmailAddress::parse(&raw.email)?,
    name: raw.name,
    credential_digest: raw.credential_digest,
    plan: decode_plan(&raw.plan)?,
    subscribed_at: raw.subscribed_at.as_deref().map(decode_dt).transpose()?,
    subscription_reference: raw.subscription_reference,
    free_uses_consumed: u32::try_from(raw.free_uses_consumed)
      .map_err(|_| Error::InvalidCounter(raw.free_uses_consumed))?,
  })
}
