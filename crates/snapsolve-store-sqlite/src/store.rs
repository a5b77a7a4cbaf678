//! [`SqliteStore`] — the SQLite implementation of
//! [`AccountStore`](snapsolve_core::store::AccountStore).

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use snapsolve_core::{
  account::{Account, EmailAddress},
  entitlement,
  store::{AccountStore, FreeUseOutcome},
};

use crate::{
  Error, Result,
  encode::{
    ACCOUNT_COLUMNS, RawAccount, decode_account, encode_dt, encode_plan,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An account store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Row access helpers ──────────────────────────────────────────────────────

fn select_raw(
  conn: &rusqlite::Connection,
  key: &str,
) -> rusqlite::Result<Option<RawAccount>> {
  conn
    .query_row(
      &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = ?1"),
      rusqlite::params![key],
      RawAccount::from_row,
    )
    .optional()
}

/// Internal result of the consume transaction, before the missing-account
/// case is turned into an error.
enum ConsumeRow {
  Missing,
  Settled(FreeUseOutcome),
}

// ─── AccountStore ────────────────────────────────────────────────────────────

impl AccountStore for SqliteStore {
  type Error = Error;

  async fn find_by_email(
    &self,
    email: &EmailAddress,
  ) -> Result<Option<Account>> {
    let key = email.as_str().to_string();
    let raw = self
      .conn
      .call(move |conn| Ok(select_raw(conn, &key)?))
      .await?;
    raw.map(decode_account).transpose()
  }

  async fn upsert(&self, account: &Account) -> Result<()> {
    let key = account.email.as_str().to_string();
    let name = account.name.clone();
    let digest = account.credential_digest.clone();
    let plan = encode_plan(account.plan);
    let subscribed_at = account.subscribed_at.map(encode_dt);
    let reference = account.subscription_reference.clone();
    let consumed = i64::from(account.free_uses_consumed);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO accounts (email, name, credential_digest, plan,
                                 subscribed_at, subscription_reference,
                                 free_uses_consumed)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
           ON CONFLICT(email) DO UPDATE SET
             name                   = excluded.name,
             credential_digest      = excluded.credential_digest,
             plan                   = excluded.plan,
             subscribed_at          = excluded.subscribed_at,
             subscription_reference = excluded.subscription_reference,
             free_uses_consumed     = excluded.free_uses_consumed",
          rusqlite::params![
            key,
            name,
            digest,
            plan,
            subscribed_at,
            reference,
            consumed
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn consume_free_use(
    &self,
    email: &EmailAddress,
    now: DateTime<Utc>,
  ) -> Result<FreeUseOutcome> {
    let key = email.as_str().to_string();

    let row = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let Some(raw) = select_raw(&tx, &key)? else {
          return Ok(ConsumeRow::Missing);
        };
        let account = decode_account(raw)
          .map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))?;

        // Entitlement is re-evaluated on the committed record, inside the
        // transaction, so the increment can never act on a stale snapshot.
        let outcome = if entitlement::is_subscribed(&account, now) {
          FreeUseOutcome::Subscribed
        } else if entitlement::free_uses_remaining(&account) == 0 {
          FreeUseOutcome::Exhausted
        } else {
          tx.execute(
            "UPDATE accounts
             SET free_uses_consumed = free_uses_consumed + 1
             WHERE email = ?1",
            rusqlite::params![key],
          )?;
          FreeUseOutcome::Consumed {
            remaining: entitlement::free_uses_remaining(&account)
              .saturating_sub(1),
          }
        };

        tx.commit()?;
        Ok(ConsumeRow::Settled(outcome))
      })
      .await?;

    match row {
      ConsumeRow::Missing => Err(Error::AccountNotFound(email.clone())),
      ConsumeRow::Settled(outcome) => Ok(outcome),
    }
  }
}
