//! Error type for `snapsolve-store-sqlite`.

use snapsolve_core::account::EmailAddress;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] snapsolve_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown subscription plan in database: {0:?}")]
  UnknownPlan(String),

  #[error("invalid free-use counter in database: {0}")]
  InvalidCounter(i64),

  #[error("no account registered for {0}")]
  AccountNotFound(EmailAddress),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
