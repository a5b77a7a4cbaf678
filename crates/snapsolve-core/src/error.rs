//! Error types for `snapsolve-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid email address: {0:?}")]
  InvalidEmail(String),

  #[error("account name must not be empty")]
  EmptyName,

  #[error("a subscription requires a paid plan")]
  PlanRequired,

  #[error("unknown subscription plan: {0:?}")]
  UnknownPlan(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
