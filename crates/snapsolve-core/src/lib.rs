//! Core types and trait definitions for the SnapSolve equation service.
//!
//! This crate is deliberately free of IO, database, and engine dependencies.
//! All other crates depend on it; it depends on nothing heavier than chrono
//! and serde.

pub mod account;
pub mod credential;
pub mod engine;
pub mod entitlement;
pub mod error;
pub mod store;

pub use error::{Error, Result};
