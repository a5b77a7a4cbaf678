//! SQL schema for the SnapSolve SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS accounts (
    email                  TEXT PRIMARY KEY,  -- normalised lowercase
    name                   TEXT NOT NULL,
    credential_digest      TEXT NOT NULL,     -- sha-256 hex
    plan                   TEXT NOT NULL DEFAULT 'none',  -- 'none' | 'monthly' | 'annual'
    subscribed_at          TEXT,              -- RFC 3339 UTC; set iff plan != 'none'
    subscription_reference TEXT,
    free_uses_consumed     INTEGER NOT NULL DEFAULT 0
);

PRAGMA user_version = 1;
";
