//! Database schema and types

pub use crate::wizard::state::Session;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// SQL schema for initialization
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS sessions (
    user_id TEXT PRIMARY KEY,
    state TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS profiles (
    user_id TEXT PRIMARY KEY,
    ministry TEXT NOT NULL,
    sutra_name TEXT NOT NULL,
    name TEXT NOT NULL,
    registered_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS records (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    location TEXT NOT NULL,
    date TEXT NOT NULL,
    category TEXT NOT NULL,
    items TEXT NOT NULL,
    description TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_records_user ON records(user_id);
"#;

/// Registered member profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub user_id: String,
    pub ministry: String,
    pub sutra_name: String,
    pub name: String,
    pub registered_at: DateTime<Utc>,
}

/// Profile fields collected by the registration flow, before the row
/// gets its user id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    pub ministry: String,
    pub sutra_name: String,
    pub name: String,
}

/// Stored practice record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PracticeRecord {
    pub id: String,
    pub user_id: String,
    pub location: String,
    /// Practice date as YYYYMMDD
    pub date: String,
    pub category: String,
    /// Comma-joined item names, or the no-items sentinel
    pub items: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Record fields produced by a completed wizard run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub location: String,
    pub date: String,
    pub category: String,
    pub items: String,
    pub description: String,
}
