//! Database module for the report bot
//!
//! Provides persistence for wizard sessions, member profiles, and
//! practice records, all keyed by the LINE user id.

mod schema;

pub use schema::*;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Session not found: {0}")]
    SessionNotFound(String),
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[allow(dead_code)] // Used in tests
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.busy_timeout(Duration::from_secs(5))?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn run_migrations(&self) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    // ==================== Session Operations ====================

    /// Get the stored session for a user, if any
    ///
    /// A row whose state no longer deserializes is treated as absent, so
    /// the user falls back to the expired-session path instead of being
    /// wedged on an unreadable row.
    pub fn get_session(&self, user_id: &str) -> DbResult<Option<Session>> {
        let conn = self.conn.lock().unwrap();
        let state_json: String = match conn.query_row(
            "SELECT state FROM sessions WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        ) {
            Ok(json) => json,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(other) => return Err(DbError::Sqlite(other)),
        };

        match serde_json::from_str(&state_json) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Discarding unreadable session state");
                Ok(None)
            }
        }
    }

    /// Write the session for a user, creating or replacing it
    pub fn put_session(&self, user_id: &str, session: &Session) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        let state_json = serde_json::to_string(session).unwrap();

        conn.execute(
            "INSERT OR REPLACE INTO sessions (user_id, state, updated_at) VALUES (?1, ?2, ?3)",
            params![user_id, state_json, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Update the session for a user that must already exist
    pub fn update_session(&self, user_id: &str, session: &Session) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        let state_json = serde_json::to_string(session).unwrap();

        let updated = conn.execute(
            "UPDATE sessions SET state = ?1, updated_at = ?2 WHERE user_id = ?3",
            params![state_json, Utc::now().to_rfc3339(), user_id],
        )?;

        if updated == 0 {
            return Err(DbError::SessionNotFound(user_id.to_string()));
        }
        Ok(())
    }

    /// Delete the session for a user
    ///
    /// Deleting a session that does not exist is not an error.
    pub fn delete_session(&self, user_id: &str) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM sessions WHERE user_id = ?1", params![user_id])?;
        Ok(())
    }

    // ==================== Profile Operations ====================

    /// Check whether a user has completed registration
    pub fn profile_exists(&self, user_id: &str) -> DbResult<bool> {
        let conn = self.conn.lock().unwrap();
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM profiles WHERE user_id = ?1)",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Get the registration profile for a user
    #[allow(dead_code)] // Used in tests
    pub fn get_profile(&self, user_id: &str) -> DbResult<UserProfile> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT user_id, ministry, sutra_name, name, registered_at FROM profiles WHERE user_id = ?1",
            params![user_id],
            |row| {
                Ok(UserProfile {
                    user_id: row.get(0)?,
                    ministry: row.get(1)?,
                    sutra_name: row.get(2)?,
                    name: row.get(3)?,
                    registered_at: parse_datetime(&row.get::<_, String>(4)?),
                })
            },
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DbError::ProfileNotFound(user_id.to_string()),
            other => DbError::Sqlite(other),
        })
    }

    /// Store a registration profile, replacing any previous one
    pub fn create_profile(&self, user_id: &str, profile: &NewProfile) -> DbResult<UserProfile> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now();

        conn.execute(
            "INSERT OR REPLACE INTO profiles (user_id, ministry, sutra_name, name, registered_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user_id,
                profile.ministry,
                profile.sutra_name,
                profile.name,
                now.to_rfc3339(),
            ],
        )?;

        Ok(UserProfile {
            user_id: user_id.to_string(),
            ministry: profile.ministry.clone(),
            sutra_name: profile.sutra_name.clone(),
            name: profile.name.clone(),
            registered_at: now,
        })
    }

    // ==================== Record Operations ====================

    /// Append a completed practice record
    pub fn append_record(&self, user_id: &str, record: &NewRecord) -> DbResult<PracticeRecord> {
        let conn = self.conn.lock().unwrap();
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO records (id, user_id, location, date, category, items, description, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                id,
                user_id,
                record.location,
                record.date,
                record.category,
                record.items,
                record.description,
                now.to_rfc3339(),
            ],
        )?;

        Ok(PracticeRecord {
            id,
            user_id: user_id.to_string(),
            location: record.location.clone(),
            date: record.date.clone(),
            category: record.category.clone(),
            items: record.items.clone(),
            description: record.description.clone(),
            created_at: now,
        })
    }

    /// List a user's practice records, oldest first
    #[allow(dead_code)] // Used in tests
    pub fn list_records(&self, user_id: &str) -> DbResult<Vec<PracticeRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, location, date, category, items, description, created_at
             FROM records WHERE user_id = ?1 ORDER BY rowid ASC",
        )?;

        let rows = stmt.query_map(params![user_id], parse_record_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }
}

/// Parse a practice record row from the database
fn parse_record_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PracticeRecord> {
    Ok(PracticeRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        location: row.get(2)?,
        date: row.get(3)?,
        category: row.get(4)?,
        items: row.get(5)?,
        description: row.get(6)?,
        created_at: parse_datetime(&row.get::<_, String>(7)?),
    })
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}
