//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the event processor with mock
//! implementations.

use crate::db::{NewProfile, NewRecord, Session};
use crate::line::{LineError, OutboundMessage};
use async_trait::async_trait;

/// Storage for wizard sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Get the stored session for a user, if any
    async fn get_session(&self, user_id: &str) -> Result<Option<Session>, String>;

    /// Write the session for a user, creating or replacing it
    async fn put_session(&self, user_id: &str, session: &Session) -> Result<(), String>;

    /// Update the session for a user that must already exist
    async fn update_session(&self, user_id: &str, session: &Session) -> Result<(), String>;

    /// Delete the session for a user; absent rows are fine
    async fn delete_session(&self, user_id: &str) -> Result<(), String>;
}

/// Storage for member profiles
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Check whether a user has completed registration
    async fn profile_exists(&self, user_id: &str) -> Result<bool, String>;

    /// Store a registration profile
    async fn create_profile(&self, user_id: &str, profile: &NewProfile) -> Result<(), String>;
}

/// Storage for practice records
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Append a completed practice record
    async fn append_record(&self, user_id: &str, record: &NewRecord) -> Result<(), String>;
}

/// Sender for reply messages
#[async_trait]
pub trait ReplySender: Send + Sync {
    /// Send messages against a single-use reply token
    async fn send_reply(
        &self,
        reply_token: &str,
        messages: &[OutboundMessage],
    ) -> Result<(), LineError>;
}

/// Combined storage trait for convenience
pub trait BotStore: SessionStore + ProfileStore + RecordStore {}
impl<T: SessionStore + ProfileStore + RecordStore> BotStore for T {}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    async fn get_session(&self, user_id: &str) -> Result<Option<Session>, String> {
        (**self).get_session(user_id).await
    }

    async fn put_session(&self, user_id: &str, session: &Session) -> Result<(), String> {
        (**self).put_session(user_id, session).await
    }

    async fn update_session(&self, user_id: &str, session: &Session) -> Result<(), String> {
        (**self).update_session(user_id, session).await
    }

    async fn delete_session(&self, user_id: &str) -> Result<(), String> {
        (**self).delete_session(user_id).await
    }
}

#[async_trait]
impl<T: ProfileStore + ?Sized> ProfileStore for Arc<T> {
    async fn profile_exists(&self, user_id: &str) -> Result<bool, String> {
        (**self).profile_exists(user_id).await
    }

    async fn create_profile(&self, user_id: &str, profile: &NewProfile) -> Result<(), String> {
        (**self).create_profile(user_id, profile).await
    }
}

#[async_trait]
impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    async fn append_record(&self, user_id: &str, record: &NewRecord) -> Result<(), String> {
        (**self).append_record(user_id, record).await
    }
}

#[async_trait]
impl<T: ReplySender + ?Sized> ReplySender for Arc<T> {
    async fn send_reply(
        &self,
        reply_token: &str,
        messages: &[OutboundMessage],
    ) -> Result<(), LineError> {
        (**self).send_reply(reply_token, messages).await
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

use crate::db::Database;
use crate::line::LineClient;
use std::sync::Arc;

/// Adapter to use Database as the bot store
#[derive(Clone)]
pub struct DatabaseStore {
    db: Database,
}

impl DatabaseStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionStore for DatabaseStore {
    async fn get_session(&self, user_id: &str) -> Result<Option<Session>, String> {
        self.db.get_session(user_id).map_err(|e| e.to_string())
    }

    async fn put_session(&self, user_id: &str, session: &Session) -> Result<(), String> {
        self.db
            .put_session(user_id, session)
            .map_err(|e| e.to_string())
    }

    async fn update_session(&self, user_id: &str, session: &Session) -> Result<(), String> {
        self.db
            .update_session(user_id, session)
            .map_err(|e| e.to_string())
    }

    async fn delete_session(&self, user_id: &str) -> Result<(), String> {
        self.db.delete_session(user_id).map_err(|e| e.to_string())
    }
}

#[async_trait]
impl ProfileStore for DatabaseStore {
    async fn profile_exists(&self, user_id: &str) -> Result<bool, String> {
        self.db.profile_exists(user_id).map_err(|e| e.to_string())
    }

    async fn create_profile(&self, user_id: &str, profile: &NewProfile) -> Result<(), String> {
        self.db
            .create_profile(user_id, profile)
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl RecordStore for DatabaseStore {
    async fn append_record(&self, user_id: &str, record: &NewRecord) -> Result<(), String> {
        self.db
            .append_record(user_id, record)
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl ReplySender for LineClient {
    async fn send_reply(
        &self,
        reply_token: &str,
        messages: &[OutboundMessage],
    ) -> Result<(), LineError> {
        self.reply(reply_token, messages).await
    }
}
