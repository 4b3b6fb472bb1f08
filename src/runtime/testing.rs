//! Mock implementations for testing
//!
//! These mocks enable exercising the event processor without real I/O.

use super::traits::*;
use crate::db::{NewProfile, NewRecord, Session};
use crate::line::{LineError, OutboundMessage};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

// ============================================================================
// In-Memory Store
// ============================================================================

/// In-memory store for testing
///
/// Mirrors the production contract: `update_session` requires an existing
/// row, `delete_session` is idempotent, `create_profile` replaces.
#[allow(dead_code)]
pub struct MemoryStore {
    sessions: Mutex<HashMap<String, Session>>,
    profiles: Mutex<HashMap<String, NewProfile>>,
    records: Mutex<Vec<(String, NewRecord)>>,
    fail_with: Mutex<Option<String>>,
}

#[allow(dead_code)]
impl MemoryStore {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            profiles: Mutex::new(HashMap::new()),
            records: Mutex::new(Vec::new()),
            fail_with: Mutex::new(None),
        }
    }

    /// Make every subsequent store call fail with the given message
    pub fn fail_with(&self, message: &str) {
        *self.fail_with.lock().unwrap() = Some(message.to_string());
    }

    /// Get the stored session for a user
    pub fn session(&self, user_id: &str) -> Option<Session> {
        self.sessions.lock().unwrap().get(user_id).cloned()
    }

    /// Get the stored profile for a user
    pub fn profile(&self, user_id: &str) -> Option<NewProfile> {
        self.profiles.lock().unwrap().get(user_id).cloned()
    }

    /// Get all appended records as (user_id, record) pairs
    pub fn records(&self) -> Vec<(String, NewRecord)> {
        self.records.lock().unwrap().clone()
    }

    /// Seed a profile so the user counts as registered
    pub fn seed_profile(&self, user_id: &str) {
        self.profiles.lock().unwrap().insert(
            user_id.to_string(),
            NewProfile {
                ministry: "青年部".to_string(),
                sutra_name: "經親".to_string(),
                name: "測試".to_string(),
            },
        );
    }

    /// Seed a session directly
    pub fn seed_session(&self, user_id: &str, session: Session) {
        self.sessions
            .lock()
            .unwrap()
            .insert(user_id.to_string(), session);
    }

    fn check_fail(&self) -> Result<(), String> {
        match self.fail_with.lock().unwrap().as_ref() {
            Some(message) => Err(message.clone()),
            None => Ok(()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn get_session(&self, user_id: &str) -> Result<Option<Session>, String> {
        self.check_fail()?;
        Ok(self.sessions.lock().unwrap().get(user_id).cloned())
    }

    async fn put_session(&self, user_id: &str, session: &Session) -> Result<(), String> {
        self.check_fail()?;
        self.sessions
            .lock()
            .unwrap()
            .insert(user_id.to_string(), session.clone());
        Ok(())
    }

    async fn update_session(&self, user_id: &str, session: &Session) -> Result<(), String> {
        self.check_fail()?;
        let mut sessions = self.sessions.lock().unwrap();
        if !sessions.contains_key(user_id) {
            return Err(format!("Session not found: {user_id}"));
        }
        sessions.insert(user_id.to_string(), session.clone());
        Ok(())
    }

    async fn delete_session(&self, user_id: &str) -> Result<(), String> {
        self.check_fail()?;
        self.sessions.lock().unwrap().remove(user_id);
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn profile_exists(&self, user_id: &str) -> Result<bool, String> {
        self.check_fail()?;
        Ok(self.profiles.lock().unwrap().contains_key(user_id))
    }

    async fn create_profile(&self, user_id: &str, profile: &NewProfile) -> Result<(), String> {
        self.check_fail()?;
        self.profiles
            .lock()
            .unwrap()
            .insert(user_id.to_string(), profile.clone());
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn append_record(&self, user_id: &str, record: &NewRecord) -> Result<(), String> {
        self.check_fail()?;
        self.records
            .lock()
            .unwrap()
            .push((user_id.to_string(), record.clone()));
        Ok(())
    }
}

// ============================================================================
// Recording Reply Sender
// ============================================================================

/// Reply sender that records successful sends
#[allow(dead_code)]
pub struct RecordingSender {
    /// (reply_token, messages) pairs in send order
    pub sent: Mutex<Vec<(String, Vec<OutboundMessage>)>>,
    failures: Mutex<VecDeque<LineError>>,
}

#[allow(dead_code)]
impl RecordingSender {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failures: Mutex::new(VecDeque::new()),
        }
    }

    /// Queue an error for the next send
    pub fn queue_failure(&self, error: LineError) {
        self.failures.lock().unwrap().push_back(error);
    }

    /// Get recorded sends
    pub fn recorded(&self) -> Vec<(String, Vec<OutboundMessage>)> {
        self.sent.lock().unwrap().clone()
    }

    /// Get just the messages, flattened across sends
    pub fn messages(&self) -> Vec<OutboundMessage> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .flat_map(|(_, messages)| messages.clone())
            .collect()
    }
}

impl Default for RecordingSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReplySender for RecordingSender {
    async fn send_reply(
        &self,
        reply_token: &str,
        messages: &[OutboundMessage],
    ) -> Result<(), LineError> {
        if let Some(error) = self.failures.lock().unwrap().pop_front() {
            return Err(error);
        }
        self.sent
            .lock()
            .unwrap()
            .push((reply_token.to_string(), messages.to_vec()));
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_update_requires_existing_session() {
        let store = MemoryStore::new();

        let session = Session::Registering;
        assert!(store.update_session("U1", &session).await.is_err());

        store.put_session("U1", &session).await.unwrap();
        store.update_session("U1", &session).await.unwrap();
        assert_eq!(store.session("U1"), Some(Session::Registering));
    }

    #[tokio::test]
    async fn test_memory_store_delete_is_idempotent() {
        let store = MemoryStore::new();

        store.put_session("U1", &Session::Registering).await.unwrap();
        store.delete_session("U1").await.unwrap();
        store.delete_session("U1").await.unwrap();
        assert_eq!(store.session("U1"), None);
    }

    #[tokio::test]
    async fn test_memory_store_scripted_failure() {
        let store = MemoryStore::new();
        store.fail_with("disk on fire");

        let err = store.get_session("U1").await.unwrap_err();
        assert_eq!(err, "disk on fire");
        let err = store.profile_exists("U1").await.unwrap_err();
        assert_eq!(err, "disk on fire");
    }

    #[tokio::test]
    async fn test_recording_sender_queued_failure_is_consumed() {
        let sender = RecordingSender::new();
        sender.queue_failure(LineError::server_error("LINE is down"));

        let messages = vec![OutboundMessage::text("hello")];
        assert!(sender.send_reply("tok-1", &messages).await.is_err());
        assert!(sender.recorded().is_empty());

        // Next send goes through
        sender.send_reply("tok-2", &messages).await.unwrap();
        let recorded = sender.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].0, "tok-2");
    }
}
