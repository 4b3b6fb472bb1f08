//! Webhook event processor
//!
//! Per event: load the caller's session and registration flag, run the
//! pure wizard transition, then execute the returned effects against the
//! store and the reply sender, in order.

use super::traits::{BotStore, ReplySender};
use crate::line::LineError;
use crate::wizard::{transition, Effect, Event, Session, WizardContext};
use chrono::{Duration, NaiveDate, Utc};
use futures::future;
use thiserror::Error;

/// Errors that abort processing of a single event
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Store error: {0}")]
    Store(String),
    #[error("Reply error: {0}")]
    Reply(#[from] LineError),
}

/// One webhook event addressed to the processor
#[derive(Debug, Clone)]
pub struct InboundEvent {
    pub user_id: String,
    pub reply_token: String,
    pub event: Event,
}

/// Executes wizard transitions against storage and the reply channel
pub struct EventProcessor<S, R> {
    store: S,
    sender: R,
}

impl<S: BotStore, R: ReplySender> EventProcessor<S, R> {
    pub fn new(store: S, sender: R) -> Self {
        Self { store, sender }
    }

    /// Process one webhook delivery.
    ///
    /// Events are grouped by user in first-seen order; groups run
    /// concurrently while events within a group run sequentially, so one
    /// user's taps apply in arrival order. Every event is attempted; a
    /// failure never aborts its siblings. Returns the failures that
    /// occurred, if any.
    pub async fn process_batch(&self, events: Vec<InboundEvent>) -> Vec<ProcessError> {
        let mut groups: Vec<(String, Vec<InboundEvent>)> = Vec::new();
        for event in events {
            match groups
                .iter_mut()
                .find(|(user_id, _)| *user_id == event.user_id)
            {
                Some((_, group)) => group.push(event),
                None => groups.push((event.user_id.clone(), vec![event])),
            }
        }

        let runs = groups
            .into_iter()
            .map(|(_, group)| self.process_group(group));
        future::join_all(runs).await.into_iter().flatten().collect()
    }

    async fn process_group(&self, group: Vec<InboundEvent>) -> Vec<ProcessError> {
        let mut errors = Vec::new();
        for event in group {
            let user_id = event.user_id.clone();
            if let Err(e) = self.process_event(event).await {
                match &e {
                    ProcessError::Reply(reply_err) if reply_err.is_retryable() => {
                        tracing::warn!(user_id = %user_id, error = %e, "Reply send failed");
                    }
                    _ => {
                        tracing::error!(user_id = %user_id, error = %e, "Event processing failed");
                    }
                }
                errors.push(e);
            }
        }
        errors
    }

    /// Process a single event end to end
    pub async fn process_event(&self, event: InboundEvent) -> Result<(), ProcessError> {
        let InboundEvent {
            user_id,
            reply_token,
            event,
        } = event;

        let session = self
            .store
            .get_session(&user_id)
            .await
            .map_err(ProcessError::Store)?;
        let registered = self
            .store
            .profile_exists(&user_id)
            .await
            .map_err(ProcessError::Store)?;

        tracing::debug!(
            user_id = %user_id,
            step = session.as_ref().map_or("none", Session::step_name),
            registered,
            "Processing event"
        );

        let context = WizardContext::new(registered, today_taipei());
        let result = transition(session.as_ref(), &context, event);

        for effect in result.effects {
            self.execute_effect(&user_id, &reply_token, effect).await?;
        }
        Ok(())
    }

    async fn execute_effect(
        &self,
        user_id: &str,
        reply_token: &str,
        effect: Effect,
    ) -> Result<(), ProcessError> {
        match effect {
            Effect::PutSession { session } => self
                .store
                .put_session(user_id, &session)
                .await
                .map_err(ProcessError::Store),

            Effect::UpdateSession { session } => self
                .store
                .update_session(user_id, &session)
                .await
                .map_err(ProcessError::Store),

            Effect::DeleteSession => self
                .store
                .delete_session(user_id)
                .await
                .map_err(ProcessError::Store),

            Effect::CreateProfile { profile } => {
                self.store
                    .create_profile(user_id, &profile)
                    .await
                    .map_err(ProcessError::Store)?;
                tracing::info!(user_id = %user_id, name = %profile.name, "Profile registered");
                Ok(())
            }

            Effect::AppendRecord { record } => {
                self.store
                    .append_record(user_id, &record)
                    .await
                    .map_err(ProcessError::Store)?;
                tracing::info!(
                    user_id = %user_id,
                    location = %record.location,
                    date = %record.date,
                    "Practice record stored"
                );
                Ok(())
            }

            Effect::Reply { message } => {
                self.sender.send_reply(reply_token, &[message]).await?;
                Ok(())
            }
        }
    }
}

/// Calendar date in the bot's home timezone (UTC+8)
pub(crate) fn today_taipei() -> NaiveDate {
    (Utc::now() + Duration::hours(8)).date_naive()
}
