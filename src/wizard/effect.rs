//! Effects produced by wizard transitions

use super::Session;
use crate::db::{NewProfile, NewRecord};
use crate::line::OutboundMessage;

/// Effects to be executed after a transition.
///
/// The transition function never touches storage or the network; it
/// describes what should happen and the runtime carries it out in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Create or replace the user's session
    PutSession { session: Session },

    /// Overwrite a session that is known to exist.
    ///
    /// Same write as `PutSession` on the happy path, but the store
    /// reports a missing row instead of resurrecting an expired flow.
    UpdateSession { session: Session },

    /// Remove the user's session, if any
    DeleteSession,

    /// Insert the user's registration profile
    CreateProfile { profile: NewProfile },

    /// Append a completed practice record
    AppendRecord { record: NewRecord },

    /// Send one message against the event's reply token
    Reply { message: OutboundMessage },
}

impl Effect {
    pub fn put_session(session: Session) -> Self {
        Effect::PutSession { session }
    }

    pub fn update_session(session: Session) -> Self {
        Effect::UpdateSession { session }
    }

    pub fn reply(message: OutboundMessage) -> Self {
        Effect::Reply { message }
    }

    pub fn reply_text(text: impl Into<String>) -> Self {
        Effect::Reply {
            message: OutboundMessage::text(text),
        }
    }
}
