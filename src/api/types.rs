//! LINE webhook wire types
//!
//! The subset of the Messaging API webhook payload the bot consumes.
//! Unknown event and message types deserialize into catch-all variants so
//! a delivery never fails to parse when LINE introduces new ones.

use crate::runtime::InboundEvent;
use crate::wizard::Event;
use serde::Deserialize;

/// Webhook request body
#[derive(Debug, Deserialize)]
pub struct WebhookEnvelope {
    /// Bot's channel identity, present in every delivery
    #[allow(dead_code)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// One event within a webhook delivery
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WebhookEvent {
    Message {
        #[serde(rename = "replyToken")]
        reply_token: Option<String>,
        source: Option<EventSource>,
        message: InboundMessage,
    },
    Postback {
        #[serde(rename = "replyToken")]
        reply_token: Option<String>,
        source: Option<EventSource>,
        postback: PostbackPayload,
    },
    /// Event types the bot does not handle (follow, unfollow, join, ...)
    #[serde(other)]
    Unknown,
}

/// Sender of an event. `user_id` is absent for some group and room
/// sources.
#[derive(Debug, Deserialize)]
pub struct EventSource {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// Message content within a message event
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    Text { text: String },
    /// Stickers, images, audio and other non-text content
    #[serde(other)]
    Unsupported,
}

/// Postback content within a postback event
#[derive(Debug, Deserialize)]
pub struct PostbackPayload {
    pub data: String,
    pub params: Option<PostbackParams>,
}

/// Parameters attached by a datetime picker action
#[derive(Debug, Deserialize)]
pub struct PostbackParams {
    pub date: Option<String>,
}

impl WebhookEvent {
    /// Convert to a processor event. Returns `None` when the event
    /// carries nothing the bot can act on: an unhandled type, non-text
    /// message content, or a missing sender or reply token.
    pub fn into_inbound(self) -> Option<InboundEvent> {
        match self {
            WebhookEvent::Message {
                reply_token,
                source,
                message,
            } => {
                let user_id = source?.user_id?;
                let reply_token = reply_token?;
                match message {
                    InboundMessage::Text { text } => Some(InboundEvent {
                        user_id,
                        reply_token,
                        event: Event::text(&text),
                    }),
                    InboundMessage::Unsupported => None,
                }
            }

            WebhookEvent::Postback {
                reply_token,
                source,
                postback,
            } => {
                let user_id = source?.user_id?;
                let reply_token = reply_token?;
                let date_param = postback.params.and_then(|p| p.date);
                Some(InboundEvent {
                    user_id,
                    reply_token,
                    event: Event::postback(&postback.data, date_param),
                })
            }

            WebhookEvent::Unknown => None,
        }
    }
}
