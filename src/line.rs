//! LINE Messaging API integration
//!
//! Wire types for outbound messages, an error taxonomy, and the reply
//! client. Inbound webhook parsing lives in `api::types`.

mod client;
mod error;
mod types;

pub use client::{LineClient, LineConfig};
#[allow(unused_imports)] // Public API re-exports
pub use error::{LineError, LineErrorKind};
pub use types::{FlexAction, FlexBox, FlexComponent, FlexContainer, OutboundMessage};
