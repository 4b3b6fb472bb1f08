//! Report wizard conversation engine
//!
//! Pure state transitions over per-user sessions: events go in, effects
//! come out, and the runtime executes them against storage and LINE.

mod effect;
pub mod event;
pub mod payload;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::{Event, PostbackAction};
pub use payload::PostbackData;
pub use state::{Session, WizardContext};
#[allow(unused_imports)] // Reply constants are re-exported as a set
pub use transition::{
    transition, TransitionResult, NO_ITEMS, REGISTER_TRIGGER, REPLY_ALREADY_REGISTERED,
    REPLY_DATE_MISSING, REPLY_MALFORMED_PAYLOAD, REPLY_NOT_REGISTERED, REPLY_REGISTER_FORMAT,
    REPLY_REGISTER_PROMPT, REPLY_REPORT_DONE, REPLY_SESSION_EXPIRED, REPORT_TRIGGER,
};
