//! Event processing runtime
//!
//! Bridges the pure wizard transition to real I/O: the processor loads
//! conversation state through the store traits, runs the transition, and
//! executes the resulting effects against storage and LINE.

mod processor;
pub mod traits;

#[cfg(test)]
pub mod testing;

#[allow(unused_imports)] // Public API re-exports
pub use processor::{EventProcessor, InboundEvent, ProcessError};
pub use traits::*;

use crate::line::LineClient;

/// Type alias for production processor with concrete implementations
pub type ProductionProcessor = EventProcessor<DatabaseStore, LineClient>;
