//! Wizard session types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-user conversation session.
///
/// A user with no stored session has nothing in progress; the absence of a
/// row is the "session timeout" condition for step-dependent actions. Each
/// variant carries exactly the fields that are meaningful for its step, so
/// a half-filled wizard state cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Session {
    /// Awaiting the "部會 經名 姓名" registration line.
    Registering,

    /// Step 4: multi-select of practice items for the chosen category.
    SelectingItems {
        location: String,
        date: String,
        category: String,
        /// In-progress selection. Order is selection order; membership is
        /// by value equality; toggling removes the first match.
        items: Vec<String>,
    },

    /// Step 5: items are frozen, awaiting the free-text description.
    AwaitingDescription {
        location: String,
        date: String,
        category: String,
        /// Comma-joined snapshot of the step-4 selection, or the `無`
        /// sentinel when nothing was selected.
        items: String,
    },
}

impl Session {
    /// Fresh step-4 session with an empty selection.
    pub fn selecting_items(
        location: impl Into<String>,
        date: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Session::SelectingItems {
            location: location.into(),
            date: date.into(),
            category: category.into(),
            items: Vec::new(),
        }
    }

    /// Step discriminant for structured logs.
    pub fn step_name(&self) -> &'static str {
        match self {
            Session::Registering => "registering",
            Session::SelectingItems { .. } => "selecting_items",
            Session::AwaitingDescription { .. } => "awaiting_description",
        }
    }
}

/// Facts the pure transition needs from outside the session.
///
/// Resolved by the caller per event so `transition` stays free of I/O.
#[derive(Debug, Clone, Copy)]
pub struct WizardContext {
    /// Whether a profile exists for this user (the registration gate).
    pub registered: bool,
    /// Calendar date in the bot's home timezone (UTC+8), used by the
    /// date-menu "today" shortcut.
    pub today: NaiveDate,
}

impl WizardContext {
    pub fn new(registered: bool, today: NaiveDate) -> Self {
        Self { registered, today }
    }
}
