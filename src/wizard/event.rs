//! Events that drive the wizard

use super::payload::PostbackData;

/// The five button actions the wizard's own menus round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostbackAction {
    SelectLocation,
    SetDate,
    SelectCategory,
    ToggleItem,
    ConfirmItems,
}

impl PostbackAction {
    /// Wire name used in postback `data` strings.
    pub fn as_str(self) -> &'static str {
        match self {
            PostbackAction::SelectLocation => "select_loc",
            PostbackAction::SetDate => "set_date",
            PostbackAction::SelectCategory => "select_cat",
            PostbackAction::ToggleItem => "toggle_item",
            PostbackAction::ConfirmItems => "confirm_items",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "select_loc" => Some(PostbackAction::SelectLocation),
            "set_date" => Some(PostbackAction::SetDate),
            "select_cat" => Some(PostbackAction::SelectCategory),
            "toggle_item" => Some(PostbackAction::ToggleItem),
            "confirm_items" => Some(PostbackAction::ConfirmItems),
            _ => None,
        }
    }
}

/// One inbound event for a single user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Button tap. `action` is `None` when the data string carried no
    /// recognized action, which the engine ignores.
    Postback {
        action: Option<PostbackAction>,
        data: PostbackData,
        /// `params.date` from a native date-picker tap (`YYYY-MM-DD`).
        date_param: Option<String>,
    },

    /// Free-text message, trimmed.
    Text { text: String },
}

impl Event {
    /// Build a postback event from the raw `data` string.
    pub fn postback(data: &str, date_param: Option<String>) -> Self {
        let data = PostbackData::parse(data);
        let action = data
            .get_non_empty("action")
            .and_then(PostbackAction::parse);
        Event::Postback {
            action,
            data,
            date_param,
        }
    }

    /// Build a text event, trimming surrounding whitespace.
    pub fn text(text: &str) -> Self {
        Event::Text {
            text: text.trim().to_string(),
        }
    }
}
