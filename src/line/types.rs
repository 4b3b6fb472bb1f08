//! Outbound message types for the LINE Messaging API
//!
//! Only the subset of the Flex Message schema the menus actually use is
//! modeled here. Everything serializes into the exact JSON the reply
//! endpoint expects, so these types are `Serialize`-only.

use serde::Serialize;

/// A single message in a reply payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    Flex {
        alt_text: String,
        contents: FlexContainer,
    },
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        OutboundMessage::Text { text: text.into() }
    }

    pub fn flex(alt_text: impl Into<String>, contents: FlexContainer) -> Self {
        OutboundMessage::Flex {
            alt_text: alt_text.into(),
            contents,
        }
    }
}

/// Top-level Flex container
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlexContainer {
    Bubble { header: FlexBox, body: FlexBox },
}

impl FlexContainer {
    pub fn bubble(header: FlexBox, body: FlexBox) -> Self {
        FlexContainer::Bubble { header, body }
    }
}

/// Vertical box holding a list of components
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlexBox {
    r#type: &'static str,
    layout: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    spacing: Option<&'static str>,
    contents: Vec<FlexComponent>,
}

impl FlexBox {
    pub fn vertical(contents: Vec<FlexComponent>) -> Self {
        Self {
            r#type: "box",
            layout: "vertical",
            spacing: None,
            contents,
        }
    }

    pub fn vertical_spaced(spacing: &'static str, contents: Vec<FlexComponent>) -> Self {
        Self {
            spacing: Some(spacing),
            ..Self::vertical(contents)
        }
    }
}

/// Component inside a box
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlexComponent {
    Text {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        weight: Option<&'static str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        size: Option<&'static str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<&'static str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        wrap: Option<bool>,
    },
    Button {
        style: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<&'static str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        height: Option<&'static str>,
        action: FlexAction,
    },
    Separator {
        margin: &'static str,
    },
}

/// Action attached to a button
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlexAction {
    Postback { label: String, data: String },
    Datetimepicker {
        label: String,
        data: String,
        mode: &'static str,
    },
}

impl FlexAction {
    pub fn postback(label: impl Into<String>, data: impl Into<String>) -> Self {
        FlexAction::Postback {
            label: label.into(),
            data: data.into(),
        }
    }

    /// Native date picker (LINE renders the calendar client-side)
    pub fn date_picker(label: impl Into<String>, data: impl Into<String>) -> Self {
        FlexAction::Datetimepicker {
            label: label.into(),
            data: data.into(),
            mode: "date",
        }
    }
}
