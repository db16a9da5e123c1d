//! Discord webhook payloads.
//!
//! Only the subset of the execute-webhook body this tool sends is modelled: plain `content`,
//! components v2 layouts (container, text display, separator) and `allowed_mentions`.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// Message flag that switches the message to the components v2 layout system.
pub const IS_COMPONENTS_V2: u32 = 1 << 15;

/// Discord's "darker grey" palette colour.
pub const DARKER_GREY: u32 = 0x0054_6E7A;

const CONTAINER: u8 = 17;
const TEXT_DISPLAY: u8 = 10;
const SEPARATOR: u8 = 14;

#[derive(Debug, Serialize)]
pub struct WebhookMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_mentions: Option<AllowedMentions>,
}

impl WebhookMessage {
    /// The status notification card for `service`, stamped with `at`.
    #[must_use]
    pub fn status(service: &str, status: &str, at: DateTime<Utc>) -> Self {
        Self {
            content: None,
            components: vec![Component::Container(status_container(service, status, at))],
            flags: Some(IS_COMPONENTS_V2),
            // Service names are user input, never let them ping anyone
            allowed_mentions: Some(AllowedMentions::none()),
        }
    }

    /// A plain text message whose broadcast mentions are allowed to notify.
    #[must_use]
    pub fn mention(text: &str) -> Self {
        Self {
            content: Some(text.to_string()),
            components: Vec::new(),
            flags: None,
            allowed_mentions: Some(AllowedMentions {
                parse: vec![MentionKind::Everyone, MentionKind::Users, MentionKind::Roles],
            }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AllowedMentions {
    pub parse: Vec<MentionKind>,
}

impl AllowedMentions {
    #[must_use]
    pub fn none() -> Self {
        Self { parse: Vec::new() }
    }
}

/// `everyone` covers both `@everyone` and `@here`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MentionKind {
    Everyone,
    Users,
    Roles,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Component {
    Container(Container),
    TextDisplay(TextDisplay),
    Separator(Separator),
}

#[derive(Debug, Serialize)]
pub struct Container {
    #[serde(rename = "type")]
    kind: u8,
    pub accent_color: u32,
    pub spoiler: bool,
    pub components: Vec<Component>,
}

impl Container {
    #[must_use]
    pub fn new(accent_color: u32, components: Vec<Component>) -> Self {
        Self {
            kind: CONTAINER,
            accent_color,
            spoiler: false,
            components,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TextDisplay {
    #[serde(rename = "type")]
    kind: u8,
    pub content: String,
}

impl TextDisplay {
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            kind: TEXT_DISPLAY,
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Separator {
    #[serde(rename = "type")]
    kind: u8,
    pub divider: bool,
    pub spacing: Spacing,
}

impl Separator {
    #[must_use]
    pub fn new(divider: bool, spacing: Spacing) -> Self {
        Self {
            kind: SEPARATOR,
            divider,
            spacing,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spacing {
    Small = 1,
    Large = 2,
}

impl Serialize for Spacing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

impl From<TextDisplay> for Component {
    fn from(text: TextDisplay) -> Self {
        Component::TextDisplay(text)
    }
}

impl From<Separator> for Component {
    fn from(separator: Separator) -> Self {
        Component::Separator(separator)
    }
}

/// Builds the status card: title, service and status fields, and a relative timestamp.
#[must_use]
pub fn status_container(service: &str, status: &str, at: DateTime<Utc>) -> Container {
    let items = vec![
        TextDisplay::new("## Status Notification").into(),
        Separator::new(true, Spacing::Large).into(),
        TextDisplay::new(format!("Service: `{service}`")).into(),
        TextDisplay::new(format!("New status: `{status}`")).into(),
        Separator::new(true, Spacing::Small).into(),
        TextDisplay::new(format!("Alert triggered at <t:{}:R>", at.timestamp())).into(),
    ];

    Container::new(DARKER_GREY, items)
}
