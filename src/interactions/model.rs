//! Wire types for interactions and their responses.

use serde::{Deserialize, Serialize};

/// Message flag marking a response as visible only to the invoking user.
pub const EPHEMERAL: u32 = 1 << 6;

/// A single signed webhook event from the chat platform. Immutable once parsed; the `id` and
/// `token` identify the exchange for its entire lifetime, including any deferred completion.
#[derive(Deserialize, Debug, Clone)]
pub struct Interaction {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    #[serde(default)]
    pub token: String,
    pub data: Option<InteractionData>,
}

impl Interaction {
    /// The string value of the named command option, if present.
    pub fn option_str(&self, name: &str) -> Option<&str> {
        self.data
            .as_ref()?
            .options
            .iter()
            .find(|opt| opt.name == name)
            .and_then(|opt| opt.value.as_str())
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(from = "u8")]
pub enum InteractionKind {
    Ping,
    Command,
    Component,
    /// An interaction type this service doesn't recognize. Answered with 501 rather than
    /// rejected at parse time, so new platform types degrade gracefully.
    Unknown(u8),
}

impl From<u8> for InteractionKind {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Ping,
            2 => Self::Command,
            3 => Self::Component,
            other => Self::Unknown(other),
        }
    }
}

/// Payload of a command or component interaction. The platform reuses one `data` field for
/// both kinds: commands carry `id`/`name`/`options`, components carry `custom_id`.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct InteractionData {
    pub id: Option<String>,
    pub name: Option<String>,
    pub custom_id: Option<String>,
    #[serde(default)]
    pub options: Vec<CommandOption>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CommandOption {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: u8,
    pub value: serde_json::Value,
}

/// The value returned to the platform. Exactly one envelope is produced on the synchronous
/// path; deferred handlers follow up with at most one edit of the original response.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ResponseEnvelope {
    #[serde(rename = "type")]
    pub kind: ResponseKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<MessageData>,
}

impl ResponseEnvelope {
    pub fn pong() -> Self {
        Self {
            kind: ResponseKind::Pong,
            data: None,
        }
    }

    pub fn message(data: MessageData) -> Self {
        Self {
            kind: ResponseKind::ChannelMessage,
            data: Some(data),
        }
    }

    /// The acknowledgement sent when the real work will finish later via an edit.
    pub fn deferred() -> Self {
        Self {
            kind: ResponseKind::DeferredChannelMessage,
            data: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(into = "u8", from = "u8")]
pub enum ResponseKind {
    Pong,
    ChannelMessage,
    DeferredChannelMessage,
    Unknown(u8),
}

impl From<ResponseKind> for u8 {
    fn from(kind: ResponseKind) -> Self {
        match kind {
            ResponseKind::Pong => 1,
            ResponseKind::ChannelMessage => 4,
            ResponseKind::DeferredChannelMessage => 5,
            ResponseKind::Unknown(other) => other,
        }
    }
}

impl From<u8> for ResponseKind {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Pong,
            4 => Self::ChannelMessage,
            5 => Self::DeferredChannelMessage,
            other => Self::Unknown(other),
        }
    }
}

/// The visible content of a response or of an edit to the original response.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct MessageData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embeds: Option<Vec<Embed>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<ActionRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u32>,
}

impl MessageData {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// A plain text message visible only to the invoking user.
    pub fn ephemeral_text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            flags: Some(EPHEMERAL),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_embed(mut self, embed: Embed) -> Self {
        self.embeds.get_or_insert_with(Vec::new).push(embed);
        self
    }

    #[must_use]
    pub fn with_buttons(mut self, buttons: Vec<Button>) -> Self {
        self.components
            .get_or_insert_with(Vec::new)
            .push(ActionRow::new(buttons));
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
}

/// A row of interactive components attached to a message.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ActionRow {
    #[serde(rename = "type")]
    pub kind: u8,
    pub components: Vec<Button>,
}

impl ActionRow {
    pub fn new(buttons: Vec<Button>) -> Self {
        Self {
            kind: 1,
            components: buttons,
        }
    }
}

/// A clickable button whose `custom_id` is delivered back as a component interaction.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Button {
    #[serde(rename = "type")]
    pub kind: u8,
    pub style: u8,
    pub label: String,
    pub custom_id: String,
}

impl Button {
    pub fn secondary(label: impl Into<String>, custom_id: impl Into<String>) -> Self {
        Self {
            kind: 2,
            style: 2,
            label: label.into(),
            custom_id: custom_id.into(),
        }
    }
}
