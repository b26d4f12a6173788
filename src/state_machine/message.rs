//! Renderable chat messages

use serde::{Deserialize, Serialize};

/// One bubble in the transcript.
///
/// Widget kinds (options, payment, support, image) carry only their payload;
/// there is no accompanying text body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Message {
    /// Bot-authored text
    Text { text: String },
    /// Echo of what the visitor typed or clicked
    UserEcho { text: String },
    /// Inline button group, labels in display order
    Options { options: Vec<String> },
    /// Checkout call-to-action
    Payment { url: String },
    /// Support call-to-action
    Support { url: String },
    Image {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
}

impl Message {
    pub fn text(text: impl Into<String>) -> Self {
        Message::Text { text: text.into() }
    }

    pub fn user_echo(text: impl Into<String>) -> Self {
        Message::UserEcho { text: text.into() }
    }

    pub fn options(options: &[super::ChatOption]) -> Self {
        Message::Options {
            options: options.iter().map(|o| o.label().to_string()).collect(),
        }
    }

    pub fn payment(url: impl Into<String>) -> Self {
        Message::Payment { url: url.into() }
    }

    pub fn support(url: impl Into<String>) -> Self {
        Message::Support { url: url.into() }
    }

    pub fn image(url: impl Into<String>, caption: impl Into<String>) -> Self {
        Message::Image {
            url: url.into(),
            caption: Some(caption.into()),
        }
    }

    pub fn is_bot_authored(&self) -> bool {
        !matches!(self, Message::UserEcho { .. })
    }

    /// Visible text body, if this kind has one
    pub fn body(&self) -> Option<&str> {
        match self {
            Message::Text { text } | Message::UserEcho { text } => Some(text),
            _ => None,
        }
    }
}
