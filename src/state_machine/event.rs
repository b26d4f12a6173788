//! Events that can occur in a conversation

use super::ChatOption;

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Session opened; plays the welcome script
    Start,

    // Visitor events
    NameSubmitted {
        text: String,
    },
    OptionSelected {
        option: ChatOption,
    },
    PaymentClicked,

    // Delivery loop events
    /// The message queue has been fully revealed
    DeliveryDrained,
    /// The followup idle window elapsed with no interaction
    FollowupElapsed,
}

impl Event {
    pub fn option(option: ChatOption) -> Self {
        Event::OptionSelected { option }
    }

    pub fn name(text: impl Into<String>) -> Self {
        Event::NameSubmitted { text: text.into() }
    }
}
