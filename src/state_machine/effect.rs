//! Effects produced by state transitions

use super::state::ContextChange;
use super::{Message, Plan};

/// Effects to be executed after state transition, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Replace the pending queue with these messages and start revealing
    Deliver { messages: Vec<Message> },

    /// Append the visitor's own input to the transcript immediately
    Echo { text: String },

    /// Mutate the conversation context
    Remember(ContextChange),

    /// Create the visitor session record
    CreateSession { visitor_name: String },

    /// Append a clicked label to the session record
    TrackClick { label: String },

    /// Record the chosen plan on the session record
    TrackPlan { plan: Plan },

    /// Record that the payment link was opened
    TrackPaymentClick,

    /// Enable free-text input for name capture
    OpenNameInput,

    /// Arm the single-shot followup timer
    ArmFollowup,

    /// Drop a pending followup timer, if any
    CancelFollowup,
}

impl Effect {
    pub fn deliver(messages: Vec<Message>) -> Self {
        Effect::Deliver { messages }
    }

    pub fn echo(text: impl Into<String>) -> Self {
        Effect::Echo { text: text.into() }
    }

    pub fn track_click(label: impl Into<String>) -> Self {
        Effect::TrackClick {
            label: label.into(),
        }
    }

    pub fn create_session(visitor_name: impl Into<String>) -> Self {
        Effect::CreateSession {
            visitor_name: visitor_name.into(),
        }
    }
}
