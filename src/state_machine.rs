//! Core conversation state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions. The
//! runtime owns the state and context; `transition` only describes what should
//! happen next.

mod effect;
pub mod event;
mod message;
mod option;
pub mod script;
pub mod state;
pub(crate) mod transition;
pub mod validation;


pub use effect::Effect;
pub use event::Event;
pub use message::Message;
pub use option::{ChatOption, Plan};
pub use state::{ContextChange, ConvContext, ConvState, Intent};
pub use transition::{transition, TransitionError, TransitionResult, SUPPORT_VISITOR_NAME};
