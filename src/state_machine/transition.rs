//! Pure state transition function

use super::state::{ContextChange, Intent};
use super::validation::{is_valid_name, INVALID_NAME_PROMPT};
use super::{script, ChatOption, ConvContext, ConvState, Effect, Event, Message, Plan};
use thiserror::Error;

/// Visitor name recorded when the support shortcut skips name capture
pub const SUPPORT_VISITOR_NAME: &str = "Suporte Direto";

/// Result of a state transition
#[derive(Debug, PartialEq, Eq)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }

    /// Messages delivered by this transition, concatenated in effect order
    pub fn delivered(&self) -> Vec<&Message> {
        self.effects
            .iter()
            .filter_map(|e| match e {
                Effect::Deliver { messages } => Some(messages.iter()),
                _ => None,
            })
            .flatten()
            .collect()
    }
}

/// Errors that can occur during transition. None of them change state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("{INVALID_NAME_PROMPT}")]
    InvalidName,
    #[error("Empty name submission")]
    EmptyName,
    #[error("Free-text input is not accepted in state {0}")]
    InputClosed(ConvState),
    #[error("Unhandled option {option:?} in state {state}")]
    UnhandledOption { state: ConvState, option: ChatOption },
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs and performs no
/// I/O. Context mutations are returned as [`Effect::Remember`].
pub fn transition(
    state: &ConvState,
    context: &ConvContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    let state = *state;
    match (state, event) {
        // ============================================================
        // Session start
        // ============================================================
        (ConvState::Welcome, Event::Start) => Ok(TransitionResult::new(ConvState::Welcome)
            .with_effect(Effect::deliver(script::welcome()))),

        (state, Event::Start) => Err(TransitionError::InvalidTransition(format!(
            "Start received in state {state}"
        ))),

        // ============================================================
        // Name capture
        // ============================================================
        (ConvState::AskingName, Event::NameSubmitted { text })
            if context.visitor_name.is_none() =>
        {
            submit_name(context, &text)
        }

        (state, Event::NameSubmitted { .. }) => Err(TransitionError::InputClosed(state)),

        // ============================================================
        // Option selection
        // ============================================================
        (state, Event::OptionSelected { option }) if !state.offers(option) => {
            Err(TransitionError::UnhandledOption { state, option })
        }

        (_, Event::OptionSelected { option }) => Ok(select_option(context, option)),

        (state, Event::PaymentClicked) => {
            Ok(TransitionResult::new(state).with_effect(Effect::TrackPaymentClick))
        }

        // ============================================================
        // Delivery loop
        // ============================================================
        (ConvState::AskingName, Event::DeliveryDrained) if context.visitor_name.is_none() => {
            Ok(TransitionResult::new(ConvState::AskingName).with_effect(Effect::OpenNameInput))
        }

        (state, Event::DeliveryDrained) if state.is_checkout() && !context.followup_triggered => {
            Ok(TransitionResult::new(state).with_effect(Effect::ArmFollowup))
        }

        (state, Event::DeliveryDrained) => Ok(TransitionResult::new(state)),

        (state, Event::FollowupElapsed) if state.is_checkout() && !context.followup_triggered => {
            Ok(TransitionResult::new(ConvState::Followup)
                .with_effect(Effect::Remember(ContextChange::FollowupTriggered))
                .with_effect(Effect::deliver(script::followup(context.display_name()))))
        }

        // Stale timer: the visitor moved on or the followup already fired
        (state, Event::FollowupElapsed) => Ok(TransitionResult::new(state)),
    }
}

fn submit_name(context: &ConvContext, text: &str) -> Result<TransitionResult, TransitionError> {
    let name = text.trim();
    if name.is_empty() {
        return Err(TransitionError::EmptyName);
    }
    if !is_valid_name(name) {
        return Err(TransitionError::InvalidName);
    }

    let (next, messages) = match context.intent {
        Some(Intent::Renew) => {
            let mut messages = script::renovar(name);
            messages.extend(script::plans(name));
            (ConvState::Renovar, messages)
        }
        // Buy is also the fallback when no intent was recorded
        Some(Intent::Buy) | None => (ConvState::Initial, script::initial(name)),
    };

    Ok(TransitionResult::new(next).with_effects([
        Effect::CancelFollowup,
        Effect::Remember(ContextChange::VisitorName(name.to_string())),
        Effect::Remember(ContextChange::NotificationsEnabled),
        Effect::echo(name),
        Effect::create_session(name),
        Effect::deliver(messages),
    ]))
}

fn checkout(plan: Plan, name: &str) -> (ConvState, Vec<Effect>, Vec<Message>) {
    let next = match plan {
        Plan::Mensal => ConvState::Mensal,
        Plan::Anual => ConvState::Anual,
        Plan::Vitalicio => ConvState::Vitalicio,
    };
    (next, vec![Effect::TrackPlan { plan }], script::checkout(plan, name))
}

/// Dispatch an option the current state offers
fn select_option(context: &ConvContext, option: ChatOption) -> TransitionResult {
    use ChatOption as O;

    let name = context.display_name();
    let preamble = [
        Effect::CancelFollowup,
        Effect::track_click(option.label()),
        Effect::echo(option.label()),
    ];

    let (next, extra, messages) = match option {
        O::QueroComprar | O::QueroRenovar => {
            let intent = if option == O::QueroComprar {
                Intent::Buy
            } else {
                Intent::Renew
            };
            (
                ConvState::AskingName,
                vec![Effect::Remember(ContextChange::Intent(intent))],
                script::ask_name(intent),
            )
        }
        O::PrecisoDeSuporte => (
            ConvState::Suporte,
            vec![Effect::create_session(SUPPORT_VISITOR_NAME)],
            script::suporte(),
        ),
        O::VerPlanos
        | O::VerOutrosPlanos
        | O::JaQueroVerPlanos
        | O::ConvencidoVerPlanos
        | O::QueroVerPlanos => (ConvState::Plans, vec![], script::plans(name)),
        O::ConhecerLuna | O::ConhecerMais => {
            (ConvState::ConhecerIntro, vec![], script::conhecer_intro(name))
        }
        O::AdoroFilmes => (ConvState::ConhecerFilmes, vec![], script::conhecer_filmes()),
        O::PrefiroSeries | O::SimAmoSeries => {
            (ConvState::ConhecerSeries, vec![], script::conhecer_series())
        }
        O::CurtoEsportes | O::PrefiroEsportes | O::SimAdoro => {
            (ConvState::ConhecerCanais, vec![], script::conhecer_canais())
        }
        O::FuncionaNaTv => (ConvState::ConhecerFinal, vec![], script::conhecer_final(name)),
        O::OndeFunciona => (ConvState::Dispositivos, vec![], script::dispositivos(name)),
        O::ComoFuncionaTeste | O::GarantiaSeteDias => {
            (ConvState::Test, vec![], script::trial(name))
        }
        O::FalarComSuporte => (ConvState::Doubt, vec![], script::doubt(name)),
        O::Mensal => checkout(Plan::Mensal, name),
        O::Anual => checkout(Plan::Anual, name),
        O::Vitalicio => checkout(Plan::Vitalicio, name),
    };

    TransitionResult::new(next)
        .with_effects(preamble)
        .with_effects(extra)
        .with_effect(Effect::deliver(messages))
}
