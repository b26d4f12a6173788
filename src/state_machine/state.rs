//! Conversation state types

use super::option::{ChatOption, Plan};
use serde::{Deserialize, Serialize};

// ============================================================================
// Conversation State
// ============================================================================

/// Conversation state
///
/// A bare tag: everything the script needs beyond "where are we" lives in
/// [`ConvContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConvState {
    /// Greeting with the three intent buttons
    #[default]
    Welcome,
    /// Waiting for the visitor to type their name
    AskingName,
    /// Named visitor on the buy path
    Initial,
    /// Plan list on screen
    Plans,
    /// Seven-day guarantee explanation
    Test,
    /// Checkout for the monthly plan
    Mensal,
    /// Checkout for the yearly plan
    Anual,
    /// Checkout for the lifetime plan
    Vitalicio,
    ConhecerIntro,
    ConhecerFilmes,
    ConhecerSeries,
    ConhecerCanais,
    ConhecerFinal,
    /// Supported devices
    Dispositivos,
    /// Visitor asked to talk to support mid-funnel
    Doubt,
    /// Re-engagement after idling on a checkout
    Followup,
    /// Named visitor on the renew path (plan list follows immediately)
    Renovar,
    /// Support shortcut taken from the welcome buttons
    Suporte,
}

const INTENTS: &[ChatOption] = &[
    ChatOption::QueroComprar,
    ChatOption::QueroRenovar,
    ChatOption::PrecisoDeSuporte,
];
const PLAN_CHOICES: &[ChatOption] = &[ChatOption::Mensal, ChatOption::Anual, ChatOption::Vitalicio];

impl ConvState {
    pub const ALL: [ConvState; 18] = [
        ConvState::Welcome,
        ConvState::AskingName,
        ConvState::Initial,
        ConvState::Plans,
        ConvState::Test,
        ConvState::Mensal,
        ConvState::Anual,
        ConvState::Vitalicio,
        ConvState::ConhecerIntro,
        ConvState::ConhecerFilmes,
        ConvState::ConhecerSeries,
        ConvState::ConhecerCanais,
        ConvState::ConhecerFinal,
        ConvState::Dispositivos,
        ConvState::Doubt,
        ConvState::Followup,
        ConvState::Renovar,
        ConvState::Suporte,
    ];

    /// Options the visitor can pick while in this state.
    ///
    /// This is the button group currently on screen. Intent buttons stay live
    /// until a name is captured, and plan buttons stay live on the checkout
    /// states so the visitor can switch plans.
    pub fn offered_options(self) -> &'static [ChatOption] {
        use ChatOption::{
            ComoFuncionaTeste, ConhecerLuna, ConhecerMais, ConvencidoVerPlanos, CurtoEsportes,
            FalarComSuporte, FuncionaNaTv, GarantiaSeteDias, JaQueroVerPlanos, OndeFunciona,
            PrefiroEsportes, PrefiroSeries, QueroComprar, QueroRenovar, QueroVerPlanos,
            SimAdoro, SimAmoSeries, VerOutrosPlanos, VerPlanos, AdoroFilmes,
        };
        match self {
            ConvState::Welcome | ConvState::AskingName => INTENTS,
            ConvState::Suporte => &[QueroComprar, QueroRenovar],
            ConvState::Initial => &[VerPlanos, ConhecerLuna, ComoFuncionaTeste],
            ConvState::Plans
            | ConvState::Renovar
            | ConvState::Mensal
            | ConvState::Anual
            | ConvState::Vitalicio => PLAN_CHOICES,
            ConvState::Test => &[VerPlanos, ConhecerMais, FalarComSuporte],
            ConvState::ConhecerIntro => &[AdoroFilmes, PrefiroSeries, CurtoEsportes],
            ConvState::ConhecerFilmes => &[SimAmoSeries, PrefiroEsportes, JaQueroVerPlanos],
            ConvState::ConhecerSeries => &[SimAdoro, ConvencidoVerPlanos],
            ConvState::ConhecerCanais => &[QueroVerPlanos, FuncionaNaTv],
            ConvState::ConhecerFinal => &[OndeFunciona, VerPlanos],
            ConvState::Dispositivos => &[VerPlanos, GarantiaSeteDias],
            ConvState::Followup => &[VerPlanos, ConhecerLuna],
            ConvState::Doubt => &[VerOutrosPlanos],
        }
    }

    pub fn offers(self, option: ChatOption) -> bool {
        self.offered_options().contains(&option)
    }

    /// Checkout states arm the followup timer once their queue drains
    pub fn is_checkout(self) -> bool {
        self.checkout_plan().is_some()
    }

    pub fn checkout_plan(self) -> Option<Plan> {
        match self {
            ConvState::Mensal => Some(Plan::Mensal),
            ConvState::Anual => Some(Plan::Anual),
            ConvState::Vitalicio => Some(Plan::Vitalicio),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConvState::Welcome => "welcome",
            ConvState::AskingName => "asking_name",
            ConvState::Initial => "initial",
            ConvState::Plans => "plans",
            ConvState::Test => "test",
            ConvState::Mensal => "mensal",
            ConvState::Anual => "anual",
            ConvState::Vitalicio => "vitalicio",
            ConvState::ConhecerIntro => "conhecer_intro",
            ConvState::ConhecerFilmes => "conhecer_filmes",
            ConvState::ConhecerSeries => "conhecer_series",
            ConvState::ConhecerCanais => "conhecer_canais",
            ConvState::ConhecerFinal => "conhecer_final",
            ConvState::Dispositivos => "dispositivos",
            ConvState::Doubt => "doubt",
            ConvState::Followup => "followup",
            ConvState::Renovar => "renovar",
            ConvState::Suporte => "suporte",
        }
    }
}

impl std::fmt::Display for ConvState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Conversation Context
// ============================================================================

/// The visitor's top-level goal, picked from the welcome buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Buy,
    Renew,
}

/// Per-session memory read by the transition function.
///
/// `transition` never writes to it; it emits [`ContextChange`]s that the
/// runtime applies in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvContext {
    pub session_id: String,
    pub visitor_name: Option<String>,
    pub intent: Option<Intent>,
    /// Set once the followup script has been delivered; never cleared
    pub followup_triggered: bool,
    /// Notification cue plays only after the first free-text submission
    pub notifications_enabled: bool,
}

/// A single mutation of [`ConvContext`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextChange {
    Intent(Intent),
    VisitorName(String),
    FollowupTriggered,
    NotificationsEnabled,
}

impl ConvContext {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            visitor_name: None,
            intent: None,
            followup_triggered: false,
            notifications_enabled: false,
        }
    }

    /// Name used inside scripts; empty until captured
    pub fn display_name(&self) -> &str {
        self.visitor_name.as_deref().unwrap_or("")
    }

    pub fn apply(&mut self, change: ContextChange) {
        match change {
            ContextChange::Intent(intent) => self.intent = Some(intent),
            ContextChange::VisitorName(name) => self.visitor_name = Some(name),
            ContextChange::FollowupTriggered => self.followup_triggered = true,
            ContextChange::NotificationsEnabled => self.notifications_enabled = true,
        }
    }
}
