//! Button options offered by the script
//!
//! Options are identified by enum variant; the emoji-laden label is display
//! data only, so rewording a button cannot silently break a transition.

use serde::{Deserialize, Serialize};

/// A subscription plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Plan {
    Mensal,
    Anual,
    #[serde(rename = "Vitalício")]
    Vitalicio,
}

impl Plan {
    pub const ALL: [Plan; 3] = [Plan::Mensal, Plan::Anual, Plan::Vitalicio];

    /// Name stored on the session record and shown on the plan button
    pub fn display_name(self) -> &'static str {
        match self {
            Plan::Mensal => "Mensal",
            Plan::Anual => "Anual",
            Plan::Vitalicio => "Vitalício",
        }
    }

    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.display_name() == name)
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Every button the script can render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatOption {
    // Intents
    QueroComprar,
    QueroRenovar,
    PrecisoDeSuporte,

    // Funnel navigation
    VerPlanos,
    VerOutrosPlanos,
    JaQueroVerPlanos,
    ConvencidoVerPlanos,
    QueroVerPlanos,
    ConhecerLuna,
    ConhecerMais,
    AdoroFilmes,
    PrefiroSeries,
    SimAmoSeries,
    CurtoEsportes,
    PrefiroEsportes,
    SimAdoro,
    FuncionaNaTv,
    OndeFunciona,
    ComoFuncionaTeste,
    GarantiaSeteDias,
    FalarComSuporte,

    // Plans
    Mensal,
    Anual,
    Vitalicio,
}

impl ChatOption {
    pub const ALL: [ChatOption; 24] = [
        ChatOption::QueroComprar,
        ChatOption::QueroRenovar,
        ChatOption::PrecisoDeSuporte,
        ChatOption::VerPlanos,
        ChatOption::VerOutrosPlanos,
        ChatOption::JaQueroVerPlanos,
        ChatOption::ConvencidoVerPlanos,
        ChatOption::QueroVerPlanos,
        ChatOption::ConhecerLuna,
        ChatOption::ConhecerMais,
        ChatOption::AdoroFilmes,
        ChatOption::PrefiroSeries,
        ChatOption::SimAmoSeries,
        ChatOption::CurtoEsportes,
        ChatOption::PrefiroEsportes,
        ChatOption::SimAdoro,
        ChatOption::FuncionaNaTv,
        ChatOption::OndeFunciona,
        ChatOption::ComoFuncionaTeste,
        ChatOption::GarantiaSeteDias,
        ChatOption::FalarComSuporte,
        ChatOption::Mensal,
        ChatOption::Anual,
        ChatOption::Vitalicio,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChatOption::QueroComprar => "🛒 Quero comprar",
            ChatOption::QueroRenovar => "🔄 Quero renovar",
            ChatOption::PrecisoDeSuporte => "🎧 Preciso de Suporte",
            ChatOption::VerPlanos => "📺 Ver planos",
            ChatOption::VerOutrosPlanos => "📺 Ver outros planos",
            ChatOption::JaQueroVerPlanos => "✅ Já quero ver os planos!",
            ChatOption::ConvencidoVerPlanos => "✅ Tô convencido! Ver planos",
            ChatOption::QueroVerPlanos => "✅ Quero ver os planos!",
            ChatOption::ConhecerLuna => "🌙 Conhecer a Luna TV",
            ChatOption::ConhecerMais => "🌙 Conhecer mais",
            ChatOption::AdoroFilmes => "🎬 Adoro filmes!",
            ChatOption::PrefiroSeries => "📺 Prefiro séries",
            ChatOption::SimAmoSeries => "📺 Sim, amo séries!",
            ChatOption::CurtoEsportes => "⚽ Curto mais esportes",
            ChatOption::PrefiroEsportes => "⚽ Prefiro esportes",
            ChatOption::SimAdoro => "⚽ Sim, adoro!",
            ChatOption::FuncionaNaTv => "📱 Funciona na TV?",
            ChatOption::OndeFunciona => "📱 Onde funciona?",
            ChatOption::ComoFuncionaTeste => "🎁 Como funciona o teste",
            ChatOption::GarantiaSeteDias => "🎁 Garantia de 7 dias",
            ChatOption::FalarComSuporte => "💬 Falar com suporte",
            ChatOption::Mensal => Plan::Mensal.display_name(),
            ChatOption::Anual => Plan::Anual.display_name(),
            ChatOption::Vitalicio => Plan::Vitalicio.display_name(),
        }
    }

    /// Resolve a button label sent back by the UI
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|o| o.label() == label)
    }

    pub fn plan(self) -> Option<Plan> {
        match self {
            ChatOption::Mensal => Some(Plan::Mensal),
            ChatOption::Anual => Some(Plan::Anual),
            ChatOption::Vitalicio => Some(Plan::Vitalicio),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChatOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
