//! Visitor name validation
//!
//! Visitors often answer "qual é o seu nome?" with a greeting or a plea for a
//! human. Those are rejected so they never end up as the visitor's name.

use regex::Regex;
use std::sync::LazyLock;

/// Inline prompt shown when a submission is rejected
pub const INVALID_NAME_PROMPT: &str = "Por favor, digite seu nome 😊";

static INVALID_NAME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // greetings
        r"(?i)^(oi|olá|ola|hey|hi|hello|bom dia|boa tarde|boa noite|e aí|eai|salve|fala)\b",
        // asking for help or a human
        r"(?i)^(quero|preciso|falar|atendente|suporte|ajuda|humano|pessoa|alguem|alguém)\b",
        // yes/no and filler
        r"(?i)^(sim|não|nao|ok|tá|ta|blz|beleza|pode|claro)\b",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("name pattern is valid"))
    .collect()
});

/// ASCII letters plus the Latin-1 supplement range (À through ÿ)
fn is_name_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || ('\u{C0}'..='\u{FF}').contains(&c)
}

pub fn is_valid_name(text: &str) -> bool {
    let trimmed = text.trim();

    if trimmed.chars().count() < 2 {
        return false;
    }

    if INVALID_NAME_PATTERNS.iter().any(|p| p.is_match(trimmed)) {
        return false;
    }

    trimmed.chars().filter(|c| is_name_letter(*c)).count() >= 2
}
