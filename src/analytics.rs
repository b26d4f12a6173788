//! Sales funnel summary over stored sessions

use crate::db::VisitorSession;
use crate::state_machine::Plan;
use serde::Serialize;

/// Affiliate commission per plan, in centavos
fn commission_cents(plan: Plan) -> u64 {
    match plan {
        Plan::Mensal => 1600,
        Plan::Anual => 6200,
        Plan::Vitalicio => 16000,
    }
}

fn is_support_click(click: &str) -> bool {
    click.contains("Suporte") || click.contains('🎧')
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckoutsByPlan {
    pub mensal: u64,
    pub anual: u64,
    pub vitalicio: u64,
}

impl CheckoutsByPlan {
    fn count(&self, plan: Plan) -> u64 {
        match plan {
            Plan::Mensal => self.mensal,
            Plan::Anual => self.anual,
            Plan::Vitalicio => self.vitalicio,
        }
    }

    fn bump(&mut self, plan: Plan) {
        match plan {
            Plan::Mensal => self.mensal += 1,
            Plan::Anual => self.anual += 1,
            Plan::Vitalicio => self.vitalicio += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.mensal + self.anual + self.vitalicio
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsSummary {
    pub total_visitors: u64,
    /// Sessions that clicked the payment link with a plan selected
    pub checkouts: CheckoutsByPlan,
    pub total_checkouts: u64,
    pub potential_earnings_cents: u64,
    /// Earnings formatted for display, e.g. `R$ 238,00`
    pub potential_earnings: String,
    pub support_clicks: u64,
    /// Percentage with one decimal, `"0"` with no visitors
    pub conversion_rate: String,
    /// Plan selected most often, `"-"` when none was
    pub most_popular_plan: String,
    pub avg_time_in_chat_seconds: u64,
}

impl AnalyticsSummary {
    pub fn from_sessions(sessions: &[VisitorSession]) -> Self {
        let total_visitors = sessions.len() as u64;

        let mut checkouts = CheckoutsByPlan::default();
        let mut selections: Vec<(Plan, u64)> = Vec::new();
        let mut support_clicks = 0;
        let mut total_seconds = 0;

        for session in sessions {
            if let Some(plan) = session.plan_selected {
                if session.clicked_payment {
                    checkouts.bump(plan);
                }
                match selections.iter_mut().find(|(p, _)| *p == plan) {
                    Some((_, n)) => *n += 1,
                    None => selections.push((plan, 1)),
                }
            }
            support_clicks += session
                .all_clicks
                .iter()
                .filter(|c| is_support_click(c))
                .count() as u64;
            total_seconds += session.time_in_chat_seconds;
        }

        let total_checkouts = checkouts.total();
        let potential_earnings_cents = Plan::ALL
            .iter()
            .map(|&p| checkouts.count(p) * commission_cents(p))
            .sum();

        // Ties go to the plan seen first
        let most_popular_plan = selections
            .iter()
            .fold(None::<(Plan, u64)>, |best, &(plan, n)| match best {
                Some((_, m)) if m >= n => best,
                _ => Some((plan, n)),
            })
            .map_or_else(|| "-".to_string(), |(plan, _)| plan.to_string());

        let conversion_rate = if total_visitors == 0 {
            "0".to_string()
        } else {
            // One decimal, rounded half up, in integer arithmetic
            let tenths = (total_checkouts * 1000 + total_visitors / 2) / total_visitors;
            format!("{}.{}", tenths / 10, tenths % 10)
        };

        let avg_time_in_chat_seconds = total_seconds.checked_div(total_visitors).unwrap_or(0);

        Self {
            total_visitors,
            checkouts,
            total_checkouts,
            potential_earnings_cents,
            potential_earnings: format_brl(potential_earnings_cents),
            support_clicks,
            conversion_rate,
            most_popular_plan,
            avg_time_in_chat_seconds,
        }
    }
}

/// `R$ 1.234,56` style formatting
fn format_brl(cents: u64) -> String {
    let reais = (cents / 100).to_string();
    let mut grouped = String::new();
    for (i, c) in reais.chars().enumerate() {
        if i > 0 && (reais.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    format!("R$ {grouped},{:02}", cents % 100)
}
