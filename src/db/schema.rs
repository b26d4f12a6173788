//! Database schema and types

use crate::sniff::DeviceClass;
use crate::state_machine::Plan;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// SQL schema for initialization
pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS chat_sessions (
    session_id TEXT PRIMARY KEY,
    visitor_name TEXT NOT NULL,
    device_type TEXT NOT NULL,
    browser TEXT NOT NULL,
    plan_selected TEXT,
    clicked_payment BOOLEAN NOT NULL DEFAULT 0,
    all_clicks TEXT NOT NULL DEFAULT '[]',
    time_in_chat_seconds INTEGER NOT NULL DEFAULT 0,
    started_at TEXT NOT NULL,
    last_activity TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_chat_sessions_started ON chat_sessions(started_at DESC);
";

/// Persistent record of one visitor's session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorSession {
    pub session_id: String,
    pub visitor_name: String,
    pub device_type: DeviceClass,
    pub browser: String,
    pub plan_selected: Option<Plan>,
    pub clicked_payment: bool,
    /// Clicked labels in click order
    pub all_clicks: Vec<String>,
    pub time_in_chat_seconds: u64,
    pub started_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

/// Additive change to a session record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionUpdate {
    pub plan_selected: Option<Plan>,
    pub clicked_payment: Option<bool>,
    pub append_click: Option<String>,
    pub elapsed_seconds: u64,
}

impl VisitorSession {
    /// Apply an update. Plan and payment flag only move forward; clicks only grow.
    #[cfg(test)]
    pub fn apply(&mut self, update: &SessionUpdate, now: DateTime<Utc>) {
        if let Some(plan) = update.plan_selected {
            self.plan_selected = Some(plan);
        }
        if update.clicked_payment == Some(true) {
            self.clicked_payment = true;
        }
        if let Some(click) = &update.append_click {
            self.all_clicks.push(click.clone());
        }
        self.time_in_chat_seconds = update.elapsed_seconds;
        self.last_activity = now;
    }
}
