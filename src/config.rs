//! Service configuration from the environment

use crate::runtime::{RevealDelay, RuntimeConfig};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    pub db_path: PathBuf,
    pub port: u16,
    /// Bearer token for the admin summary; the route is hidden when unset
    pub admin_token: Option<String>,
    pub runtime: RuntimeConfig,
}

impl ChatConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparseable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());
        let defaults = RuntimeConfig::default();

        let db_path = lookup("LUNA_DB_PATH").map_or_else(
            || {
                let home = lookup("HOME").unwrap_or_else(|| "/tmp".to_string());
                PathBuf::from(home).join(".luna-chat").join("luna.db")
            },
            PathBuf::from,
        );

        let port = lookup("LUNA_PORT")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(8000);

        let admin_token = lookup("LUNA_ADMIN_TOKEN").filter(|t| !t.trim().is_empty());

        let reveal = RevealDelay {
            min: parsed("LUNA_REVEAL_MIN_MS").map_or(defaults.reveal.min, Duration::from_millis),
            max: parsed("LUNA_REVEAL_MAX_MS").map_or(defaults.reveal.max, Duration::from_millis),
        };

        Self {
            db_path,
            port,
            admin_token,
            runtime: RuntimeConfig {
                reveal,
                followup_after: parsed("LUNA_FOLLOWUP_SECS")
                    .map_or(defaults.followup_after, Duration::from_secs),
                refresh_every: parsed("LUNA_REFRESH_SECS")
                    .filter(|s| *s > 0)
                    .map_or(defaults.refresh_every, Duration::from_secs),
                idle_timeout: parsed("LUNA_IDLE_SECS")
                    .filter(|s| *s > 0)
                    .map_or(defaults.idle_timeout, Duration::from_secs),
            },
        }
    }
}
