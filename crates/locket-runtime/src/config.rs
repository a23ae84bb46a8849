//! Runtime configuration

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use locket_access::FallbackPolicy;
use locket_core::{ActorId, ChannelId};
use locket_delivery::DEFAULT_SEND_PACE;

/// Runtime configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// The fixed administrative allow-list.
    pub privileged: HashSet<ActorId>,
    /// The community whose membership gates content access.
    pub channel: ChannelId,
    /// Entry point name used to build deep links.
    pub bot_username: String,
    /// Catalog snapshot path.
    pub data_path: PathBuf,
    /// Minimum delay between consecutive asset sends.
    pub pace: Duration,
    /// Resolution for indeterminate membership checks.
    pub fallback: FallbackPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            privileged: HashSet::new(),
            channel: ChannelId::new("@locket"),
            bot_username: "locket_bot".to_string(),
            data_path: PathBuf::from("catalog.json"),
            pace: DEFAULT_SEND_PACE,
            fallback: FallbackPolicy::FailOpen,
        }
    }
}

impl Config {
    /// Build from environment variables, falling back to defaults:
    /// `LOCKET_ADMIN_IDS` (comma-separated), `LOCKET_CHANNEL`,
    /// `LOCKET_BOT_USERNAME`, `LOCKET_DATA_PATH`.
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(ids) = std::env::var("LOCKET_ADMIN_IDS") {
            config.privileged = parse_actor_list(&ids);
        }
        if let Ok(channel) = std::env::var("LOCKET_CHANNEL") {
            config.channel = ChannelId::new(channel);
        }
        if let Ok(username) = std::env::var("LOCKET_BOT_USERNAME") {
            config.bot_username = username;
        }
        if let Ok(path) = std::env::var("LOCKET_DATA_PATH") {
            config.data_path = PathBuf::from(path);
        }

        config
    }
}

fn parse_actor_list(raw: &str) -> HashSet<ActorId> {
    raw.split(',')
        .filter_map(|part| part.trim().parse::<i64>().ok())
        .map(ActorId::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_actor_list() {
        let ids = parse_actor_list("1, 2,junk, 3");
        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&ActorId::new(2)));
    }

    #[test]
    fn test_default_pace_is_flood_safe() {
        let config = Config::default();
        assert!(config.pace >= Duration::from_millis(500));
    }
}
