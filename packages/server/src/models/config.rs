use mafia_rules::{RosterPolicy, Rules, MIN_PLAYERS};
use std::env;
use tracing::warn;

/// Game-level settings shared by every session this server creates.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub rules: Rules,
    // 固定シードで役職配布を再現する（デバッグ用）
    pub rng_seed: Option<u64>,
    // statusレスポンスに役職を含めるかどうか
    pub show_player_roles: bool,
    pub channel_capacity: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rules: Rules::default(),
            rng_seed: None,
            show_player_roles: false,
            channel_capacity: 1000,
        }
    }
}

impl GameConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key/value source. Missing or unparsable
    /// values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let min_players = lookup("MAFIA_MIN_PLAYERS")
            .and_then(|v| v.parse::<usize>().ok())
            .map(|v| v.max(MIN_PLAYERS))
            .unwrap_or(defaults.rules.min_players);
        let max_players = lookup("MAFIA_MAX_PLAYERS")
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|max| *max >= min_players);
        let roster_policy = match lookup("MAFIA_ROSTER_POLICY") {
            Some(v) => v.parse::<RosterPolicy>().unwrap_or_else(|e| {
                warn!("{}, keeping the roster between games", e);
                RosterPolicy::Keep
            }),
            None => defaults.rules.roster_policy,
        };
        let rng_seed = lookup("MAFIA_RNG_SEED").and_then(|v| v.parse::<u64>().ok());
        let show_player_roles = lookup("DEBUG_SHOW_PLAYER_ROLES")
            .map(|v| v == "true")
            .unwrap_or(defaults.show_player_roles);
        let channel_capacity = lookup("MAFIA_EVENT_CHANNEL_CAPACITY")
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|c| *c > 0)
            .unwrap_or(defaults.channel_capacity);

        Self {
            rules: Rules {
                min_players,
                max_players,
                roster_policy,
            },
            rng_seed,
            show_player_roles,
            channel_capacity,
        }
    }
}
