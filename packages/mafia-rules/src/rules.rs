use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::roles::MIN_PLAYERS;

/// What happens to the roster when a finished game is followed by a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RosterPolicy {
    /// Everyone who joined stays registered with the same number and is revived.
    #[default]
    Keep,
    /// The roster is emptied and participants must join again.
    Clear,
}

impl FromStr for RosterPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep" => Ok(RosterPolicy::Keep),
            "clear" => Ok(RosterPolicy::Clear),
            other => Err(format!("unknown roster policy: {}", other)),
        }
    }
}

/// Per-session rules. The role set itself is fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    /// Participants needed before the game can start. Never below [`MIN_PLAYERS`].
    pub min_players: usize,
    /// Upper bound on the lobby size, unlimited when `None`.
    pub max_players: Option<usize>,
    pub roster_policy: RosterPolicy,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            min_players: MIN_PLAYERS,
            max_players: None,
            roster_policy: RosterPolicy::Keep,
        }
    }
}

impl Rules {
    pub fn required_players(&self) -> usize {
        self.min_players.max(MIN_PLAYERS)
    }
}
