use serde::{Deserialize, Serialize};

use crate::session::Phase;

/// Every way a game operation can be refused.
///
/// A refused operation never leaves a partial mutation behind: the session
/// looks exactly as it did before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum GameError {
    #[error("participant has already joined this game")]
    AlreadyJoined,
    #[error("a game is already running, wait for the next one")]
    GameInProgress,
    #[error("not enough players: {required} needed, {joined} joined")]
    NotEnoughPlayers { required: usize, joined: usize },
    #[error("the lobby is full ({max} players)")]
    LobbyFull { max: usize },
    #[error("not allowed during the {phase} phase")]
    InvalidPhase { phase: Phase },
    #[error("it is not your turn to act")]
    NotYourTurn,
    #[error("that player cannot be chosen")]
    InvalidTarget,
    #[error("only living participants can do that")]
    NotAlive,
}

impl GameError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            GameError::AlreadyJoined => "already_joined",
            GameError::GameInProgress => "game_in_progress",
            GameError::NotEnoughPlayers { .. } => "not_enough_players",
            GameError::LobbyFull { .. } => "lobby_full",
            GameError::InvalidPhase { .. } => "invalid_phase",
            GameError::NotYourTurn => "not_your_turn",
            GameError::InvalidTarget => "invalid_target",
            GameError::NotAlive => "not_alive",
        }
    }
}
