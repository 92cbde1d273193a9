use mafia_rules::{
    DisplayNumber, GameEvent, NightActionKind, ParticipantId, ParticipantView, Role, StatusView,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRequest {
    pub participant_id: ParticipantId,
    pub name: String,
}

/// `token` is the bearer credential for every seated operation in this group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinResponse {
    pub success: bool,
    pub number: DisplayNumber,
    pub total: usize,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRequest {
    pub target_number: DisplayNumber,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NightActionRequest {
    pub action: NightActionKind,
    pub target_number: DisplayNumber,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    pub events: Vec<GameEvent>,
}

impl ActionResponse {
    pub fn new(events: Vec<GameEvent>) -> Self {
        Self {
            success: true,
            events,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteStartResponse {
    pub success: bool,
    pub candidates: Vec<ParticipantView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleEntry {
    pub participant: ParticipantId,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(flatten)]
    pub status: StatusView,
    // DEBUG_SHOW_PLAYER_ROLES が有効なときだけ埋まる
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub roles: Option<Vec<RoleEntry>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
}
