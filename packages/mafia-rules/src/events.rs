use serde::{Deserialize, Serialize};

use crate::night::{NightActionKind, NightSummary};
use crate::roles::Role;
use crate::roster::{DisplayNumber, Participant, ParticipantId};
use crate::session::Phase;
use crate::verdict::Winner;

/// What the transport may show about a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantView {
    pub id: ParticipantId,
    pub number: DisplayNumber,
    pub name: String,
    pub alive: bool,
}

impl From<&Participant> for ParticipantView {
    fn from(p: &Participant) -> Self {
        Self {
            id: p.id,
            number: p.number,
            name: p.name.clone(),
            alive: p.alive,
        }
    }
}

/// Who an event is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "to", content = "participant", rename_all = "snake_case")]
pub enum Audience {
    Group,
    Participant(ParticipantId),
}

impl Audience {
    pub fn includes(&self, participant: Option<ParticipantId>) -> bool {
        match self {
            Audience::Group => true,
            Audience::Participant(id) => participant == Some(*id),
        }
    }
}

/// Something the transport has to tell someone.
///
/// The core never sends anything itself; every state change that players
/// need to hear about comes back from a session call as one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    ParticipantJoined {
        participant: ParticipantView,
        total: usize,
    },
    RoleAssigned {
        participant: ParticipantId,
        role: Role,
        briefing: String,
    },
    GameStarted {
        roster: Vec<ParticipantView>,
    },
    NightStarted {
        night: u32,
    },
    /// Prompt for a role holder, `targets` are the selectable participants.
    NightActionRequested {
        actor: ParticipantId,
        action: NightActionKind,
        targets: Vec<ParticipantView>,
    },
    NightResolved {
        summary: NightSummary,
    },
    InvestigationResult {
        investigator: ParticipantId,
        target: ParticipantView,
        is_faction_leader: bool,
    },
    VoteStarted {
        candidates: Vec<ParticipantView>,
    },
    VoteResolved {
        eliminated: ParticipantView,
        votes: usize,
    },
    PhaseChanged {
        from: Phase,
        to: Phase,
    },
    GameEnded {
        winner: Winner,
    },
    LobbyReopened {
        roster: Vec<ParticipantView>,
    },
}

impl GameEvent {
    pub fn audience(&self) -> Audience {
        match self {
            GameEvent::RoleAssigned { participant, .. } => Audience::Participant(*participant),
            GameEvent::NightActionRequested { actor, .. } => Audience::Participant(*actor),
            GameEvent::InvestigationResult { investigator, .. } => {
                Audience::Participant(*investigator)
            }
            GameEvent::ParticipantJoined { .. }
            | GameEvent::GameStarted { .. }
            | GameEvent::NightStarted { .. }
            | GameEvent::NightResolved { .. }
            | GameEvent::VoteStarted { .. }
            | GameEvent::VoteResolved { .. }
            | GameEvent::PhaseChanged { .. }
            | GameEvent::GameEnded { .. }
            | GameEvent::LobbyReopened { .. } => Audience::Group,
        }
    }

    pub fn is_private(&self) -> bool {
        matches!(self.audience(), Audience::Participant(_))
    }
}
