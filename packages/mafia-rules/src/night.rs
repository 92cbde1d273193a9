use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::GameError;
use crate::events::ParticipantView;
use crate::roles::{Role, RoleMap};
use crate::roster::{ParticipantId, Roster};
use crate::Resolution;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NightActionKind {
    Kill,
    Protect,
    Investigate,
}

impl NightActionKind {
    pub const ALL: [NightActionKind; 3] = [
        NightActionKind::Kill,
        NightActionKind::Protect,
        NightActionKind::Investigate,
    ];

    /// The only role allowed to take this action.
    pub fn role(self) -> Role {
        match self {
            NightActionKind::Kill => Role::FactionLeader,
            NightActionKind::Protect => Role::Protector,
            NightActionKind::Investigate => Role::Investigator,
        }
    }

    /// Only the leader is barred from choosing themself.
    pub fn allows_self_target(self) -> bool {
        !matches!(self, NightActionKind::Kill)
    }
}

impl fmt::Display for NightActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NightActionKind::Kill => write!(f, "kill"),
            NightActionKind::Protect => write!(f, "protect"),
            NightActionKind::Investigate => write!(f, "investigate"),
        }
    }
}

/// Private answer for the investigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investigation {
    pub investigator: ParticipantId,
    pub target: ParticipantId,
    pub is_faction_leader: bool,
}

/// Everything that happened during one resolved night.
///
/// `saved` and `investigation` are private; only [`NightOutcome::summary`]
/// may be shown to the group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NightOutcome {
    pub killed: Option<ParticipantId>,
    pub saved: bool,
    pub investigation: Option<Investigation>,
}

impl NightOutcome {
    pub fn summary(&self, roster: &Roster) -> NightSummary {
        match self.killed.and_then(|id| roster.get(id)) {
            Some(p) => NightSummary::Died {
                participant: ParticipantView::from(p),
            },
            None => NightSummary::NoDeath,
        }
    }
}

/// Public narrative of a night. Never mentions who protected whom or
/// whether a kill was attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum NightSummary {
    NoDeath,
    Died { participant: ParticipantView },
}

impl fmt::Display for NightSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NightSummary::NoDeath => write!(f, "The night is over. Nobody died tonight."),
            NightSummary::Died { participant } => {
                write!(f, "The night is over. {} was killed.", participant.name)
            }
        }
    }
}

/// The three night slots for the current night.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NightActions {
    kill: Option<ParticipantId>,
    protect: Option<ParticipantId>,
    investigate: Option<ParticipantId>,
    resolved: bool,
}

impl NightActions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self, kind: NightActionKind) -> Option<ParticipantId> {
        match kind {
            NightActionKind::Kill => self.kill,
            NightActionKind::Protect => self.protect,
            NightActionKind::Investigate => self.investigate,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Checks that `actor` is the living holder of the role behind `kind`.
    pub fn authorize(
        roster: &Roster,
        roles: &RoleMap,
        actor: ParticipantId,
        kind: NightActionKind,
    ) -> Result<(), GameError> {
        match roles.role_of(actor) {
            Some(role) if role == kind.role() && roster.is_alive(actor) => Ok(()),
            _ => Err(GameError::NotYourTurn),
        }
    }

    /// Records (or overwrites) the actor's choice for tonight.
    pub fn submit(
        &mut self,
        roster: &Roster,
        roles: &RoleMap,
        actor: ParticipantId,
        kind: NightActionKind,
        target: ParticipantId,
    ) -> Result<(), GameError> {
        Self::authorize(roster, roles, actor, kind)?;
        if !roster.is_alive(target) {
            return Err(GameError::InvalidTarget);
        }
        if target == actor && !kind.allows_self_target() {
            return Err(GameError::InvalidTarget);
        }
        debug_assert!(!self.resolved, "night action submitted after resolution");

        let slot = match kind {
            NightActionKind::Kill => &mut self.kill,
            NightActionKind::Protect => &mut self.protect,
            NightActionKind::Investigate => &mut self.investigate,
        };
        *slot = Some(target);
        Ok(())
    }

    pub fn submit_kill(
        &mut self,
        roster: &Roster,
        roles: &RoleMap,
        actor: ParticipantId,
        target: ParticipantId,
    ) -> Result<(), GameError> {
        self.submit(roster, roles, actor, NightActionKind::Kill, target)
    }

    pub fn submit_protect(
        &mut self,
        roster: &Roster,
        roles: &RoleMap,
        actor: ParticipantId,
        target: ParticipantId,
    ) -> Result<(), GameError> {
        self.submit(roster, roles, actor, NightActionKind::Protect, target)
    }

    pub fn submit_investigate(
        &mut self,
        roster: &Roster,
        roles: &RoleMap,
        actor: ParticipantId,
        target: ParticipantId,
    ) -> Result<(), GameError> {
        self.submit(roster, roles, actor, NightActionKind::Investigate, target)
    }

    /// Actions whose role holder is alive but has not chosen yet.
    pub fn awaiting(&self, roster: &Roster, roles: &RoleMap) -> Vec<NightActionKind> {
        NightActionKind::ALL
            .into_iter()
            .filter(|kind| {
                let holder_alive = roles
                    .holder(kind.role())
                    .is_some_and(|id| roster.is_alive(id));
                holder_alive && self.target(*kind).is_none()
            })
            .collect()
    }

    /// Applies tonight's actions once every living role holder has acted.
    ///
    /// A protected kill target survives. The investigator gets an answer if
    /// they were alive when the night started, even if they die tonight.
    pub fn try_resolve(
        &mut self,
        roster: &mut Roster,
        roles: &RoleMap,
    ) -> Resolution<NightOutcome> {
        if self.resolved {
            return Resolution::Closed;
        }
        if !self.awaiting(roster, roles).is_empty() {
            return Resolution::Pending;
        }
        self.resolved = true;

        let investigator_alive = roster.is_alive(roles.investigator());

        let mut killed = None;
        let mut saved = false;
        if let Some(target) = self.kill {
            if self.protect == Some(target) {
                saved = true;
            } else {
                roster.mark_dead(target);
                killed = Some(target);
            }
        }

        let investigation = self
            .investigate
            .filter(|_| investigator_alive)
            .map(|target| Investigation {
                investigator: roles.investigator(),
                target,
                is_faction_leader: roles.role_of(target) == Some(Role::FactionLeader),
            });

        Resolution::Resolved(NightOutcome {
            killed,
            saved,
            investigation,
        })
    }
}
