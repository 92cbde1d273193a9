use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::GameError;
use crate::night::NightActionKind;
use crate::roster::{ParticipantId, Roster};

/// One leader, one investigator, one protector and at least one townsperson.
pub const MIN_PLAYERS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    FactionLeader,
    Investigator,
    Protector,
    Townsperson,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Mafia,
    Town,
}

impl Role {
    pub fn faction(self) -> Faction {
        match self {
            Role::FactionLeader => Faction::Mafia,
            Role::Investigator | Role::Protector | Role::Townsperson => Faction::Town,
        }
    }

    /// The action this role takes at night, if any.
    pub fn night_action(self) -> Option<NightActionKind> {
        match self {
            Role::FactionLeader => Some(NightActionKind::Kill),
            Role::Investigator => Some(NightActionKind::Investigate),
            Role::Protector => Some(NightActionKind::Protect),
            Role::Townsperson => None,
        }
    }

    /// Private text sent to the holder when roles are dealt.
    pub fn briefing(self) -> &'static str {
        match self {
            Role::FactionLeader => {
                "Your role: DON (mafia). Each night you choose someone to kill."
            }
            Role::Investigator => {
                "Your role: COMMISSAR. Each night you may check one player for the mafia."
            }
            Role::Protector => {
                "Your role: DOCTOR. Each night you heal one player, yourself included."
            }
            Role::Townsperson => "Your role: CIVILIAN. Work out who the mafia is.",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::FactionLeader => write!(f, "Don"),
            Role::Investigator => write!(f, "Commissar"),
            Role::Protector => write!(f, "Doctor"),
            Role::Townsperson => write!(f, "Civilian"),
        }
    }
}

/// The dealt roles of one game. Fixed once the game leaves the lobby.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleMap {
    roles: HashMap<ParticipantId, Role>,
    faction_leader: ParticipantId,
    investigator: ParticipantId,
    protector: ParticipantId,
}

impl RoleMap {
    /// Builds a role map with the three special roles fixed and everybody
    /// else on the roster a townsperson.
    ///
    /// # Panics
    ///
    /// Panics if the three ids are not distinct members of `roster`.
    pub fn new(
        roster: &Roster,
        faction_leader: ParticipantId,
        investigator: ParticipantId,
        protector: ParticipantId,
    ) -> Self {
        assert!(
            faction_leader != investigator
                && faction_leader != protector
                && investigator != protector,
            "special roles must go to distinct participants"
        );
        assert!(
            roster.contains(faction_leader)
                && roster.contains(investigator)
                && roster.contains(protector),
            "special roles must go to registered participants"
        );

        let roles = roster
            .iter()
            .map(|p| {
                let role = if p.id == faction_leader {
                    Role::FactionLeader
                } else if p.id == investigator {
                    Role::Investigator
                } else if p.id == protector {
                    Role::Protector
                } else {
                    Role::Townsperson
                };
                (p.id, role)
            })
            .collect();

        Self {
            roles,
            faction_leader,
            investigator,
            protector,
        }
    }

    pub fn role_of(&self, id: ParticipantId) -> Option<Role> {
        self.roles.get(&id).copied()
    }

    pub fn faction_leader(&self) -> ParticipantId {
        self.faction_leader
    }

    pub fn investigator(&self) -> ParticipantId {
        self.investigator
    }

    pub fn protector(&self) -> ParticipantId {
        self.protector
    }

    /// Holder of a unique role. Townsperson is not unique and yields `None`.
    pub fn holder(&self, role: Role) -> Option<ParticipantId> {
        match role {
            Role::FactionLeader => Some(self.faction_leader),
            Role::Investigator => Some(self.investigator),
            Role::Protector => Some(self.protector),
            Role::Townsperson => None,
        }
    }

    pub fn count(&self, role: Role) -> usize {
        self.roles.values().filter(|r| **r == role).count()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

/// Deals roles over a uniformly shuffled roster: the first three ids get the
/// leader, investigator and protector roles, the rest are townspeople.
pub fn assign_roles<R: Rng + ?Sized>(
    roster: &Roster,
    required: usize,
    rng: &mut R,
) -> Result<RoleMap, GameError> {
    let required = required.max(MIN_PLAYERS);
    if roster.len() < required {
        return Err(GameError::NotEnoughPlayers {
            required,
            joined: roster.len(),
        });
    }

    let mut ids = roster.ids();
    ids.shuffle(rng);

    Ok(RoleMap::new(roster, ids[0], ids[1], ids[2]))
}
