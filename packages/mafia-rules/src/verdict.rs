use serde::{Deserialize, Serialize};
use std::fmt;

use crate::roles::RoleMap;
use crate::roster::Roster;
use crate::session::Phase;

/// With this many players left (or fewer) the town can no longer outvote
/// the leader.
pub const MAFIA_WIN_LIVING: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Town,
    Mafia,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::Town => write!(f, "The town wins! The mafia has been caught."),
            Winner::Mafia => write!(f, "The mafia wins! Too few civilians are left."),
        }
    }
}

/// Which resolution just finished; decides where a continuing game goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    Night,
    Vote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    TownWins,
    MafiaWins,
    Continue(Phase),
}

impl Verdict {
    pub fn winner(self) -> Option<Winner> {
        match self {
            Verdict::TownWins => Some(Winner::Town),
            Verdict::MafiaWins => Some(Winner::Mafia),
            Verdict::Continue(_) => None,
        }
    }
}

/// Decides whether the game is over. The leader's death is checked first,
/// so the town wins even if only two players remain.
pub fn evaluate(roster: &Roster, roles: &RoleMap, cause: DeathCause) -> Verdict {
    if !roster.is_alive(roles.faction_leader()) {
        return Verdict::TownWins;
    }
    if roster.living_count() <= MAFIA_WIN_LIVING {
        return Verdict::MafiaWins;
    }
    match cause {
        DeathCause::Night => Verdict::Continue(Phase::DayDiscussion),
        DeathCause::Vote => Verdict::Continue(Phase::Night),
    }
}
