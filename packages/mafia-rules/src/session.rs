use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

use crate::error::GameError;
use crate::events::{GameEvent, ParticipantView};
use crate::night::{NightActionKind, NightActions};
use crate::roles::{assign_roles, Role, RoleMap};
use crate::roster::{DisplayNumber, ParticipantId, Roster};
use crate::rules::{RosterPolicy, Rules};
use crate::verdict::{evaluate, DeathCause, Verdict};
use crate::voting::VoteLedger;
use crate::Resolution;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Lobby,
    Night,
    DayDiscussion,
    DayVote,
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Lobby => write!(f, "lobby"),
            Phase::Night => write!(f, "night"),
            Phase::DayDiscussion => write!(f, "day discussion"),
            Phase::DayVote => write!(f, "day vote"),
            Phase::Finished => write!(f, "finished"),
        }
    }
}

/// Snapshot returned to `status` requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusView {
    pub group_id: String,
    pub phase: Phase,
    pub night: u32,
    pub roster: Vec<ParticipantView>,
    pub votes_cast: usize,
}

/// One game in one group, and the state machine that drives it.
///
/// Every public method is a complete operation: it either validates and
/// applies everything, or returns an error and changes nothing. Resolution
/// of nights and votes happens inside the call that supplied the last
/// missing input, and the resulting notifications come back as events.
#[derive(Debug)]
pub struct Session {
    group_id: String,
    phase: Phase,
    rules: Rules,
    roster: Roster,
    roles: Option<RoleMap>,
    night: NightActions,
    votes: VoteLedger,
    night_count: u32,
    rng: StdRng,
}

impl Session {
    pub fn new(group_id: impl Into<String>, rules: Rules) -> Self {
        Self::with_rng(group_id, rules, StdRng::from_entropy())
    }

    /// Same as [`Session::new`] but with a reproducible role deal.
    pub fn with_seed(group_id: impl Into<String>, rules: Rules, seed: u64) -> Self {
        Self::with_rng(group_id, rules, StdRng::seed_from_u64(seed))
    }

    fn with_rng(group_id: impl Into<String>, rules: Rules, rng: StdRng) -> Self {
        Self {
            group_id: group_id.into(),
            phase: Phase::Lobby,
            rules,
            roster: Roster::new(),
            roles: None,
            night: NightActions::new(),
            votes: VoteLedger::new(),
            night_count: 0,
            rng,
        }
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn roles(&self) -> Option<&RoleMap> {
        self.roles.as_ref()
    }

    pub fn night_actions(&self) -> &NightActions {
        &self.night
    }

    pub fn votes(&self) -> &VoteLedger {
        &self.votes
    }

    pub fn night_count(&self) -> u32 {
        self.night_count
    }

    pub fn join(
        &mut self,
        participant: ParticipantId,
        name: impl Into<String>,
    ) -> Result<DisplayNumber, GameError> {
        if self.phase != Phase::Lobby {
            return Err(GameError::GameInProgress);
        }
        if let Some(max) = self.rules.max_players {
            if self.roster.len() >= max && !self.roster.contains(participant) {
                return Err(GameError::LobbyFull { max });
            }
        }
        let number = self.roster.register(participant, name)?;
        debug!(group = %self.group_id, %participant, %number, "participant joined");
        Ok(number)
    }

    /// Deals roles and opens the first night.
    pub fn start_game(&mut self) -> Result<Vec<GameEvent>, GameError> {
        if self.phase != Phase::Lobby {
            return Err(GameError::GameInProgress);
        }
        let roles = assign_roles(&self.roster, self.rules.required_players(), &mut self.rng)?;

        let mut events: Vec<GameEvent> = self
            .roster
            .iter()
            .filter_map(|p| {
                roles.role_of(p.id).map(|role| GameEvent::RoleAssigned {
                    participant: p.id,
                    role,
                    briefing: role.briefing().to_string(),
                })
            })
            .collect();
        events.push(GameEvent::GameStarted {
            roster: self.roster_view(),
        });
        self.roles = Some(roles);
        info!(group = %self.group_id, players = self.roster.len(), "game started");

        self.begin_night(&mut events);
        Ok(events)
    }

    pub fn status(&self) -> StatusView {
        StatusView {
            group_id: self.group_id.clone(),
            phase: self.phase,
            night: self.night_count,
            roster: self.roster_view(),
            votes_cast: self.votes.voter_count(),
        }
    }

    /// Opens the day vote. Allowed after the night resolved, and also
    /// straight from an unresolved night, which abandons that night.
    pub fn start_vote(&mut self) -> Result<Vec<GameEvent>, GameError> {
        match self.phase {
            Phase::Night | Phase::DayDiscussion => {}
            phase => return Err(GameError::InvalidPhase { phase }),
        }
        if self.phase == Phase::Night && !self.night.is_resolved() {
            warn!(
                group = %self.group_id,
                night = self.night_count,
                "vote forced before the night resolved"
            );
        }

        let mut events = Vec::new();
        self.votes.clear();
        self.transition(Phase::DayVote, &mut events);
        events.push(GameEvent::VoteStarted {
            candidates: self.living_view(),
        });
        Ok(events)
    }

    pub fn cast_vote(
        &mut self,
        voter: ParticipantId,
        target: DisplayNumber,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.expect_phase(Phase::DayVote)?;
        if !self.roster.is_alive(voter) {
            return Err(GameError::NotAlive);
        }
        let target = self.roster.living_by_number(target)?;
        self.votes.cast(&self.roster, voter, target)?;
        debug!(
            group = %self.group_id,
            cast = self.votes.voter_count(),
            living = self.roster.living_count(),
            "vote recorded"
        );

        let mut events = Vec::new();
        match self.votes.try_resolve(&mut self.roster) {
            Resolution::Resolved(outcome) => {
                info!(
                    group = %self.group_id,
                    eliminated = %outcome.eliminated,
                    votes = outcome.votes,
                    "vote resolved"
                );
                if let Some(eliminated) = self.view_of(outcome.eliminated) {
                    events.push(GameEvent::VoteResolved {
                        eliminated,
                        votes: outcome.votes,
                    });
                }
                self.conclude(DeathCause::Vote, &mut events);
            }
            Resolution::Pending | Resolution::Closed => {}
        }
        Ok(events)
    }

    pub fn submit_night_action(
        &mut self,
        actor: ParticipantId,
        action: NightActionKind,
        target: DisplayNumber,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.expect_phase(Phase::Night)?;
        let Some(roles) = self.roles.as_ref() else {
            return Err(GameError::InvalidPhase { phase: self.phase });
        };
        NightActions::authorize(&self.roster, roles, actor, action)?;
        let target = self.roster.living_by_number(target)?;
        self.night
            .submit(&self.roster, roles, actor, action, target)?;
        debug!(group = %self.group_id, night = self.night_count, %action, "night action recorded");

        let mut events = Vec::new();
        self.resolve_night(&mut events);
        Ok(events)
    }

    /// Returns a finished session to the lobby for another game.
    pub fn new_game(&mut self) -> Result<Vec<GameEvent>, GameError> {
        self.expect_phase(Phase::Finished)?;

        self.roles = None;
        self.night = NightActions::new();
        self.votes.clear();
        self.night_count = 0;
        match self.rules.roster_policy {
            RosterPolicy::Keep => self.roster.revive_all(),
            RosterPolicy::Clear => self.roster.clear(),
        }

        let mut events = Vec::new();
        self.transition(Phase::Lobby, &mut events);
        events.push(GameEvent::LobbyReopened {
            roster: self.roster_view(),
        });
        info!(group = %self.group_id, kept = self.roster.len(), "lobby reopened");
        Ok(events)
    }

    fn expect_phase(&self, phase: Phase) -> Result<(), GameError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(GameError::InvalidPhase { phase: self.phase })
        }
    }

    fn transition(&mut self, to: Phase, events: &mut Vec<GameEvent>) {
        let from = self.phase;
        self.phase = to;
        debug!(group = %self.group_id, %from, %to, "phase changed");
        events.push(GameEvent::PhaseChanged { from, to });
    }

    /// Clears the slots, prompts each living role holder, and resolves at
    /// once if nobody is left to act.
    fn begin_night(&mut self, events: &mut Vec<GameEvent>) {
        self.night_count += 1;
        self.night = NightActions::new();
        self.votes.clear();
        self.transition(Phase::Night, events);
        events.push(GameEvent::NightStarted {
            night: self.night_count,
        });

        if let Some(roles) = self.roles.as_ref() {
            for action in NightActionKind::ALL {
                let Some(actor) = roles.holder(action.role()) else {
                    continue;
                };
                if !self.roster.is_alive(actor) {
                    continue;
                }
                let targets = self
                    .roster
                    .iter()
                    .filter(|p| p.alive && (p.id != actor || action.allows_self_target()))
                    .map(ParticipantView::from)
                    .collect();
                events.push(GameEvent::NightActionRequested {
                    actor,
                    action,
                    targets,
                });
            }
        }

        self.resolve_night(events);
    }

    fn resolve_night(&mut self, events: &mut Vec<GameEvent>) {
        let Some(roles) = self.roles.as_ref() else {
            return;
        };
        let outcome = match self.night.try_resolve(&mut self.roster, roles) {
            Resolution::Resolved(outcome) => outcome,
            Resolution::Pending => return,
            Resolution::Closed => {
                warn!(group = %self.group_id, night = self.night_count, "night already resolved");
                return;
            }
        };
        info!(
            group = %self.group_id,
            night = self.night_count,
            killed = outcome.killed.is_some(),
            "night resolved"
        );

        events.push(GameEvent::NightResolved {
            summary: outcome.summary(&self.roster),
        });
        if let Some(investigation) = outcome.investigation {
            if let Some(target) = self.view_of(investigation.target) {
                events.push(GameEvent::InvestigationResult {
                    investigator: investigation.investigator,
                    target,
                    is_faction_leader: investigation.is_faction_leader,
                });
            }
        }
        self.conclude(DeathCause::Night, events);
    }

    fn conclude(&mut self, cause: DeathCause, events: &mut Vec<GameEvent>) {
        let Some(roles) = self.roles.as_ref() else {
            return;
        };
        match evaluate(&self.roster, roles, cause) {
            Verdict::Continue(Phase::Night) => self.begin_night(events),
            Verdict::Continue(next) => self.transition(next, events),
            verdict => {
                if let Some(winner) = verdict.winner() {
                    info!(group = %self.group_id, ?winner, "game over");
                    self.transition(Phase::Finished, events);
                    events.push(GameEvent::GameEnded { winner });
                }
            }
        }
    }

    fn view_of(&self, id: ParticipantId) -> Option<ParticipantView> {
        self.roster.get(id).map(ParticipantView::from)
    }

    fn roster_view(&self) -> Vec<ParticipantView> {
        self.roster.iter().map(ParticipantView::from).collect()
    }

    fn living_view(&self) -> Vec<ParticipantView> {
        self.roster
            .iter()
            .filter(|p| p.alive)
            .map(ParticipantView::from)
            .collect()
    }

    /// Role of a participant in the running game.
    pub fn role_of(&self, participant: ParticipantId) -> Option<Role> {
        self.roles.as_ref().and_then(|r| r.role_of(participant))
    }
}
