use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::GameError;

/// Stable identity handed to us by the transport (e.g. a chat user id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub u64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 1-based seat number shown to players and used to pick targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayNumber(pub u32);

impl fmt::Display for DisplayNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub number: DisplayNumber,
    pub alive: bool,
}

impl Participant {
    fn new(id: ParticipantId, name: String, number: DisplayNumber) -> Self {
        Self {
            id,
            name,
            number,
            alive: true,
        }
    }
}

/// Registered participants of one session, kept in join order.
///
/// Numbers are handed out as `len + 1` and nobody is ever removed
/// individually, so they stay dense (1..=N) for the life of the roster.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        id: ParticipantId,
        name: impl Into<String>,
    ) -> Result<DisplayNumber, GameError> {
        if self.contains(id) {
            return Err(GameError::AlreadyJoined);
        }
        let number = DisplayNumber(self.participants.len() as u32 + 1);
        self.participants
            .push(Participant::new(id, name.into(), number));
        Ok(number)
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn contains(&self, id: ParticipantId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn by_number(&self, number: DisplayNumber) -> Option<&Participant> {
        self.participants.iter().find(|p| p.number == number)
    }

    /// All participants ordered by display number.
    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }

    pub fn ids(&self) -> Vec<ParticipantId> {
        self.participants.iter().map(|p| p.id).collect()
    }

    /// Living participant ids ordered by display number.
    pub fn living(&self) -> Vec<ParticipantId> {
        self.participants
            .iter()
            .filter(|p| p.alive)
            .map(|p| p.id)
            .collect()
    }

    pub fn living_count(&self) -> usize {
        self.participants.iter().filter(|p| p.alive).count()
    }

    /// `false` for unknown ids as well as for the dead.
    pub fn is_alive(&self, id: ParticipantId) -> bool {
        self.get(id).is_some_and(|p| p.alive)
    }

    /// Maps a number picked on the client back to a living participant.
    pub fn living_by_number(&self, number: DisplayNumber) -> Result<ParticipantId, GameError> {
        match self.by_number(number) {
            Some(p) if p.alive => Ok(p.id),
            _ => Err(GameError::InvalidTarget),
        }
    }

    /// Kills a living participant.
    ///
    /// # Panics
    ///
    /// Panics when `id` is unknown or already dead. Callers only reach this
    /// after validating the target, so either case is a bug.
    pub fn mark_dead(&mut self, id: ParticipantId) {
        let participant = self.participants.iter_mut().find(|p| p.id == id);
        match participant {
            Some(p) if p.alive => p.alive = false,
            Some(_) => panic!("participant {} is already dead", id),
            None => panic!("participant {} is not on the roster", id),
        }
    }

    pub(crate) fn revive_all(&mut self) {
        for p in &mut self.participants {
            p.alive = true;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.participants.clear();
    }
}
