use crate::error::GameError;
use crate::roster::{ParticipantId, Roster};
use crate::Resolution;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ballot {
    voter: ParticipantId,
    target: ParticipantId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteOutcome {
    pub eliminated: ParticipantId,
    pub votes: usize,
}

/// Anonymous day vote. Each voter holds one ballot; changing a vote keeps
/// the ballot's original place in the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteLedger {
    ballots: Vec<Ballot>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cast(
        &mut self,
        roster: &Roster,
        voter: ParticipantId,
        target: ParticipantId,
    ) -> Result<(), GameError> {
        if !roster.is_alive(voter) {
            return Err(GameError::NotAlive);
        }
        if !roster.is_alive(target) {
            return Err(GameError::InvalidTarget);
        }
        match self.ballots.iter_mut().find(|b| b.voter == voter) {
            Some(ballot) => ballot.target = target,
            None => self.ballots.push(Ballot { voter, target }),
        }
        Ok(())
    }

    pub fn vote_of(&self, voter: ParticipantId) -> Option<ParticipantId> {
        self.ballots
            .iter()
            .find(|b| b.voter == voter)
            .map(|b| b.target)
    }

    pub fn voter_count(&self) -> usize {
        self.ballots.len()
    }

    pub fn clear(&mut self) {
        self.ballots.clear();
    }

    /// Votes per target, ordered by the target's first ballot in the ledger.
    pub fn tally(&self) -> Vec<(ParticipantId, usize)> {
        let mut counts: Vec<(ParticipantId, usize)> = Vec::new();
        for ballot in &self.ballots {
            match counts.iter_mut().find(|(t, _)| *t == ballot.target) {
                Some((_, count)) => *count += 1,
                None => counts.push((ballot.target, 1)),
            }
        }
        counts
    }

    /// Eliminates the most-voted target once every living participant voted.
    ///
    /// Ties go to the tied target whose first ballot sits earliest in the
    /// ledger, i.e. the target first named by the earliest voter among them.
    pub fn try_resolve(&mut self, roster: &mut Roster) -> Resolution<VoteOutcome> {
        if self.ballots.len() < roster.living_count() {
            return Resolution::Pending;
        }

        let mut leader: Option<(ParticipantId, usize)> = None;
        for (target, count) in self.tally() {
            match leader {
                Some((_, best)) if best >= count => {}
                _ => leader = Some((target, count)),
            }
        }
        let Some((eliminated, votes)) = leader else {
            return Resolution::Pending;
        };

        roster.mark_dead(eliminated);
        self.clear();
        Resolution::Resolved(VoteOutcome { eliminated, votes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: ParticipantId = ParticipantId(1);
    const B: ParticipantId = ParticipantId(2);
    const C: ParticipantId = ParticipantId(3);
    const D: ParticipantId = ParticipantId(4);

    fn roster_of(ids: &[ParticipantId]) -> Roster {
        let mut roster = Roster::new();
        for id in ids {
            roster.register(*id, format!("P{}", id)).unwrap();
        }
        roster
    }

    #[test]
    fn majority_target_is_eliminated() {
        let mut roster = roster_of(&[A, B, C]);
        let mut ledger = VoteLedger::new();
        ledger.cast(&roster, A, C).unwrap();
        ledger.cast(&roster, B, C).unwrap();
        assert_eq!(ledger.try_resolve(&mut roster), Resolution::Pending);
        ledger.cast(&roster, C, A).unwrap();

        let outcome = ledger.try_resolve(&mut roster).resolved().unwrap();
        assert_eq!(outcome, VoteOutcome { eliminated: C, votes: 2 });
        assert!(!roster.is_alive(C));
        assert_eq!(ledger.voter_count(), 0);
    }

    #[test]
    fn dead_voter_and_dead_target_are_refused() {
        let mut roster = roster_of(&[A, B, C]);
        roster.mark_dead(B);
        let mut ledger = VoteLedger::new();
        assert_eq!(ledger.cast(&roster, B, A), Err(GameError::NotAlive));
        assert_eq!(ledger.cast(&roster, A, B), Err(GameError::InvalidTarget));
        assert_eq!(ledger.voter_count(), 0);
    }

    #[test]
    fn self_vote_counts() {
        let mut roster = roster_of(&[A, B, C]);
        let mut ledger = VoteLedger::new();
        ledger.cast(&roster, A, A).unwrap();
        ledger.cast(&roster, B, A).unwrap();
        ledger.cast(&roster, C, B).unwrap();
        let outcome = ledger.try_resolve(&mut roster).resolved().unwrap();
        assert_eq!(outcome.eliminated, A);
    }

    #[test]
    fn changed_vote_replaces_the_old_one() {
        let mut roster = roster_of(&[A, B, C]);
        let mut ledger = VoteLedger::new();
        ledger.cast(&roster, A, B).unwrap();
        ledger.cast(&roster, A, C).unwrap();
        assert_eq!(ledger.voter_count(), 1);
        assert_eq!(ledger.vote_of(A), Some(C));
        assert_eq!(ledger.tally(), vec![(C, 1)]);
    }

    #[test]
    fn tie_goes_to_the_target_named_first() {
        let mut roster = roster_of(&[A, B, C, D]);
        let mut ledger = VoteLedger::new();
        ledger.cast(&roster, A, D).unwrap();
        ledger.cast(&roster, B, C).unwrap();
        ledger.cast(&roster, C, C).unwrap();
        ledger.cast(&roster, D, D).unwrap();
        assert_eq!(ledger.tally(), vec![(D, 2), (C, 2)]);

        let outcome = ledger.try_resolve(&mut roster).resolved().unwrap();
        assert_eq!(outcome.eliminated, D);
    }

    #[test]
    fn tie_order_survives_a_changed_vote() {
        let mut roster = roster_of(&[A, B, C, D]);
        let mut ledger = VoteLedger::new();
        ledger.cast(&roster, A, B).unwrap();
        ledger.cast(&roster, B, C).unwrap();
        ledger.cast(&roster, C, B).unwrap();
        ledger.cast(&roster, D, C).unwrap();
        // A moves from B to D; B keeps one vote, C leads with two.
        ledger.cast(&roster, A, D).unwrap();

        let outcome = ledger.try_resolve(&mut roster).resolved().unwrap();
        assert_eq!(outcome, VoteOutcome { eliminated: C, votes: 2 });
    }
}
