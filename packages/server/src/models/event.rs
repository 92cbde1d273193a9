use chrono::{DateTime, Utc};
use mafia_rules::{Audience, GameEvent, ParticipantId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A game event as it travels over the group channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event_id: String,
    pub group_id: String,
    pub audience: Audience,
    pub timestamp: DateTime<Utc>,
    pub event: GameEvent,
}

impl EventEnvelope {
    pub fn new(group_id: &str, event: GameEvent) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            group_id: group_id.to_string(),
            audience: event.audience(),
            timestamp: Utc::now(),
            event,
        }
    }

    pub fn is_visible_to(&self, participant: Option<ParticipantId>) -> bool {
        self.audience.includes(participant)
    }
}
