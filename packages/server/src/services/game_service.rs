use mafia_rules::{
    DisplayNumber, GameError, GameEvent, NightActionKind, ParticipantId, ParticipantView,
    StatusView,
};
use tracing::{info, warn};

use crate::models::api::{RoleEntry, StatusResponse};
use crate::state::AppState;

/// Registers a participant in the group's lobby, creating the session on
/// first use. Returns the assigned number and the event announcing it.
pub async fn join(
    state: AppState,
    group_id: &str,
    participant: ParticipantId,
    name: String,
) -> Result<(DisplayNumber, usize, Vec<GameEvent>), GameError> {
    let tx = state.get_or_create_group_channel(group_id).await;
    let session = state.session(group_id).await;
    let mut session = session.lock().await;

    let number = session.join(participant, name)?;
    let total = session.roster().len();
    let events: Vec<GameEvent> = session
        .roster()
        .get(participant)
        .map(|p| GameEvent::ParticipantJoined {
            participant: ParticipantView::from(p),
            total,
        })
        .into_iter()
        .collect();

    AppState::publish(&tx, group_id, &events);
    info!(group = group_id, %participant, %number, total, "participant joined");
    Ok((number, total, events))
}

pub async fn start_game(state: AppState, group_id: &str) -> Result<Vec<GameEvent>, GameError> {
    let tx = state.get_or_create_group_channel(group_id).await;
    let session = state.session(group_id).await;
    let mut session = session.lock().await;

    let events = session.start_game().map_err(|e| {
        warn!(group = group_id, "could not start game: {}", e);
        e
    })?;
    AppState::publish(&tx, group_id, &events);
    Ok(events)
}

/// Reads the group's state. A group nobody has joined reads as an empty
/// lobby without being stored.
pub async fn get_status(state: AppState, group_id: &str) -> StatusResponse {
    let Some(session) = state.sessions.get(group_id).await else {
        return StatusResponse {
            status: state.new_session(group_id).status(),
            roles: None,
        };
    };
    let session = session.lock().await;

    let status: StatusView = session.status();
    let roles = if state.game_config.show_player_roles {
        session.roles().map(|roles| {
            session
                .roster()
                .iter()
                .filter_map(|p| {
                    roles.role_of(p.id).map(|role| RoleEntry {
                        participant: p.id,
                        role,
                    })
                })
                .collect()
        })
    } else {
        None
    };
    StatusResponse { status, roles }
}

pub async fn start_vote(state: AppState, group_id: &str) -> Result<Vec<GameEvent>, GameError> {
    let tx = state.get_or_create_group_channel(group_id).await;
    let session = state.session(group_id).await;
    let mut session = session.lock().await;

    let events = session.start_vote()?;
    AppState::publish(&tx, group_id, &events);
    info!(group = group_id, "vote started");
    Ok(events)
}

pub async fn cast_vote(
    state: AppState,
    group_id: &str,
    voter: ParticipantId,
    target: DisplayNumber,
) -> Result<Vec<GameEvent>, GameError> {
    let tx = state.get_or_create_group_channel(group_id).await;
    let session = state.session(group_id).await;
    let mut session = session.lock().await;

    let events = session.cast_vote(voter, target)?;
    AppState::publish(&tx, group_id, &events);
    Ok(events)
}

pub async fn submit_night_action(
    state: AppState,
    group_id: &str,
    actor: ParticipantId,
    action: NightActionKind,
    target: DisplayNumber,
) -> Result<Vec<GameEvent>, GameError> {
    let tx = state.get_or_create_group_channel(group_id).await;
    let session = state.session(group_id).await;
    let mut session = session.lock().await;

    let events = session.submit_night_action(actor, action, target)?;
    AppState::publish(&tx, group_id, &events);
    Ok(events)
}

pub async fn new_game(state: AppState, group_id: &str) -> Result<Vec<GameEvent>, GameError> {
    let tx = state.get_or_create_group_channel(group_id).await;
    let session = state.session(group_id).await;
    let mut session = session.lock().await;

    let events = session.new_game()?;
    AppState::publish(&tx, group_id, &events);
    Ok(events)
}

/// Throws away the group's game whatever its phase and opens an empty lobby.
///
/// The reset takes the session lock like any other operation, so an action
/// already in flight publishes its events before the lobby reopens.
pub async fn reset_session(state: AppState, group_id: &str) -> Vec<GameEvent> {
    let tx = state.get_or_create_group_channel(group_id).await;
    let session = state.session(group_id).await;
    let mut session = session.lock().await;
    *session = state.new_session(group_id);

    let events = vec![GameEvent::LobbyReopened { roster: Vec::new() }];
    AppState::publish(&tx, group_id, &events);
    warn!(group = group_id, "session reset");
    events
}
