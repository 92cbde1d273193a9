use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use mafia_rules::{GameEvent, ParticipantId};

use crate::models::api::{
    ActionResponse, JoinRequest, JoinResponse, NightActionRequest, VoteRequest, VoteStartResponse,
};
use crate::routes::{auth_middleware, ApiError};
use crate::services::game_service;
use crate::state::AppState;
use crate::utils::auth::Player;
use crate::utils::websocket;

pub fn routes(state: AppState) -> Router {
    // 参加者トークンが必要な操作
    let seated = Router::new()
        .route("/:group_id", delete(reset_handler))
        .route("/:group_id/start", post(start_game_handler))
        .route("/:group_id/new", post(new_game_handler))
        .route("/:group_id/actions/vote/start", post(start_vote_handler))
        .route("/:group_id/actions/vote", post(cast_vote_handler))
        .route("/:group_id/actions/night-action", post(night_action_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/:group_id/join", post(join_handler))
        .route("/:group_id/status", get(status_handler))
        .route("/:group_id/ws", get(websocket::handler))
        .merge(seated)
        .with_state(state)
}

/// Keeps the public events plus the private ones addressed to `viewer`.
fn visible_to(events: Vec<GameEvent>, viewer: ParticipantId) -> Vec<GameEvent> {
    events
        .into_iter()
        .filter(|e| e.audience().includes(Some(viewer)))
        .collect()
}

async fn join_handler(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Json(req): Json<JoinRequest>,
) -> Result<Json<JoinResponse>, ApiError> {
    let token = state.auth.create_token(&group_id, req.participant_id)?;
    let (number, total, _) =
        game_service::join(state, &group_id, req.participant_id, req.name).await?;
    Ok(Json(JoinResponse {
        success: true,
        number,
        total,
        token,
    }))
}

async fn start_game_handler(
    State(state): State<AppState>,
    Extension(player): Extension<Player>,
) -> Result<Json<ActionResponse>, ApiError> {
    let events = game_service::start_game(state, &player.group_id).await?;
    Ok(Json(ActionResponse::new(visible_to(events, player.participant))))
}

async fn status_handler(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> impl IntoResponse {
    Json(game_service::get_status(state, &group_id).await)
}

async fn new_game_handler(
    State(state): State<AppState>,
    Extension(player): Extension<Player>,
) -> Result<Json<ActionResponse>, ApiError> {
    let events = game_service::new_game(state, &player.group_id).await?;
    Ok(Json(ActionResponse::new(events)))
}

async fn reset_handler(
    State(state): State<AppState>,
    Extension(player): Extension<Player>,
) -> impl IntoResponse {
    let events = game_service::reset_session(state, &player.group_id).await;
    (StatusCode::OK, Json(ActionResponse::new(events)))
}

async fn start_vote_handler(
    State(state): State<AppState>,
    Extension(player): Extension<Player>,
) -> Result<Json<VoteStartResponse>, ApiError> {
    let events = game_service::start_vote(state, &player.group_id).await?;
    let candidates = events
        .into_iter()
        .find_map(|e| match e {
            GameEvent::VoteStarted { candidates } => Some(candidates),
            _ => None,
        })
        .unwrap_or_default();
    Ok(Json(VoteStartResponse {
        success: true,
        candidates,
    }))
}

async fn cast_vote_handler(
    State(state): State<AppState>,
    Extension(player): Extension<Player>,
    Json(req): Json<VoteRequest>,
) -> Result<Json<ActionResponse>, ApiError> {
    let events = game_service::cast_vote(
        state,
        &player.group_id,
        player.participant,
        req.target_number,
    )
    .await?;
    Ok(Json(ActionResponse::new(visible_to(events, player.participant))))
}

async fn night_action_handler(
    State(state): State<AppState>,
    Extension(player): Extension<Player>,
    Json(req): Json<NightActionRequest>,
) -> Result<Json<ActionResponse>, ApiError> {
    let events = game_service::submit_night_action(
        state,
        &player.group_id,
        player.participant,
        req.action,
        req.target_number,
    )
    .await?;
    Ok(Json(ActionResponse::new(visible_to(events, player.participant))))
}
