use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, Query, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{sink::SinkExt, stream::StreamExt};
use mafia_rules::ParticipantId;
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::routes::ApiError;
use crate::state::AppState;

/// Browsers cannot set headers on a websocket handshake, so the seat
/// token rides in the query string. Without one the client only sees
/// group-wide events.
#[derive(Debug, Default, Deserialize)]
pub struct SubscribeParams {
    pub token: Option<String>,
}

pub async fn handler(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Query(params): Query<SubscribeParams>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    let viewer = match params.token {
        Some(token) => Some(state.auth.verify_token(&token, &group_id)?.participant),
        None => None,
    };
    if state.sessions.get(&group_id).await.is_none() {
        return Err(ApiError::GroupNotFound);
    }
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, group_id, viewer)))
}

/// Streams the group's events to one client. Private events only go out
/// when `viewer` is the participant they are addressed to.
pub async fn handle_socket(
    ws: WebSocket,
    state: AppState,
    group_id: String,
    viewer: Option<ParticipantId>,
) {
    info!(group = %group_id, ?viewer, "websocket connection established");
    let tx = state.get_or_create_group_channel(&group_id).await;
    let mut rx = tx.subscribe();
    let (mut sender, mut receiver) = ws.split();

    let group_for_send = group_id.clone();
    let mut send_task = tokio::spawn(async move {
        loop {
            let envelope = match rx.recv().await {
                Ok(envelope) => envelope,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(group = %group_for_send, skipped, "subscriber lagged behind");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            if !envelope.is_visible_to(viewer) {
                continue;
            }
            let text = match serde_json::to_string(&envelope) {
                Ok(text) => text,
                Err(e) => {
                    warn!(group = %group_for_send, "failed to encode event: {}", e);
                    continue;
                }
            };
            if let Err(e) = sender.send(Message::Text(text)).await {
                debug!(group = %group_for_send, "client went away: {}", e);
                break;
            }
        }
    });

    // 受信側はクローズ検知のみ。ゲーム操作はHTTPで受け付ける
    let mut receive_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => receive_task.abort(),
        _ = &mut receive_task => send_task.abort(),
    }
    info!(group = %group_id, ?viewer, "websocket connection closed");
}
