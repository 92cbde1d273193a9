use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use mafia_rules::{ParticipantId, Phase, Role};
use mafia_server::app;
use mafia_server::models::config::GameConfig;
use mafia_server::state::AppState;
use mafia_server::utils::test_setup::setup_test_env;
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_app() -> (AppState, Router) {
    setup_test_env();
    let state = AppState::with_config(GameConfig {
        rng_seed: Some(11),
        ..GameConfig::default()
    });
    let app = app::create_app(state.clone());
    (state, app)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Joins participants `1..=n` and returns their tokens, indexed by id - 1.
async fn join_all(app: &Router, group: &str, n: u64) -> Vec<String> {
    let mut tokens = Vec::new();
    for i in 1..=n {
        let response = send(
            app,
            "POST",
            &format!("/api/game/{}/join", group),
            None,
            Some(json!({"participant_id": i, "name": format!("P{}", i)})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        tokens.push(body["token"].as_str().unwrap().to_string());
    }
    tokens
}

async fn start_game(app: &Router, group: &str, token: &str) -> Response {
    let uri = format!("/api/game/{}/start", group);
    send(app, "POST", &uri, Some(token), None).await
}

fn token_of(tokens: &[String], id: ParticipantId) -> &str {
    &tokens[id.0 as usize - 1]
}

async fn role_holder(state: &AppState, group: &str, role: Role) -> (ParticipantId, u32) {
    let session = state.session(group).await;
    let session = session.lock().await;
    let id = session.roles().unwrap().holder(role).unwrap();
    (id, session.roster().get(id).unwrap().number.0)
}

#[tokio::test]
async fn test_join_assigns_sequential_numbers() {
    let (_, app) = test_app();

    for i in 1..=3u64 {
        let response = send(
            &app,
            "POST",
            "/api/game/room-a/join",
            None,
            Some(json!({"participant_id": 100 + i, "name": "x"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["number"], i);
    }

    let response = send(&app, "GET", "/api/game/room-a/status", None, None).await;
    let status = body_json(response).await;
    assert_eq!(status["phase"], "lobby");
    assert_eq!(status["roster"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_join_after_start_is_conflict() {
    let (_, app) = test_app();
    let tokens = join_all(&app, "room-b", 4).await;
    let response = start_game(&app, "room-b", &tokens[0]).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &app,
        "POST",
        "/api/game/room-b/join",
        None,
        Some(json!({"participant_id": 99, "name": "late"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"], "game_in_progress");
}

#[tokio::test]
async fn test_start_response_carries_only_the_callers_private_events() {
    let (_, app) = test_app();
    let tokens = join_all(&app, "room-c", 4).await;

    let response = start_game(&app, "room-c", &tokens[2]).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let events = body["events"].as_array().unwrap();
    let types: Vec<&str> = events
        .iter()
        .map(|e| e["type"].as_str().unwrap())
        .collect();
    assert!(types.contains(&"game_started"));
    assert!(types.contains(&"night_started"));
    let dealt: Vec<&Value> = events
        .iter()
        .filter(|e| e["type"] == "role_assigned")
        .collect();
    assert_eq!(dealt.len(), 1);
    assert_eq!(dealt[0]["participant"], 3);
}

#[tokio::test]
async fn test_start_without_token_is_unauthorized() {
    let (state, app) = test_app();
    join_all(&app, "room-k", 4).await;

    let response = send(&app, "POST", "/api/game/room-k/start", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let session = state.sessions.get("room-k").await.unwrap();
    assert_eq!(session.lock().await.phase(), Phase::Lobby);
}

#[tokio::test]
async fn test_token_is_bound_to_its_group() {
    let (_, app) = test_app();
    let ours = join_all(&app, "room-l", 4).await;
    join_all(&app, "room-m", 4).await;

    let response = start_game(&app, "room-m", &ours[0]).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "wrong_group");
}

#[tokio::test]
async fn test_night_action_errors() {
    let (state, app) = test_app();
    let tokens = join_all(&app, "room-d", 5).await;
    start_game(&app, "room-d", &tokens[0]).await;

    let (leader, leader_number) = role_holder(&state, "room-d", Role::FactionLeader).await;
    let (investigator, _) = role_holder(&state, "room-d", Role::Investigator).await;
    let uri = "/api/game/room-d/actions/night-action";

    // Wrong role for the action.
    let response = send(
        &app,
        "POST",
        uri,
        Some(token_of(&tokens, investigator)),
        Some(json!({"action": "kill", "target_number": leader_number})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "not_your_turn");

    // The leader cannot kill itself.
    let response = send(
        &app,
        "POST",
        uri,
        Some(token_of(&tokens, leader)),
        Some(json!({"action": "kill", "target_number": leader_number})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "invalid_target");

    // Unknown seat number.
    let response = send(
        &app,
        "POST",
        uri,
        Some(token_of(&tokens, leader)),
        Some(json!({"action": "kill", "target_number": 42})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_investigation_result_only_returned_to_investigator() {
    let (state, app) = test_app();
    let tokens = join_all(&app, "room-e", 5).await;
    start_game(&app, "room-e", &tokens[0]).await;

    let (leader, leader_number) = role_holder(&state, "room-e", Role::FactionLeader).await;
    let (investigator, investigator_number) =
        role_holder(&state, "room-e", Role::Investigator).await;
    let (protector, _) = role_holder(&state, "room-e", Role::Protector).await;
    let uri = "/api/game/room-e/actions/night-action";

    send(
        &app,
        "POST",
        uri,
        Some(token_of(&tokens, investigator)),
        Some(json!({"action": "investigate", "target_number": leader_number})),
    )
    .await;
    send(
        &app,
        "POST",
        uri,
        Some(token_of(&tokens, leader)),
        Some(json!({"action": "kill", "target_number": investigator_number})),
    )
    .await;
    // The protector's action closes the night, so its response must not
    // carry the investigator's result.
    let response = send(
        &app,
        "POST",
        uri,
        Some(token_of(&tokens, protector)),
        Some(json!({"action": "protect", "target_number": leader_number})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let events = body["events"].as_array().unwrap();
    assert!(events.iter().any(|e| e["type"] == "night_resolved"));
    assert!(!events.iter().any(|e| e["type"] == "investigation_result"));

    let response = send(&app, "GET", "/api/game/room-e/status", None, None).await;
    let status = body_json(response).await;
    assert_eq!(status["phase"], "day_discussion");
    let dead: Vec<&Value> = status["roster"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|p| p["alive"] == false)
        .collect();
    assert_eq!(dead.len(), 1);
    assert_eq!(dead[0]["id"], investigator.0);
}

#[tokio::test]
async fn test_vote_flow_over_http() {
    let (state, app) = test_app();
    let tokens = join_all(&app, "room-f", 4).await;
    start_game(&app, "room-f", &tokens[0]).await;
    let (_, leader_number) = role_holder(&state, "room-f", Role::FactionLeader).await;

    let uri = "/api/game/room-f/actions/vote/start";
    let response = send(&app, "POST", uri, Some(&tokens[0]), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["candidates"].as_array().unwrap().len(), 4);

    for (i, token) in tokens.iter().enumerate() {
        let response = send(
            &app,
            "POST",
            "/api/game/room-f/actions/vote",
            Some(token),
            Some(json!({"target_number": leader_number})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        if i == tokens.len() - 1 {
            let body = body_json(response).await;
            let ended = body["events"]
                .as_array()
                .unwrap()
                .iter()
                .find(|e| e["type"] == "game_ended")
                .cloned()
                .unwrap();
            assert_eq!(ended["winner"], "town");
        }
    }

    let response = send(&app, "POST", "/api/game/room-f/new", Some(&tokens[1]), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = send(&app, "GET", "/api/game/room-f/status", None, None).await;
    assert_eq!(body_json(response).await["phase"], "lobby");
}

#[tokio::test]
async fn test_vote_is_cast_by_the_token_holder() {
    let (state, app) = test_app();
    let tokens = join_all(&app, "room-j", 4).await;
    start_game(&app, "room-j", &tokens[0]).await;
    let uri = "/api/game/room-j/actions/vote/start";
    send(&app, "POST", uri, Some(&tokens[0]), None).await;

    // A voter id in the body is not part of the request and changes nothing.
    for other in 2..=4u64 {
        let response = send(
            &app,
            "POST",
            "/api/game/room-j/actions/vote",
            Some(&tokens[0]),
            Some(json!({"voter_id": other, "target_number": 2})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let session = state.sessions.get("room-j").await.unwrap();
    let session = session.lock().await;
    assert_eq!(session.phase(), Phase::DayVote);
    assert_eq!(session.status().votes_cast, 1);
}

#[tokio::test]
async fn test_dead_participant_cannot_vote() {
    let (state, app) = test_app();
    let tokens = join_all(&app, "room-g", 5).await;
    start_game(&app, "room-g", &tokens[0]).await;
    let (_, leader_number) = role_holder(&state, "room-g", Role::FactionLeader).await;
    let (townsperson, townsperson_number) = {
        let session = state.session("room-g").await;
        let session = session.lock().await;
        let roles = session.roles().unwrap();
        let p = session
            .roster()
            .iter()
            .find(|p| roles.role_of(p.id) == Some(Role::Townsperson))
            .unwrap();
        (p.id, p.number.0)
    };

    // Everyone votes the townsperson out; leader survives, game continues.
    let start_uri = "/api/game/room-g/actions/vote/start";
    let vote_uri = "/api/game/room-g/actions/vote";
    send(&app, "POST", start_uri, Some(&tokens[0]), None).await;
    for token in &tokens {
        send(
            &app,
            "POST",
            vote_uri,
            Some(token),
            Some(json!({"target_number": townsperson_number})),
        )
        .await;
    }
    send(&app, "POST", start_uri, Some(&tokens[0]), None).await;

    let response = send(
        &app,
        "POST",
        vote_uri,
        Some(token_of(&tokens, townsperson)),
        Some(json!({"target_number": leader_number})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "not_alive");
}

#[tokio::test]
async fn test_reset_route_clears_the_group() {
    let (_, app) = test_app();
    let tokens = join_all(&app, "room-h", 4).await;
    start_game(&app, "room-h", &tokens[0]).await;

    let response = send(&app, "DELETE", "/api/game/room-h", Some(&tokens[3]), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = send(&app, "GET", "/api/game/room-h/status", None, None).await;
    let status = body_json(response).await;
    assert_eq!(status["phase"], "lobby");
    assert!(status["roster"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_status_of_unknown_group_does_not_open_it() {
    let (state, app) = test_app();

    let response = send(&app, "GET", "/api/game/room-i/status", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["phase"], "lobby");
    assert!(state.sessions.get("room-i").await.is_none());
    assert!(state.channel.lock().await.get("room-i").is_none());
}
