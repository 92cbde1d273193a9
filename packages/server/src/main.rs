use axum::http::{self, Method};
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mafia_server::app;
use mafia_server::models::config::GameConfig;
use mafia_server::state::AppState;
use mafia_server::utils::auth::TokenKeys;
use mafia_server::utils::config::Config;

// ログ設定
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .with_target(true)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 環境変数をロード
    let dotenv_result = dotenv();
    init_tracing();
    if let Err(e) = dotenv_result {
        warn!(".env not loaded: {}", e);
    }

    let config = Config::from_env()?;
    let game_config = GameConfig::from_env();
    info!(
        min_players = game_config.rules.min_players,
        max_players = ?game_config.rules.max_players,
        roster_policy = ?game_config.rules.roster_policy,
        seeded = game_config.rng_seed.is_some(),
        "game configuration loaded"
    );
    let keys = match &config.jwt_secret {
        Some(secret) => TokenKeys::from_secret(secret.as_bytes()),
        None => {
            warn!("JWT_SECRET not set, seat tokens will not survive a restart");
            TokenKeys::random()
        }
    };
    let state = AppState::with_config(game_config).with_token_keys(keys);

    // CORSレイヤーの設定
    let cors = CorsLayer::new()
        .allow_origin([config.cors_origin.clone()])
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION]);

    let app = app::create_app(state).layer(cors).layer(
        TraceLayer::new_for_http().make_span_with(|request: &http::Request<_>| {
            tracing::info_span!(
                "HTTP request",
                method = %request.method(),
                uri = %request.uri(),
            )
        }),
    );

    // サーバーの起動
    let listener = tokio::net::TcpListener::bind(&config.server_addr).await?;
    info!("listening on http://{}", config.server_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
