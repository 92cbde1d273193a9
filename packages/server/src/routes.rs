use crate::state::AppState;
use axum::Router;

mod auth_middleware;
mod error;
mod game;

pub use auth_middleware::auth_middleware;
pub use error::ApiError;

pub fn create_routes(state: AppState) -> Router {
    Router::new().nest("/api/game", game::routes(state))
}
