use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mafia_rules::GameError;

use crate::models::api::ErrorResponse;
use crate::utils::auth::AuthError;

/// Everything a route can refuse with, rendered as a JSON error body.
#[derive(Debug)]
pub enum ApiError {
    Game(GameError),
    Auth(AuthError),
    GroupNotFound,
}

impl From<GameError> for ApiError {
    fn from(e: GameError) -> Self {
        ApiError::Game(e)
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        ApiError::Auth(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Game(e) => match e {
                GameError::AlreadyJoined
                | GameError::GameInProgress
                | GameError::InvalidPhase { .. }
                | GameError::LobbyFull { .. } => StatusCode::CONFLICT,
                GameError::NotEnoughPlayers { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                GameError::NotYourTurn | GameError::NotAlive => StatusCode::FORBIDDEN,
                GameError::InvalidTarget => StatusCode::BAD_REQUEST,
            },
            ApiError::Auth(AuthError::WrongGroup) => StatusCode::FORBIDDEN,
            ApiError::Auth(AuthError::TokenCreation) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::GroupNotFound => StatusCode::NOT_FOUND,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Game(e) => e.kind(),
            ApiError::Auth(AuthError::TokenCreation) => "token_creation",
            ApiError::Auth(AuthError::TokenValidation) => "invalid_token",
            ApiError::Auth(AuthError::MissingToken) => "unauthorized",
            ApiError::Auth(AuthError::WrongGroup) => "wrong_group",
            ApiError::GroupNotFound => "group_not_found",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Game(e) => e.to_string(),
            ApiError::Auth(e) => e.to_string(),
            ApiError::GroupNotFound => "no game has been opened for this group".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            success: false,
            error: self.kind().to_string(),
            message: self.message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_status_codes() {
        assert_eq!(
            ApiError::Game(GameError::AlreadyJoined).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Game(GameError::NotEnoughPlayers {
                required: 4,
                joined: 1
            })
            .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Game(GameError::NotYourTurn).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::Game(GameError::InvalidTarget).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Auth(AuthError::MissingToken).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Auth(AuthError::WrongGroup).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ApiError::GroupNotFound.status(), StatusCode::NOT_FOUND);
    }
}
