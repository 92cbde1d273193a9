use axum::{
    extract::{Path, Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::routes::ApiError;
use crate::state::AppState;
use crate::utils::auth::AuthError;

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Resolves the caller's seat token into a [`Player`] request extension.
///
/// [`Player`]: crate::utils::auth::Player
pub async fn auth_middleware(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // ヘッダーからトークンを取得して検証
    let token = bearer_token(request.headers()).ok_or(AuthError::MissingToken)?;
    let player = state.auth.verify_token(token, &group_id)?;

    request.extensions_mut().insert(player);
    Ok(next.run(request).await)
}
