use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::state::AppState;

pub const TOKEN_HEADER: &str = "x-auth-token";

/// Rejects requests without a valid session token and stores the caller as
/// an `AuthUser` extension for downstream handlers.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = token_from_headers(request.headers())
        .ok_or_else(|| AppError::Unauthorized("No token, authorization denied".to_string()))?;

    let claims = state.tokens.verify(&token).map_err(|e| {
        tracing::debug!("rejected token: {e}");
        AppError::Unauthorized("Token is not valid".to_string())
    })?;

    request.extensions_mut().insert(AuthUser {
        id: claims.sub,
        role: claims.role,
    });
    Ok(next.run(request).await)
}

/// Reads `x-auth-token`, falling back to `Authorization: Bearer <token>`.
fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let custom = headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = custom {
        return Some(token.to_string());
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
}
