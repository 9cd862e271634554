use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::db::is_unique_violation;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::user::UserProfile;
use crate::state::AppState;
use crate::validation::{non_blank, normalize_email};

#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
}

/// GET /api/users/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = sqlx::query_as::<_, UserProfile>(
        "SELECT id, name, email, role, created_at FROM users WHERE id = $1",
    )
    .bind(user.id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(profile))
}

/// PUT /api/users/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppJson(req): AppJson<ProfileUpdate>,
) -> Result<Json<Value>, AppError> {
    let name = non_blank("name", &req.name)?;
    let email = normalize_email(&req.email)?;

    let result = sqlx::query("UPDATE users SET name = $1, email = $2 WHERE id = $3")
        .bind(&name)
        .bind(&email)
        .bind(user.id)
        .execute(&state.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Validation("Email already in use".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    Ok(Json(json!({ "message": "Profile updated successfully" })))
}
