use axum::{extract::State, Extension, Json};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::AppPath;
use crate::models::notification::NotificationRow;
use crate::notifications::queries;
use crate::state::AppState;

/// Size of the short list served under /api/users/notifications.
pub const RECENT_LIMIT: i64 = 50;

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub count: i64,
}

/// GET /api/notifications
pub async fn handle_list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<NotificationRow>>, AppError> {
    Ok(Json(queries::list_for_user(&state.db, user.id, None).await?))
}

/// GET /api/users/notifications
pub async fn handle_list_recent(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<NotificationRow>>, AppError> {
    Ok(Json(
        queries::list_for_user(&state.db, user.id, Some(RECENT_LIMIT)).await?,
    ))
}

/// GET /api/notifications/unread-count
pub async fn handle_unread_count(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UnreadCount>, AppError> {
    let count = queries::unread_count(&state.db, user.id).await?;
    Ok(Json(UnreadCount { count }))
}

/// PUT /api/notifications/:id/read
pub async fn handle_mark_read(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    if !queries::mark_read(&state.db, id, user.id).await? {
        return Err(AppError::NotFound("Notification not found".to_string()));
    }
    Ok(Json(json!({ "message": "Notification marked as read" })))
}

/// PUT /api/notifications/mark-all-read
pub async fn handle_mark_all_read(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let updated = queries::mark_all_read(&state.db, user.id).await?;
    tracing::debug!(user_id = %user.id, updated, "marked notifications read");
    Ok(Json(json!({ "message": "All notifications marked as read" })))
}

/// DELETE /api/notifications/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    if !queries::delete(&state.db, id, user.id).await? {
        return Err(AppError::NotFound("Notification not found".to_string()));
    }
    Ok(Json(json!({ "message": "Notification deleted" })))
}
