use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::db::is_unique_violation;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::user::{Role, UserRow};
use crate::state::AppState;
use crate::validation::{non_blank, normalize_email};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<UserRow> for UserSummary {
    fn from(row: UserRow) -> Self {
        UserSummary {
            id: row.id,
            name: row.name,
            email: row.email,
            role: row.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserSummary,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

const USER_EXISTS: &str = "User already exists";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// POST /api/auth/register
///
/// Creates the account but does not log the user in.
pub async fn handle_register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    let name = non_blank("name", &req.name)?;
    let email = normalize_email(&req.email)?;
    if req.password.is_empty() {
        return Err(AppError::Validation("password is required".to_string()));
    }
    let role: Role = req
        .role
        .trim()
        .parse()
        .map_err(|_| AppError::Validation("Invalid role".to_string()))?;

    let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Validation(USER_EXISTS.to_string()));
    }

    let password_hash = hash_password_blocking(req.password).await?;

    let user = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (name, email, password, role)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, email, password, role
        "#,
    )
    .bind(&name)
    .bind(&email)
    .bind(&password_hash)
    .bind(role.as_str())
    .fetch_one(&state.db)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Validation(USER_EXISTS.to_string())
        } else {
            AppError::Database(e)
        }
    })?;

    info!(user_id = %user.id, role = %role, "user registered");

    Ok(Json(RegisterResponse {
        message: "User registered successfully".to_string(),
        user: user.into(),
    }))
}

/// POST /api/auth/login
///
/// Unknown email and wrong password produce the same 400.
pub async fn handle_login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = req.email.trim().to_lowercase();

    let user = sqlx::query_as::<_, UserRow>(
        "SELECT id, name, email, password, role FROM users WHERE email = $1",
    )
    .bind(&email)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::Validation(INVALID_CREDENTIALS.to_string()))?;

    if !verify_password_blocking(req.password, user.password.clone()).await? {
        return Err(AppError::Validation(INVALID_CREDENTIALS.to_string()));
    }

    let role: Role = user
        .role
        .parse()
        .map_err(|e: String| AppError::Internal(anyhow::anyhow!(e)))?;
    let token = state.tokens.issue(user.id, role)?;

    info!(user_id = %user.id, "user logged in");

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}
