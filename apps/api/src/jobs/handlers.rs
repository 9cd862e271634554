//! Axum route handlers for the Jobs API.

use axum::{extract::State, Extension, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::{AppJson, AppPath};
use crate::jobs::queries::{self, JobFields};
use crate::models::job::{JobDetail, JobListing};
use crate::models::user::Role;
use crate::state::AppState;
use crate::validation::{non_blank, optional_text};

#[derive(Debug, Deserialize)]
pub struct JobRequest {
    pub title: String,
    pub description: String,
    pub company: String,
    pub location: String,
    #[serde(default)]
    pub stipend: Option<String>,
    pub apply_by: NaiveDate,
}

impl JobRequest {
    pub fn into_fields(self) -> Result<JobFields, AppError> {
        Ok(JobFields {
            title: non_blank("title", &self.title)?,
            description: non_blank("description", &self.description)?,
            company: non_blank("company", &self.company)?,
            location: non_blank("location", &self.location)?,
            stipend: optional_text(self.stipend),
            apply_by: self.apply_by,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: Uuid,
}

const NOT_OWNED: &str = "Job not found or not authorized";

/// GET /api/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobListing>>, AppError> {
    Ok(Json(queries::list_jobs(&state.db).await?))
}

/// GET /api/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    AppPath(job_id): AppPath<Uuid>,
) -> Result<Json<JobDetail>, AppError> {
    let job = queries::get_job_detail(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    Ok(Json(job))
}

/// POST /api/jobs (alumni only)
pub async fn handle_create_job(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppJson(req): AppJson<JobRequest>,
) -> Result<Json<CreatedResponse>, AppError> {
    user.require(Role::Alumni)?;
    let fields = req.into_fields()?;

    let id = queries::insert_job(&state.db, user.id, &fields).await?;
    info!(job_id = %id, alumni_id = %user.id, "job posted");

    Ok(Json(CreatedResponse { id }))
}

/// PUT /api/jobs/:id (owning alumni only)
pub async fn handle_update_job(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppPath(job_id): AppPath<Uuid>,
    AppJson(req): AppJson<JobRequest>,
) -> Result<Json<Value>, AppError> {
    user.require(Role::Alumni)?;
    let fields = req.into_fields()?;

    queries::get_owned_job(&state.db, job_id, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_OWNED.to_string()))?;

    queries::update_job(&state.db, job_id, &fields).await?;
    Ok(Json(json!({ "message": "Job updated successfully" })))
}

/// DELETE /api/jobs/:id (owning alumni only)
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppPath(job_id): AppPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    user.require(Role::Alumni)?;

    queries::get_owned_job(&state.db, job_id, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_OWNED.to_string()))?;

    queries::delete_job(&state.db, job_id).await?;
    info!(job_id = %job_id, "job deleted");
    Ok(Json(json!({ "message": "Job deleted successfully" })))
}
