//! Axum route handlers for the Applications API.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::applications::queries::{self, NewApplication};
use crate::applications::upload::read_application_form;
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::{AppJson, AppPath};
use crate::jobs::handlers::CreatedResponse;
use crate::jobs::queries::{get_job, get_owned_job};
use crate::models::application::{JobApplicant, StudentApplication};
use crate::models::user::Role;
use crate::notifications::fanout;
use crate::state::AppState;
use crate::validation::non_blank;

const ALREADY_APPLIED: &str = "Already applied for this job";

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// POST /api/applications/:job_id (students only)
///
/// Multipart body: `resume` (PDF file, required) and `cover_letter` (text).
/// Notifications go out after the insert and cannot fail the request.
pub async fn handle_apply(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppPath(job_id): AppPath<Uuid>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<CreatedResponse>, AppError> {
    user.require(Role::Student)?;
    let mut multipart = multipart.map_err(|e| AppError::Validation(e.body_text()))?;

    let job = get_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;

    let form = read_application_form(&mut multipart, state.config.max_resume_bytes).await?;
    let resume = form
        .resume
        .ok_or_else(|| AppError::Validation("Resume is required".to_string()))?;

    if queries::has_applied(&state.db, job_id, user.id).await? {
        return Err(AppError::Validation(ALREADY_APPLIED.to_string()));
    }

    let resume_url = state
        .resumes
        .save(&resume.file_name, resume.contents)
        .await
        .map_err(|e| AppError::Storage(format!("{e:#}")))?;

    let inserted = queries::insert_application(
        &state.db,
        NewApplication {
            job_id,
            student_id: user.id,
            resume_url: &resume_url,
            cover_letter: form.cover_letter.as_deref(),
        },
    )
    .await;

    let id = match inserted {
        Ok(id) => id,
        Err(e) => {
            if let Err(cleanup) = state.resumes.remove(&resume_url).await {
                warn!("failed to remove orphaned resume {resume_url}: {cleanup:#}");
            }
            return Err(AppError::Database(e));
        }
    };

    info!(application_id = %id, job_id = %job_id, student_id = %user.id, "application submitted");
    fanout::notify_application_submitted(&state.db, job.alumni_id, user.id, job.title);

    Ok(Json(CreatedResponse { id }))
}

/// GET /api/applications/job/:job_id (owning alumni only)
pub async fn handle_list_for_job(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppPath(job_id): AppPath<Uuid>,
) -> Result<Json<Vec<JobApplicant>>, AppError> {
    user.require(Role::Alumni)?;

    get_owned_job(&state.db, job_id, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found or not authorized".to_string()))?;

    Ok(Json(queries::list_for_job(&state.db, job_id).await?))
}

/// GET /api/applications/my-applications (students only)
pub async fn handle_my_applications(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<StudentApplication>>, AppError> {
    user.require(Role::Student)?;
    Ok(Json(queries::list_for_student(&state.db, user.id).await?))
}

/// PUT /api/applications/:id/status (owning alumni only)
///
/// The status is free text stored as given. There are no transition rules.
pub async fn handle_update_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppPath(application_id): AppPath<Uuid>,
    AppJson(req): AppJson<StatusUpdate>,
) -> Result<Json<Value>, AppError> {
    user.require(Role::Alumni)?;
    non_blank("status", &req.status)?;
    let status = req.status;

    let target = queries::find_review_target(&state.db, application_id, user.id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Application not found or not authorized".to_string())
        })?;

    queries::update_status(&state.db, application_id, &status).await?;
    info!(application_id = %application_id, status = %status, "application status updated");

    fanout::notify(
        &state.db,
        target.student_id,
        fanout::status_changed(&target.job_title, &status),
    );

    Ok(Json(json!({ "message": "Application status updated successfully" })))
}
