pub mod health;

#[cfg(test)]
mod test_support;

use std::any::Any;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer, services::ServeDir, set_header::SetResponseHeaderLayer,
};

use crate::applications::handlers as applications;
use crate::auth::handlers as auth;
use crate::auth::middleware::require_auth;
use crate::errors::AppError;
use crate::jobs::handlers as jobs;
use crate::notifications::handlers as notifications;
use crate::state::AppState;
use crate::users::handlers as users;

/// Room for the cover letter and multipart framing on top of the résumé itself.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    AppError::Internal(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}

/// Response guards applied to every route: the CSP header and the panic
/// catcher that turns a crashed handler into the generic 500 body.
fn with_response_guards<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("frame-ancestors 'self'"),
        ))
        .layer(CatchPanicLayer::custom(handle_panic))
}

pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        // Jobs
        .route(
            "/api/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/api/jobs/:id",
            get(jobs::handle_get_job)
                .put(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        // Applications
        .route(
            "/api/applications/my-applications",
            get(applications::handle_my_applications),
        )
        .route(
            "/api/applications/job/:job_id",
            get(applications::handle_list_for_job),
        )
        .route("/api/applications/:id", post(applications::handle_apply))
        .route(
            "/api/applications/:id/status",
            put(applications::handle_update_status),
        )
        // Users
        .route(
            "/api/users/profile",
            get(users::handle_get_profile).put(users::handle_update_profile),
        )
        .route(
            "/api/users/notifications",
            get(notifications::handle_list_recent),
        )
        .route(
            "/api/users/notifications/:id/read",
            put(notifications::handle_mark_read),
        )
        // Notifications
        .route("/api/notifications", get(notifications::handle_list))
        .route(
            "/api/notifications/unread-count",
            get(notifications::handle_unread_count),
        )
        .route(
            "/api/notifications/mark-all-read",
            put(notifications::handle_mark_all_read),
        )
        .route(
            "/api/notifications/:id/read",
            put(notifications::handle_mark_read),
        )
        .route(
            "/api/notifications/:id",
            delete(notifications::handle_delete),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let body_limit = state.config.max_resume_bytes + MULTIPART_OVERHEAD;

    let app = Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/auth/register", post(auth::handle_register))
        .route("/api/auth/login", post(auth::handle_login))
        .merge(protected)
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit));

    with_response_guards(app).with_state(state)
}
