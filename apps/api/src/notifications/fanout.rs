//! Best-effort notifications fired after application events.
//!
//! Each notification is an independent insert on a detached task. Failures
//! are logged and dropped; they never reach the request that triggered them.

use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::notifications::queries::insert_notification;

const FALLBACK_STUDENT_NAME: &str = "A student";

pub fn applied_for_posting(student_name: Option<&str>, job_title: &str) -> String {
    let name = student_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(FALLBACK_STUDENT_NAME);
    format!("{name} applied for your posting: {job_title}")
}

pub fn application_submitted(job_title: &str) -> String {
    format!("Your application for {job_title} has been submitted")
}

pub fn status_changed(job_title: &str, status: &str) -> String {
    format!("Your application for {job_title} has been {status}")
}

/// Queues one notification insert and returns immediately.
pub fn notify(pool: &PgPool, user_id: Uuid, message: String) {
    let pool = pool.clone();
    tokio::spawn(async move {
        deliver(&pool, user_id, &message).await;
    });
}

/// Tells the job owner who applied and confirms submission to the applicant.
/// The student's name is looked up on the task; if that fails the owner
/// message uses a generic name.
pub fn notify_application_submitted(
    pool: &PgPool,
    owner_id: Uuid,
    student_id: Uuid,
    job_title: String,
) {
    let pool = pool.clone();
    tokio::spawn(async move {
        let student_name: Option<String> =
            match sqlx::query_scalar("SELECT name FROM users WHERE id = $1")
                .bind(student_id)
                .fetch_optional(&pool)
                .await
            {
                Ok(name) => name,
                Err(e) => {
                    warn!(student_id = %student_id, "student name lookup failed: {e}");
                    None
                }
            };

        let owner_message = applied_for_posting(student_name.as_deref(), &job_title);
        deliver(&pool, owner_id, &owner_message).await;
        deliver(&pool, student_id, &application_submitted(&job_title)).await;
    });
}

async fn deliver(pool: &PgPool, user_id: Uuid, message: &str) {
    if let Err(e) = insert_notification(pool, user_id, message).await {
        warn!(user_id = %user_id, "dropping notification: {e}");
    }
}
