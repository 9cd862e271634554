use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::application::{JobApplicant, StudentApplication};

/// The pieces of an application its reviewer needs to notify the applicant.
#[derive(Debug, Clone, FromRow)]
pub struct ReviewTarget {
    pub student_id: Uuid,
    pub job_title: String,
}

pub struct NewApplication<'a> {
    pub job_id: Uuid,
    pub student_id: Uuid,
    pub resume_url: &'a str,
    pub cover_letter: Option<&'a str>,
}

pub async fn has_applied(pool: &PgPool, job_id: Uuid, student_id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM applications WHERE job_id = $1 AND student_id = $2)",
    )
    .bind(job_id)
    .bind(student_id)
    .fetch_one(pool)
    .await
}

pub async fn insert_application(
    pool: &PgPool,
    new: NewApplication<'_>,
) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO applications (job_id, student_id, resume_url, cover_letter)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(new.job_id)
    .bind(new.student_id)
    .bind(new.resume_url)
    .bind(new.cover_letter)
    .fetch_one(pool)
    .await
}

pub async fn list_for_job(pool: &PgPool, job_id: Uuid) -> Result<Vec<JobApplicant>, sqlx::Error> {
    sqlx::query_as::<_, JobApplicant>(
        r#"
        SELECT a.*, u.name AS student_name, u.email AS student_email
        FROM applications a
        JOIN users u ON a.student_id = u.id
        WHERE a.job_id = $1
        ORDER BY a.created_at DESC
        "#,
    )
    .bind(job_id)
    .fetch_all(pool)
    .await
}

pub async fn list_for_student(
    pool: &PgPool,
    student_id: Uuid,
) -> Result<Vec<StudentApplication>, sqlx::Error> {
    sqlx::query_as::<_, StudentApplication>(
        r#"
        SELECT a.*, j.title AS job_title, j.company, j.location, u.name AS alumni_name
        FROM applications a
        JOIN jobs j ON a.job_id = j.id
        JOIN users u ON j.alumni_id = u.id
        WHERE a.student_id = $1
        ORDER BY a.created_at DESC
        "#,
    )
    .bind(student_id)
    .fetch_all(pool)
    .await
}

/// Finds an application only if it belongs to a job owned by `alumni_id`.
pub async fn find_review_target(
    pool: &PgPool,
    application_id: Uuid,
    alumni_id: Uuid,
) -> Result<Option<ReviewTarget>, sqlx::Error> {
    sqlx::query_as::<_, ReviewTarget>(
        r#"
        SELECT a.student_id, j.title AS job_title
        FROM applications a
        JOIN jobs j ON a.job_id = j.id
        WHERE a.id = $1 AND j.alumni_id = $2
        "#,
    )
    .bind(application_id)
    .bind(alumni_id)
    .fetch_optional(pool)
    .await
}

pub async fn update_status(
    pool: &PgPool,
    application_id: Uuid,
    status: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE applications SET status = $1 WHERE id = $2")
        .bind(status)
        .bind(application_id)
        .execute(pool)
        .await?;
    Ok(())
}
