use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::job::{JobDetail, JobListing, JobRow};

/// Validated, owner-agnostic job fields shared by create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct JobFields {
    pub title: String,
    pub description: String,
    pub company: String,
    pub location: String,
    pub stipend: Option<String>,
    pub apply_by: NaiveDate,
}

pub async fn list_jobs(pool: &PgPool) -> Result<Vec<JobListing>, sqlx::Error> {
    sqlx::query_as::<_, JobListing>(
        r#"
        SELECT j.*, u.name AS alumni_name, u.email AS alumni_email,
               COUNT(a.id) AS applications_count
        FROM jobs j
        JOIN users u ON j.alumni_id = u.id
        LEFT JOIN applications a ON a.job_id = j.id
        GROUP BY j.id, u.id
        ORDER BY j.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_job_detail(pool: &PgPool, job_id: Uuid) -> Result<Option<JobDetail>, sqlx::Error> {
    sqlx::query_as::<_, JobDetail>(
        r#"
        SELECT j.*, u.name AS alumni_name, u.email AS alumni_email
        FROM jobs j
        JOIN users u ON j.alumni_id = u.id
        WHERE j.id = $1
        "#,
    )
    .bind(job_id)
    .fetch_optional(pool)
    .await
}

pub async fn get_job(pool: &PgPool, job_id: Uuid) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await
}

/// Fetches a job only if `alumni_id` owns it.
pub async fn get_owned_job(
    pool: &PgPool,
    job_id: Uuid,
    alumni_id: Uuid,
) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1 AND alumni_id = $2")
        .bind(job_id)
        .bind(alumni_id)
        .fetch_optional(pool)
        .await
}

pub async fn insert_job(
    pool: &PgPool,
    alumni_id: Uuid,
    fields: &JobFields,
) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO jobs (title, description, company, location, stipend, apply_by, alumni_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(&fields.title)
    .bind(&fields.description)
    .bind(&fields.company)
    .bind(&fields.location)
    .bind(&fields.stipend)
    .bind(fields.apply_by)
    .bind(alumni_id)
    .fetch_one(pool)
    .await
}

pub async fn update_job(pool: &PgPool, job_id: Uuid, fields: &JobFields) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE jobs
        SET title = $1, description = $2, company = $3, location = $4, stipend = $5, apply_by = $6
        WHERE id = $7
        "#,
    )
    .bind(&fields.title)
    .bind(&fields.description)
    .bind(&fields.company)
    .bind(&fields.location)
    .bind(&fields.stipend)
    .bind(fields.apply_by)
    .bind(job_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete_job(pool: &PgPool, job_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(job_id)
        .execute(pool)
        .await?;
    Ok(())
}
