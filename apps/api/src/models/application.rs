use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub student_id: Uuid,
    pub resume_url: String,
    pub cover_letter: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// An application as seen by the alumni who owns the job.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JobApplicant {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub application: ApplicationRow,
    pub student_name: String,
    pub student_email: String,
}

/// An application as seen by the student who submitted it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StudentApplication {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub application: ApplicationRow,
    pub job_title: String,
    pub company: String,
    pub location: String,
    pub alumni_name: String,
}
