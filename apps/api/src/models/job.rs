use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub company: String,
    pub location: String,
    pub stipend: Option<String>,
    pub alumni_id: Uuid,
    pub apply_by: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// A job joined with its poster's contact details.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JobDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub job: JobRow,
    pub alumni_name: String,
    pub alumni_email: String,
}

/// Row of the public job board listing.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JobListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub job: JobRow,
    pub alumni_name: String,
    pub alumni_email: String,
    pub applications_count: i64,
}
