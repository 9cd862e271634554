use sqlx::PgPool;
use uuid::Uuid;

use crate::models::notification::NotificationRow;

pub async fn insert_notification(
    pool: &PgPool,
    user_id: Uuid,
    message: &str,
) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar("INSERT INTO notifications (user_id, message) VALUES ($1, $2) RETURNING id")
        .bind(user_id)
        .bind(message)
        .fetch_one(pool)
        .await
}

/// Newest first. `limit = None` returns everything.
pub async fn list_for_user(
    pool: &PgPool,
    user_id: Uuid,
    limit: Option<i64>,
) -> Result<Vec<NotificationRow>, sqlx::Error> {
    sqlx::query_as::<_, NotificationRow>(
        r#"
        SELECT * FROM notifications
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn unread_count(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND read = FALSE")
        .bind(user_id)
        .fetch_one(pool)
        .await
}

/// Returns false when no notification `id` belongs to `user_id`.
/// Marking an already-read notification still counts as a match.
pub async fn mark_read(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn mark_all_read(pool: &PgPool, user_id: Uuid) -> Result<u64, sqlx::Error> {
    let result =
        sqlx::query("UPDATE notifications SET read = TRUE WHERE user_id = $1 AND read = FALSE")
            .bind(user_id)
            .execute(pool)
            .await?;
    Ok(result.rows_affected())
}

pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
