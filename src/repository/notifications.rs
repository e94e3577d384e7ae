//! Notifications repository

use async_trait::async_trait;
use chrono::Utc;
use mockall::automock;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::notification::{NewNotification, Notification},
};

#[automock]
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn create(&self, data: &NewNotification) -> AppResult<Notification>;

    /// Newest first
    async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<Notification>>;

    async fn get(&self, id: Uuid) -> AppResult<Notification>;

    async fn mark_read(&self, id: Uuid) -> AppResult<Notification>;
}

#[derive(Clone)]
pub struct NotificationsRepository {
    pool: Pool<Postgres>,
}

impl NotificationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for NotificationsRepository {
    async fn create(&self, data: &NewNotification) -> AppResult<Notification> {
        let row = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (id, user_id, title, message, is_read, created_at)
            VALUES ($1, $2, $3, $4, FALSE, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.user_id)
        .bind(&data.title)
        .bind(&data.message)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE LOWER(user_id) = LOWER($1) ORDER BY created_at DESC",
        )
        .bind(user_id.trim())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Notification {} not found", id)))
    }

    async fn mark_read(&self, id: Uuid) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Notification {} not found", id)))
    }
}
