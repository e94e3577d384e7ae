//! User directory: local mirror of provider accounts and their role claim

use async_trait::async_trait;
use chrono::Utc;
use mockall::automock;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::user::{DirectoryUser, DirectoryUserRow, Role},
};

#[automock]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Record a seen account (keeps any existing role) and return it
    async fn touch(&self, uid: &str, email: &str) -> AppResult<DirectoryUser>;

    async fn set_role(&self, uid: &str, role: Role) -> AppResult<DirectoryUser>;

    async fn list(&self) -> AppResult<Vec<DirectoryUser>>;
}

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn into_user(row: DirectoryUserRow) -> AppResult<DirectoryUser> {
    DirectoryUser::try_from(row).map_err(|e| AppError::Internal(e.to_string()))
}

#[async_trait]
impl UserDirectory for UsersRepository {
    async fn touch(&self, uid: &str, email: &str) -> AppResult<DirectoryUser> {
        let row = sqlx::query_as::<_, DirectoryUserRow>(
            r#"
            INSERT INTO users (uid, email, role, updated_at)
            VALUES ($1, $2, NULL, $3)
            ON CONFLICT (uid) DO UPDATE SET email = EXCLUDED.email
            RETURNING *
            "#,
        )
        .bind(uid)
        .bind(email)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        into_user(row)
    }

    async fn set_role(&self, uid: &str, role: Role) -> AppResult<DirectoryUser> {
        let row = sqlx::query_as::<_, DirectoryUserRow>(
            "UPDATE users SET role = $2, updated_at = $3 WHERE uid = $1 RETURNING *",
        )
        .bind(uid)
        .bind(role.as_str())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", uid)))?;
        into_user(row)
    }

    async fn list(&self) -> AppResult<Vec<DirectoryUser>> {
        let rows = sqlx::query_as::<_, DirectoryUserRow>("SELECT * FROM users ORDER BY email")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(into_user).collect()
    }
}
