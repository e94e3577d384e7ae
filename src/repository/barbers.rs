//! Barbers repository

use async_trait::async_trait;
use chrono::Utc;
use mockall::automock;
use sqlx::{types::Json, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::barber::{Barber, CreateBarber, UpdateBarber},
};

#[automock]
#[async_trait]
pub trait BarberStore: Send + Sync {
    /// All barbers ordered by name, then id
    async fn list(&self) -> AppResult<Vec<Barber>>;

    async fn get(&self, id: Uuid) -> AppResult<Barber>;

    async fn create(&self, data: &CreateBarber) -> AppResult<Barber>;

    async fn update(&self, id: Uuid, data: &UpdateBarber) -> AppResult<Barber>;

    async fn set_availability(&self, id: Uuid, is_available: bool) -> AppResult<Barber>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

#[derive(Clone)]
pub struct BarbersRepository {
    pool: Pool<Postgres>,
}

impl BarbersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BarberStore for BarbersRepository {
    async fn list(&self) -> AppResult<Vec<Barber>> {
        let rows = sqlx::query_as::<_, Barber>("SELECT * FROM barbers ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> AppResult<Barber> {
        sqlx::query_as::<_, Barber>("SELECT * FROM barbers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Barber {} not found", id)))
    }

    async fn create(&self, data: &CreateBarber) -> AppResult<Barber> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, Barber>(
            r#"
            INSERT INTO barbers (id, name, role, image_url, portfolio_images, socials, is_available, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.name)
        .bind(&data.role)
        .bind(&data.image_url)
        .bind(Json(&data.portfolio_images))
        .bind(Json(&data.socials))
        .bind(data.is_available)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, data: &UpdateBarber) -> AppResult<Barber> {
        let mut sets = vec!["updated_at = $1".to_string()];
        let mut idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.name, "name");
        add_field!(data.role, "role");
        add_field!(data.image_url, "image_url");
        add_field!(data.portfolio_images, "portfolio_images");
        add_field!(data.socials, "socials");

        let query = format!("UPDATE barbers SET {} WHERE id = ${} RETURNING *", sets.join(", "), idx);

        let mut builder = sqlx::query_as::<_, Barber>(&query).bind(Utc::now());
        if let Some(ref name) = data.name { builder = builder.bind(name); }
        if let Some(ref role) = data.role { builder = builder.bind(role); }
        if let Some(ref image_url) = data.image_url { builder = builder.bind(image_url); }
        if let Some(ref images) = data.portfolio_images { builder = builder.bind(Json(images)); }
        if let Some(ref socials) = data.socials { builder = builder.bind(Json(socials)); }

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Barber {} not found", id)))
    }

    async fn set_availability(&self, id: Uuid, is_available: bool) -> AppResult<Barber> {
        sqlx::query_as::<_, Barber>(
            "UPDATE barbers SET is_available = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(is_available)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Barber {} not found", id)))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM barbers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Barber {} not found", id)));
        }
        Ok(())
    }
}
