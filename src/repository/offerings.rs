//! Service offerings repository

use async_trait::async_trait;
use chrono::Utc;
use mockall::automock;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::offering::{CreateServiceOffering, ServiceOffering, UpdateServiceOffering},
};

#[automock]
#[async_trait]
pub trait OfferingStore: Send + Sync {
    async fn list(&self) -> AppResult<Vec<ServiceOffering>>;

    async fn get(&self, id: Uuid) -> AppResult<ServiceOffering>;

    async fn create(&self, data: &CreateServiceOffering) -> AppResult<ServiceOffering>;

    async fn update(&self, id: Uuid, data: &UpdateServiceOffering) -> AppResult<ServiceOffering>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

#[derive(Clone)]
pub struct OfferingsRepository {
    pool: Pool<Postgres>,
}

impl OfferingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OfferingStore for OfferingsRepository {
    async fn list(&self) -> AppResult<Vec<ServiceOffering>> {
        let rows = sqlx::query_as::<_, ServiceOffering>(
            "SELECT * FROM services ORDER BY category, name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> AppResult<ServiceOffering> {
        sqlx::query_as::<_, ServiceOffering>("SELECT * FROM services WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Service {} not found", id)))
    }

    async fn create(&self, data: &CreateServiceOffering) -> AppResult<ServiceOffering> {
        let row = sqlx::query_as::<_, ServiceOffering>(
            r#"
            INSERT INTO services (id, name, description, price, duration, category, image_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.price)
        .bind(&data.duration)
        .bind(&data.category)
        .bind(&data.image_url)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, data: &UpdateServiceOffering) -> AppResult<ServiceOffering> {
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
        add_field!(data.description, "description");
        add_field!(data.price, "price");
        add_field!(data.duration, "duration");
        add_field!(data.category, "category");
        add_field!(data.image_url, "image_url");

        let query = format!("UPDATE services SET {} WHERE id = ${} RETURNING *", sets.join(", "), idx);

        let mut builder = sqlx::query_as::<_, ServiceOffering>(&query).bind(Utc::now());

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.name);
        bind_field!(data.description);
        bind_field!(data.price);
        bind_field!(data.duration);
        bind_field!(data.category);
        bind_field!(data.image_url);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Service {} not found", id)))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Service {} not found", id)));
        }
        Ok(())
    }
}
