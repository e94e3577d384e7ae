//! Appointments repository

use async_trait::async_trait;
use chrono::Utc;
use mockall::automock;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::is_unique_violation;
use crate::{
    error::{AppError, AppResult},
    models::appointment::{Appointment, AppointmentFilter, AppointmentStatus, NewAppointment},
};

/// Appointment persistence operations
#[automock]
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Appointments matching every set filter, ordered by date then time
    async fn list(&self, filter: &AppointmentFilter) -> AppResult<Vec<Appointment>>;

    async fn get(&self, id: Uuid) -> AppResult<Appointment>;

    /// Insert unless another appointment already holds the same
    /// (date, barber, time) slot; `None` when the slot is taken.
    async fn insert_if_free(&self, data: &NewAppointment) -> AppResult<Option<Appointment>>;

    async fn update_status(&self, id: Uuid, status: AppointmentStatus) -> AppResult<Appointment>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

#[derive(Clone)]
pub struct AppointmentsRepository {
    pool: Pool<Postgres>,
}

impl AppointmentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentStore for AppointmentsRepository {
    async fn list(&self, filter: &AppointmentFilter) -> AppResult<Vec<Appointment>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if filter.date.is_some() {
            conditions.push(format!("date = ${}", idx));
            idx += 1;
        }
        if filter.barber_id.is_some() {
            conditions.push(format!("barber_id = ${}", idx));
            idx += 1;
        }
        if filter.status.is_some() {
            conditions.push(format!("status = ${}", idx));
            idx += 1;
        }
        if filter.client_email.is_some() {
            conditions.push(format!("LOWER(client_email) = LOWER(${})", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT * FROM appointments {} ORDER BY date, time_minutes, created_at",
            where_clause
        );

        let mut builder = sqlx::query_as::<_, Appointment>(&query);
        if let Some(date) = filter.date { builder = builder.bind(date); }
        if let Some(barber_id) = filter.barber_id { builder = builder.bind(barber_id); }
        if let Some(status) = filter.status { builder = builder.bind(status.as_str()); }
        if let Some(ref email) = filter.client_email { builder = builder.bind(email.trim()); }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> AppResult<Appointment> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))
    }

    async fn insert_if_free(&self, data: &NewAppointment) -> AppResult<Option<Appointment>> {
        let now = Utc::now();

        // The partial unique index appointments_active_slot_idx makes this a
        // single atomic check-and-insert.
        let row = sqlx::query_as::<_, Appointment>(
            r#"
            INSERT INTO appointments (
                id, date, time_minutes, barber_id, service_id, service_name,
                client_name, client_email, status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            ON CONFLICT (date, barber_id, time_minutes)
                WHERE status IN ('confirmed', 'blocked', 'completed')
            DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.date)
        .bind(i16::from(data.time))
        .bind(data.barber_id)
        .bind(&data.service_id)
        .bind(&data.service_name)
        .bind(&data.client_name)
        .bind(&data.client_email)
        .bind(data.status.as_str())
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_status(&self, id: Uuid, status: AppointmentStatus) -> AppResult<Appointment> {
        let result = sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET status = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(Some(row)) => Ok(row),
            Ok(None) => Err(AppError::NotFound(format!("Appointment {} not found", id))),
            Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(format!(
                "Another appointment already holds the slot of appointment {}",
                id
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Appointment {} not found", id)));
        }
        Ok(())
    }
}
