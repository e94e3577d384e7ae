//! Repository layer for database operations

pub mod appointments;
pub mod audit_logs;
pub mod barbers;
pub mod notifications;
pub mod offerings;
pub mod users;

use sqlx::{Pool, Postgres};

use crate::error::AppResult;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub appointments: appointments::AppointmentsRepository,
    pub barbers: barbers::BarbersRepository,
    pub offerings: offerings::OfferingsRepository,
    pub notifications: notifications::NotificationsRepository,
    pub audit_logs: audit_logs::AuditLogsRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            appointments: appointments::AppointmentsRepository::new(pool.clone()),
            barbers: barbers::BarbersRepository::new(pool.clone()),
            offerings: offerings::OfferingsRepository::new(pool.clone()),
            notifications: notifications::NotificationsRepository::new(pool.clone()),
            audit_logs: audit_logs::AuditLogsRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round-trip to the database, used by the readiness probe
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Postgres `unique_violation`
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == "23505")
}
