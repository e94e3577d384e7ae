//! Business logic services

pub mod appointments;
pub mod audit;
pub mod availability;
pub mod barbers;
pub mod bookings;
pub mod dashboard;
pub mod identity;
pub mod notifications;
pub mod offerings;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use crate::{
    booking::{ShopClock, SlotCatalog},
    config::AppConfig,
    error::AppResult,
    repository::{
        appointments::AppointmentStore, audit_logs::AuditStore, barbers::BarberStore,
        notifications::NotificationStore, offerings::OfferingStore, users::UserDirectory,
        Repository,
    },
};

/// Store handles the services are built on
#[derive(Clone)]
pub struct Stores {
    pub appointments: Arc<dyn AppointmentStore>,
    pub barbers: Arc<dyn BarberStore>,
    pub offerings: Arc<dyn OfferingStore>,
    pub notifications: Arc<dyn NotificationStore>,
    pub audit_logs: Arc<dyn AuditStore>,
    pub users: Arc<dyn UserDirectory>,
}

impl From<&Repository> for Stores {
    fn from(repository: &Repository) -> Self {
        Self {
            appointments: Arc::new(repository.appointments.clone()),
            barbers: Arc::new(repository.barbers.clone()),
            offerings: Arc::new(repository.offerings.clone()),
            notifications: Arc::new(repository.notifications.clone()),
            audit_logs: Arc::new(repository.audit_logs.clone()),
            users: Arc::new(repository.users.clone()),
        }
    }
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub identity: Arc<dyn identity::IdentityProvider>,
    pub availability: availability::AvailabilityService,
    pub bookings: bookings::BookingService,
    pub appointments: appointments::AppointmentsService,
    pub dashboard: dashboard::DashboardService,
    pub barbers: barbers::BarbersService,
    pub offerings: offerings::OfferingsService,
    pub notifications: notifications::NotificationsService,
    pub audit: audit::AuditTrail,
    pub users: users::UsersService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> AppResult<Self> {
        let catalog = Arc::new(SlotCatalog::from_labels(&config.booking.slots)?);
        let clock = ShopClock::new(config.booking.utc_offset_minutes)?;
        let stores = Stores::from(&repository);

        let identity: Arc<dyn identity::IdentityProvider> = Arc::new(
            identity::JwtIdentityProvider::new(&config.auth, stores.users.clone()),
        );
        let audit = audit::AuditTrail::new(stores.audit_logs.clone());

        Ok(Self {
            availability: availability::AvailabilityService::new(
                stores.appointments.clone(),
                catalog.clone(),
                clock,
            ),
            bookings: bookings::BookingService::new(
                stores.appointments.clone(),
                stores.barbers.clone(),
                stores.offerings.clone(),
                stores.notifications.clone(),
                catalog.clone(),
                audit.clone(),
            ),
            appointments: appointments::AppointmentsService::new(
                stores.appointments.clone(),
                stores.barbers.clone(),
                catalog,
                audit.clone(),
            ),
            dashboard: dashboard::DashboardService::new(stores.appointments, stores.offerings.clone()),
            barbers: barbers::BarbersService::new(stores.barbers, audit.clone()),
            offerings: offerings::OfferingsService::new(stores.offerings, audit.clone()),
            notifications: notifications::NotificationsService::new(stores.notifications),
            users: users::UsersService::new(identity.clone(), audit.clone()),
            identity,
            audit,
            repository,
        })
    }

    /// Whether the database answers
    pub async fn ready(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
