//! Client notifications

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Identity, Notification},
    repository::notifications::NotificationStore,
};

#[derive(Clone)]
pub struct NotificationsService {
    store: Arc<dyn NotificationStore>,
}

impl NotificationsService {
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    /// The caller's notifications, newest first
    pub async fn list_for(&self, caller: &Identity) -> AppResult<Vec<Notification>> {
        self.store.list_for_user(&caller.email).await
    }

    /// Only the recipient may mark a notification as read
    pub async fn mark_read(&self, caller: &Identity, id: Uuid) -> AppResult<Notification> {
        let notification = self.store.get(id).await?;
        if !caller.email.eq_ignore_ascii_case(notification.user_id.trim()) {
            return Err(AppError::Authorization(
                "Only the recipient can mark this notification".to_string(),
            ));
        }
        self.store.mark_read(id).await
    }
}
