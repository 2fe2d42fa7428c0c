//! Notification inbox store.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use aidlink_core::AppResult;
use aidlink_core::events::{EventEnvelope, EventKind};
use aidlink_core::types::NotificationId;
use aidlink_entity::notification::Notification;

use crate::api::CoordinationApi;

/// Store for the current user's inbox.
///
/// Open to every role. Notifications are immutable once delivered, so
/// merging is existence-based: a pushed notification already held
/// locally is a duplicate and ignored. The unread count is always
/// recomputed from the list, never adjusted incrementally.
pub struct NotificationStore {
    /// REST gateway.
    gateway: Arc<dyn CoordinationApi>,
    /// Inbox snapshots, newest first.
    items: RwLock<Vec<Notification>>,
}

impl NotificationStore {
    /// Create a store.
    pub fn new(gateway: Arc<dyn CoordinationApi>) -> Self {
        Self {
            gateway,
            items: RwLock::new(Vec::new()),
        }
    }

    /// Replace the full inbox from the server.
    pub async fn fetch_notifications(&self) -> AppResult<Vec<Notification>> {
        let notifications = self.gateway.list_notifications().await?;
        *self.items.write().await = notifications.clone();
        Ok(notifications)
    }

    /// Fetch unread notifications and merge the new ones in.
    pub async fn fetch_unread(&self) -> AppResult<Vec<Notification>> {
        let unread = self.gateway.unread_notifications().await?;
        for notification in &unread {
            self.insert_if_absent(notification.clone()).await;
        }
        Ok(unread)
    }

    /// Mark one notification as read.
    pub async fn mark_read(&self, id: NotificationId) -> AppResult<Notification> {
        let updated = self.gateway.mark_notification_read(id).await?;
        let mut items = self.items.write().await;
        match items.iter_mut().find(|n| n.id == id) {
            Some(n) => *n = updated.clone(),
            None => items.insert(0, updated.clone()),
        }
        Ok(updated)
    }

    /// Mark the whole inbox as read. Returns how many the server
    /// affected.
    pub async fn mark_all_read(&self) -> AppResult<u64> {
        let affected = self.gateway.mark_all_notifications_read().await?;
        for n in self.items.write().await.iter_mut() {
            n.read = true;
        }
        info!(affected, "Marked inbox as read");
        Ok(affected)
    }

    /// Delete one notification.
    pub async fn delete_notification(&self, id: NotificationId) -> AppResult<()> {
        self.gateway.delete_notification(id).await?;
        self.items.write().await.retain(|n| n.id != id);
        Ok(())
    }

    /// Unread count, recomputed from the list.
    pub async fn unread_count(&self) -> usize {
        self.items
            .read()
            .await
            .iter()
            .filter(|n| n.is_unread())
            .count()
    }

    /// Snapshot of the inbox.
    pub async fn notifications(&self) -> Vec<Notification> {
        self.items.read().await.clone()
    }

    /// Prepend a notification unless its id is already held.
    pub(crate) async fn insert_if_absent(&self, incoming: Notification) -> bool {
        let mut items = self.items.write().await;
        if items.iter().any(|n| n.id == incoming.id) {
            false
        } else {
            items.insert(0, incoming);
            true
        }
    }

    /// Apply a notification-flavored envelope.
    ///
    /// `notification` carries one entity; `system_alert` may carry one
    /// or a batch; `emergency_dispatch` invalidates the inbox and
    /// triggers a refetch.
    pub(crate) async fn apply_event(&self, envelope: &EventEnvelope) {
        match envelope.event {
            EventKind::Notification => match envelope.decode::<Notification>() {
                Ok(notification) => {
                    self.insert_if_absent(notification).await;
                }
                Err(e) => {
                    warn!(error = %e, "Dropping malformed notification envelope");
                }
            },
            EventKind::SystemAlert => {
                let batch: Vec<Notification> = if envelope.payload.is_array() {
                    match envelope.decode() {
                        Ok(batch) => batch,
                        Err(e) => {
                            warn!(error = %e, "Dropping malformed system alert batch");
                            return;
                        }
                    }
                } else {
                    match envelope.decode::<Notification>() {
                        Ok(single) => vec![single],
                        Err(e) => {
                            warn!(error = %e, "Dropping malformed system alert");
                            return;
                        }
                    }
                };
                for notification in batch {
                    self.insert_if_absent(notification).await;
                }
            }
            EventKind::EmergencyDispatch => {
                info!("Emergency dispatch received, refreshing inbox");
                if let Err(e) = self.fetch_notifications().await {
                    warn!(error = %e, "Inbox refresh after emergency dispatch failed");
                }
            }
            _ => {}
        }
    }
}
