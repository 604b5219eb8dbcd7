//! Domain event fan-out.
//!
//! Handlers publish after their write committed. A single subscriber task
//! stores each event as a notification; delivery failures are logged and
//! never reach the request that caused them.

use std::sync::Arc;

use hrms_core::events::DomainEvent;
use hrms_db::NotificationRepository;
use sea_orm::DatabaseConnection;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, error, info, warn};

/// Sending half of the event channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: UnboundedSender<DomainEvent>,
}

impl EventBus {
    /// Creates a bus and the receiver a subscriber drains.
    #[must_use]
    pub fn channel() -> (Self, UnboundedReceiver<DomainEvent>) {
        let (sender, receiver) = unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Queues an event for delivery.
    pub fn publish(&self, event: DomainEvent) {
        debug!(
            action = event.action.as_str(),
            entity = %event.entity,
            entity_id = ?event.entity_id,
            "Publishing domain event"
        );
        if self.sender.send(event).is_err() {
            warn!("Notification subscriber is gone; event dropped");
        }
    }
}

/// Starts the notification subscriber and returns the bus feeding it.
#[must_use]
pub fn spawn_subscriber(db: Arc<DatabaseConnection>) -> EventBus {
    let (bus, receiver) = EventBus::channel();
    tokio::spawn(run_subscriber(NotificationRepository::new((*db).clone()), receiver));
    bus
}

async fn run_subscriber(repo: NotificationRepository, mut receiver: UnboundedReceiver<DomainEvent>) {
    while let Some(event) = receiver.recv().await {
        match repo.record(&event).await {
            Ok(notification) => info!(
                notification_id = notification.id,
                action = event.action.as_str(),
                entity = %event.entity,
                "Notification stored"
            ),
            Err(e) => error!(
                error = %e,
                action = event.action.as_str(),
                entity = %event.entity,
                "Failed to store notification"
            ),
        }
    }
    debug!("Notification subscriber stopped");
}
