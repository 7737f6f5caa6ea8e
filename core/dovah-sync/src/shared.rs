//! Handles shared by every service of a [`Library`](crate::Library).

use crate::config::StaleResponsePolicy;
use crate::notifications::{NotificationQueue, Template};
use crate::state::ResourceState;
use dovah_client::{CredentialContext, LibraryApi};
use dovah_types::{Notification, NotificationId, NotificationLevel};
use std::sync::Arc;
use tokio::sync::RwLock;

pub(crate) struct Shared {
    pub api: Arc<dyn LibraryApi>,
    pub ctx: CredentialContext,
    pub state: Arc<RwLock<ResourceState>>,
    pub notifications: Arc<RwLock<NotificationQueue>>,
    pub policy: StaleResponsePolicy,
}

impl Shared {
    pub fn new(
        api: Arc<dyn LibraryApi>,
        policy: StaleResponsePolicy,
        notification_limit: Option<usize>,
    ) -> Self {
        let queue = match notification_limit {
            Some(limit) => NotificationQueue::with_limit(limit),
            None => NotificationQueue::new(),
        };
        Self {
            api,
            ctx: CredentialContext::new(),
            state: Arc::new(RwLock::new(ResourceState::new())),
            notifications: Arc::new(RwLock::new(queue)),
            policy,
        }
    }

    pub async fn epoch(&self) -> u64 {
        self.state.read().await.epoch()
    }

    pub async fn notify(&self, template: &Template) -> NotificationId {
        self.notifications.write().await.push_template(template)
    }

    pub async fn notify_text(
        &self,
        title: impl Into<String>,
        body: impl Into<String>,
        level: NotificationLevel,
    ) -> NotificationId {
        self.notifications
            .write()
            .await
            .push_notification(Notification::new(title, body).with_level(level))
    }

    /// Notifies only while the session that issued the request is current.
    pub async fn notify_in(&self, epoch: u64, template: &Template) {
        if self.epoch().await == epoch {
            self.notify(template).await;
        }
    }
}
