use std::{collections::HashMap, sync::Arc};

use anyhow::Result;
use parking_lot::Mutex;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    config::BadgeConfig,
    db::profile::{ProfileStore, StoreError},
    domain::Profile,
    infrastructure::shutdown::ShutdownListener,
    messaging::{BackgroundEvent, Request, TabId, TabStatus},
};

/// Toolbar badge shown for a tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub text: String,
    pub color: Option<String>,
}

/// Relay that turns page notifications into per-tab badge state.
pub struct BackgroundService {
    store: Arc<dyn ProfileStore>,
    config: BadgeConfig,
    badges: Mutex<HashMap<TabId, Badge>>,
}

impl BackgroundService {
    pub fn new(store: Arc<dyn ProfileStore>, config: BadgeConfig) -> Self {
        Self {
            store,
            config,
            badges: Mutex::new(HashMap::new()),
        }
    }

    /// Seeds storage with an empty profile on first run. Returns whether
    /// this was a first run.
    pub async fn on_installed(&self) -> Result<bool, StoreError> {
        if self.store.last_saved().await?.is_some() {
            return Ok(false);
        }
        self.store.set(&Profile::default()).await?;
        tracing::info!(target: "background", "profile storage initialized");
        Ok(true)
    }

    pub fn on_message(&self, tab_id: TabId, request: &Request) {
        let Request::FieldsDetected { count, url } = request else {
            return;
        };
        if *count == 0 {
            return;
        }
        self.badges.lock().insert(
            tab_id,
            Badge {
                text: count.to_string(),
                color: Some(self.config.color.clone()),
            },
        );
        tracing::info!(target: "background", %tab_id, count, url = %url, "fields detected");
    }

    pub fn on_tab_updated(&self, tab_id: TabId, status: TabStatus) {
        if status != TabStatus::Loading {
            return;
        }
        let mut badges = self.badges.lock();
        if let Some(badge) = badges.get_mut(&tab_id) {
            badge.text.clear();
            tracing::debug!(target: "background", %tab_id, "badge cleared on navigation");
        }
    }

    pub fn badge(&self, tab_id: TabId) -> Option<Badge> {
        self.badges.lock().get(&tab_id).cloned()
    }

    pub fn spawn(
        self: Arc<Self>,
        receiver: mpsc::UnboundedReceiver<BackgroundEvent>,
        mut shutdown: ShutdownListener,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            if let Err(err) = self.run_loop(receiver, &mut shutdown).await {
                tracing::error!(target: "background", error = %err, "background relay crashed");
            }
        })
    }

    async fn run_loop(
        &self,
        mut receiver: mpsc::UnboundedReceiver<BackgroundEvent>,
        shutdown: &mut ShutdownListener,
    ) -> Result<()> {
        loop {
            tokio::select! {
                _ = shutdown.notified() => break,
                event = receiver.recv() => match event {
                    Some(BackgroundEvent::Message { tab_id, request }) => {
                        self.on_message(tab_id, &request);
                    }
                    Some(BackgroundEvent::TabUpdated { tab_id, status }) => {
                        self.on_tab_updated(tab_id, status);
                    }
                    None => break,
                },
            }
        }
        tracing::debug!(target: "background", "background relay stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{init_pool, profile::SqliteProfileStore},
        domain::FieldCategory,
        infrastructure::shutdown::{CloseReason, Shutdown},
        messaging::BackgroundPort,
    };

    async fn service() -> (tempfile::TempDir, Arc<BackgroundService>) {
        let dir = tempfile::tempdir().unwrap();
        let pool = init_pool(&dir.path().join("profile.db")).await.unwrap();
        let store: Arc<dyn ProfileStore> = Arc::new(SqliteProfileStore::new(pool));
        let config = BadgeConfig {
            color: "#4CAF50".into(),
        };
        (dir, Arc::new(BackgroundService::new(store, config)))
    }

    fn detected(count: usize) -> Request {
        Request::FieldsDetected {
            count,
            url: "https://jobs.example/apply".into(),
        }
    }

    #[tokio::test]
    async fn first_install_seeds_storage_once() {
        let (_dir, service) = service().await;
        assert!(service.on_installed().await.unwrap());
        assert!(!service.on_installed().await.unwrap());

        let mut profile = Profile::default();
        profile.set(FieldCategory::Email, "jane@x.com");
        service.store.set(&profile).await.unwrap();
        assert!(!service.on_installed().await.unwrap());
        assert_eq!(service.store.get().await.unwrap(), profile);
    }

    #[tokio::test]
    async fn badge_tracks_detected_fields_per_tab() {
        let (_dir, service) = service().await;
        service.on_message(TabId(1), &detected(0));
        assert_eq!(service.badge(TabId(1)), None);

        service.on_message(TabId(1), &detected(4));
        service.on_message(TabId(2), &Request::ScanFields);
        assert_eq!(
            service.badge(TabId(1)),
            Some(Badge {
                text: "4".into(),
                color: Some("#4CAF50".into())
            })
        );
        assert_eq!(service.badge(TabId(2)), None);

        service.on_tab_updated(TabId(1), TabStatus::Complete);
        assert_eq!(service.badge(TabId(1)).unwrap().text, "4");
        service.on_tab_updated(TabId(1), TabStatus::Loading);
        assert_eq!(service.badge(TabId(1)).unwrap().text, "");
    }

    #[tokio::test]
    async fn relay_task_consumes_port_events() {
        let (_dir, service) = service().await;
        let (port, receiver) = BackgroundPort::channel();
        let shutdown = Shutdown::new();
        let handle = service.clone().spawn(receiver, shutdown.subscribe());

        port.send_message(TabId(3), detected(2));
        drop(port);
        handle.await.unwrap();
        assert_eq!(service.badge(TabId(3)).unwrap().text, "2");
        shutdown.trigger(CloseReason::Completed);
    }
}
