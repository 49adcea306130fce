use std::sync::Arc;

use thiserror::Error;

use crate::{
    db::profile::{ProfileStore, StoreError},
    domain::{DetectedField, QuickInfo},
    infrastructure::notifier::{show_notification, NoticeLevel},
    messaging::{Request, Response, TabPort, TransportError},
};

#[derive(Debug, Error)]
pub enum PopupError {
    #[error("Failed to fill form. Please try again.")]
    Rejected(String),
    #[error("Unable to fill form. Make sure the page is loaded.")]
    Transport(#[from] TransportError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Ready,
    Empty,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageScan {
    pub state: ScanState,
    pub status: String,
    pub fields: Vec<DetectedField>,
}

/// One line of the detected-field list: category label and the best
/// available name for the control.
pub fn describe_field(field: &DetectedField) -> String {
    let identifier = field
        .identifier
        .as_deref()
        .filter(|value| !value.is_empty())
        .or_else(|| field.placeholder.as_deref().filter(|value| !value.is_empty()))
        .unwrap_or("Unknown field");
    format!("{}: {}", field.category.label(), identifier)
}

/// Quick actions for the active tab.
pub struct PopupController {
    port: TabPort,
    store: Arc<dyn ProfileStore>,
}

impl PopupController {
    pub fn new(port: TabPort, store: Arc<dyn ProfileStore>) -> Self {
        Self { port, store }
    }

    pub async fn scan_current_page(&self) -> PageScan {
        match self.port.send_message(Request::ScanFields).await {
            Ok(Response::Scanned { success: true, fields }) => {
                let state = if fields.is_empty() {
                    ScanState::Empty
                } else {
                    ScanState::Ready
                };
                PageScan {
                    state,
                    status: format!("{} fields detected", fields.len()),
                    fields,
                }
            }
            Ok(_) => PageScan {
                state: ScanState::Empty,
                status: "No form fields found".to_string(),
                fields: Vec::new(),
            },
            Err(err) => {
                tracing::warn!(target: "popup", tab_id = %self.port.tab_id(), error = %err, "error scanning page");
                PageScan {
                    state: ScanState::Error,
                    status: "Unable to scan page".to_string(),
                    fields: Vec::new(),
                }
            }
        }
    }

    /// Asks the page to fill itself and reports the outcome to the user.
    pub async fn fill_form(&self) -> Result<usize, PopupError> {
        let result = match self.port.send_message(Request::FillForm).await {
            Ok(Response::Filled {
                success: true,
                count,
            }) => Ok(count),
            Ok(Response::Failed { error, .. }) => Err(PopupError::Rejected(error)),
            Ok(other) => Err(PopupError::Rejected(format!("unexpected response {other:?}"))),
            Err(err) => Err(PopupError::Transport(err)),
        };
        match &result {
            Ok(count) => show_notification(
                NoticeLevel::Success,
                &format!("Successfully filled {count} fields!"),
            ),
            Err(err) => {
                tracing::warn!(target: "popup", error = ?err, "error filling form");
                show_notification(NoticeLevel::Error, &err.to_string());
            }
        }
        result
    }

    pub async fn load_quick_info(&self) -> Result<QuickInfo, StoreError> {
        Ok(self.store.get().await?.quick_info())
    }

    /// Merges name, email and phone into the stored profile.
    pub async fn save_quick_info(&self, info: &QuickInfo) -> Result<(), StoreError> {
        let mut profile = self.store.get().await?;
        profile.apply_quick_info(info);
        self.store.set(&profile).await?;
        show_notification(NoticeLevel::Success, "Quick info saved!");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{init_pool, profile::SqliteProfileStore},
        domain::{FieldCategory, Profile},
        messaging::TabId,
    };

    async fn store() -> (tempfile::TempDir, Arc<dyn ProfileStore>) {
        let dir = tempfile::tempdir().unwrap();
        let pool = init_pool(&dir.path().join("profile.db")).await.unwrap();
        (dir, Arc::new(SqliteProfileStore::new(pool)))
    }

    fn answering(response: Response) -> TabPort {
        let (port, mut receiver) = TabPort::channel(TabId(1), 4);
        tokio::spawn(async move {
            while let Some(envelope) = receiver.recv().await {
                envelope.respond(response.clone());
            }
        });
        port
    }

    #[test]
    fn describe_field_falls_back_to_placeholder() {
        let mut field = DetectedField {
            category: FieldCategory::ZipCode,
            identifier: Some("zip".into()),
            placeholder: Some("12345".into()),
        };
        assert_eq!(describe_field(&field), "Zip Code: zip");
        field.identifier = None;
        assert_eq!(describe_field(&field), "Zip Code: 12345");
        field.placeholder = None;
        assert_eq!(describe_field(&field), "Zip Code: Unknown field");
    }

    #[tokio::test]
    async fn scan_status_reflects_response() {
        let (_dir, store) = store().await;
        let fields = vec![DetectedField {
            category: FieldCategory::Email,
            identifier: Some("email".into()),
            placeholder: None,
        }];
        let popup = PopupController::new(answering(Response::scanned(fields.clone())), store.clone());
        let scan = popup.scan_current_page().await;
        assert_eq!(scan.state, ScanState::Ready);
        assert_eq!(scan.status, "1 fields detected");
        assert_eq!(scan.fields, fields);

        let (port, receiver) = TabPort::channel(TabId(2), 1);
        drop(receiver);
        let popup = PopupController::new(port, store);
        let scan = popup.scan_current_page().await;
        assert_eq!(scan.state, ScanState::Error);
        assert_eq!(scan.status, "Unable to scan page");
    }

    #[tokio::test]
    async fn fill_surfaces_page_failures() {
        let (_dir, store) = store().await;
        let popup = PopupController::new(answering(Response::filled(3)), store.clone());
        assert_eq!(popup.fill_form().await.unwrap(), 3);

        let popup = PopupController::new(answering(Response::failed("storage offline")), store);
        let err = popup.fill_form().await.unwrap_err();
        assert!(matches!(err, PopupError::Rejected(ref reason) if reason == "storage offline"));
        assert_eq!(err.to_string(), "Failed to fill form. Please try again.");
    }

    #[tokio::test]
    async fn quick_info_merges_into_profile() {
        let (_dir, store) = store().await;
        let mut profile = Profile::default();
        profile.set(FieldCategory::University, "State U");
        store.set(&profile).await.unwrap();

        let (port, _receiver) = TabPort::channel(TabId(1), 1);
        let popup = PopupController::new(port, store.clone());
        popup
            .save_quick_info(&QuickInfo {
                full_name: "Jane Doe".into(),
                email: "jane@x.com".into(),
                phone: "555-0100".into(),
            })
            .await
            .unwrap();

        let saved = store.get().await.unwrap();
        assert_eq!(saved.get(FieldCategory::University), "State U");
        assert_eq!(saved.get(FieldCategory::LastName), "Doe");
        assert_eq!(popup.load_quick_info().await.unwrap().email, "jane@x.com");
    }
}
