use std::{path::Path, sync::Arc};

use thiserror::Error;

use crate::{
    db::profile::{ProfileStore, StoreError},
    domain::{FieldCategory, Profile, ProfileError},
    infrastructure::notifier::{show_notification, NoticeLevel},
};

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Error importing data. Please check the file format. ({0})")]
    Import(#[from] ProfileError),
    #[error("file access failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Full profile editor.
pub struct OptionsController {
    store: Arc<dyn ProfileStore>,
}

impl OptionsController {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> Result<Profile, OptionsError> {
        Ok(self.store.get().await?)
    }

    pub async fn save(&self, profile: &Profile) -> Result<(), OptionsError> {
        self.store.set(profile).await?;
        tracing::info!(target: "options", "profile saved");
        Ok(())
    }

    /// Updates one field. Editing the first or last name also refreshes the
    /// full name.
    pub async fn set_field(
        &self,
        category: FieldCategory,
        value: &str,
    ) -> Result<Profile, OptionsError> {
        let mut profile = self.store.get().await?;
        profile.set(category, value);
        if matches!(category, FieldCategory::FirstName | FieldCategory::LastName) {
            profile.sync_full_name();
        }
        self.save(&profile).await?;
        Ok(profile)
    }

    /// Replaces recognized fields with the imported values. The payload is
    /// validated completely before storage is touched.
    pub async fn import_data(&self, text: &str) -> Result<Profile, OptionsError> {
        let current = self.store.get().await?;
        let imported = match current.with_imported(text) {
            Ok(imported) => imported,
            Err(err) => {
                tracing::warn!(target: "options", error = %err, "import rejected");
                return Err(err.into());
            }
        };
        self.save(&imported).await?;
        show_notification(NoticeLevel::Success, "Data imported successfully!");
        Ok(imported)
    }

    pub async fn import_file(&self, path: &Path) -> Result<Profile, OptionsError> {
        let text = tokio::fs::read_to_string(path).await?;
        self.import_data(&text).await
    }

    pub async fn export_json(&self) -> Result<String, OptionsError> {
        Ok(self.store.get().await?.to_json_pretty()?)
    }

    pub async fn export_file(&self, path: &Path) -> Result<(), OptionsError> {
        let json = self.export_json().await?;
        tokio::fs::write(path, json).await?;
        tracing::info!(target: "options", path = %path.display(), "profile exported");
        show_notification(NoticeLevel::Success, "Data exported successfully!");
        Ok(())
    }

    pub async fn clear_all_data(&self) -> Result<(), OptionsError> {
        self.store.clear().await?;
        show_notification(NoticeLevel::Success, "All data cleared successfully!");
        Ok(())
    }
}
