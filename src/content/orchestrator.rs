use std::sync::Arc;

use crate::{
    db::profile::{ProfileStore, StoreError},
    domain::DetectedField,
    infrastructure::notifier::{show_notification, NoticeLevel},
};

use super::{
    filler::FieldFiller,
    page::{FieldHandle, FormDocument},
    scanner,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillOutcome {
    pub matched: usize,
    pub filled: usize,
}

impl FillOutcome {
    pub fn summary(&self) -> String {
        if self.filled > 0 {
            format!("Filled {} fields successfully!", self.filled)
        } else {
            "No matching fields found on this page.".to_string()
        }
    }
}

/// One fill pass over a document: load the profile, scan, fill, count.
pub struct FormFiller {
    store: Arc<dyn ProfileStore>,
    filler: FieldFiller,
    highlight_border: Option<String>,
}

impl FormFiller {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self {
            store,
            filler: FieldFiller::new(),
            highlight_border: None,
        }
    }

    pub fn with_highlight(mut self, border: impl Into<String>) -> Self {
        self.highlight_border = Some(border.into());
        self
    }

    /// Fills every classified field that has a stored value. The profile is
    /// read fresh on every call. Fields that fail to fill are skipped and
    /// already filled ones are kept.
    pub async fn fill_form<D>(&self, document: &mut D) -> Result<FillOutcome, StoreError>
    where
        D: FormDocument + Send,
    {
        let profile = self.store.get().await?;
        let classified = scanner::scan(&*document);
        let fields = document.fields_mut();

        let mut outcome = FillOutcome {
            matched: 0,
            filled: 0,
        };
        for target in &classified {
            let Some(value) = profile.value(target.category) else {
                continue;
            };
            outcome.matched += 1;
            let field = &mut fields[target.index];
            if self.filler.fill(field, value) {
                outcome.filled += 1;
                if let Some(border) = &self.highlight_border {
                    field.highlight(border);
                }
            } else {
                tracing::debug!(
                    target: "content",
                    field = %target.category,
                    identifier = target.identifier.as_deref().unwrap_or("-"),
                    "field left unfilled"
                );
            }
        }

        tracing::info!(
            target: "content",
            classified = classified.len(),
            matched = outcome.matched,
            filled = outcome.filled,
            "fill pass finished"
        );
        let level = if outcome.filled > 0 {
            NoticeLevel::Success
        } else {
            NoticeLevel::Info
        };
        show_notification(level, &outcome.summary());
        Ok(outcome)
    }

    /// Preview of what a fill pass would target; never mutates the page.
    pub fn scan_fields<D: FormDocument>(&self, document: &D) -> Vec<DetectedField> {
        scanner::scan(document)
            .iter()
            .map(DetectedField::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        content::html::HtmlPage,
        db::{self, profile::SqliteProfileStore},
        domain::{FieldCategory, Profile},
    };

    const PAGE: &str = r#"<form><input name="first-name"><input id="email-address"></form>"#;

    async fn store_with(profile: Profile) -> (tempfile::TempDir, Arc<dyn ProfileStore>) {
        let dir = tempfile::tempdir().unwrap();
        let pool = db::init_pool(&dir.path().join("profile.db")).await.unwrap();
        let store = SqliteProfileStore::new(pool);
        store.set(&profile).await.unwrap();
        (dir, Arc::new(store))
    }

    #[tokio::test]
    async fn fills_matching_fields_from_profile() {
        let mut profile = Profile::default();
        profile.set(FieldCategory::FirstName, "Jane");
        profile.set(FieldCategory::Email, "jane@x.com");
        let (_dir, store) = store_with(profile).await;

        let mut page = HtmlPage::parse(PAGE);
        let outcome = FormFiller::new(store).fill_form(&mut page).await.unwrap();
        assert_eq!(outcome.filled, 2);
        assert_eq!(page.fields()[0].value(), "Jane");
        assert_eq!(page.fields()[1].value(), "jane@x.com");
        assert_eq!(outcome.summary(), "Filled 2 fields successfully!");
    }

    #[tokio::test]
    async fn empty_profile_mutates_nothing() {
        let (_dir, store) = store_with(Profile::default()).await;

        let mut page = HtmlPage::parse(PAGE);
        let outcome = FormFiller::new(store).fill_form(&mut page).await.unwrap();
        assert_eq!(outcome.filled, 0);
        assert!(page
            .fields()
            .iter()
            .all(|f| f.value().is_empty() && f.events().is_empty()));
        assert_eq!(outcome.summary(), "No matching fields found on this page.");
    }

    #[tokio::test]
    async fn never_overwrites_user_input() {
        let mut profile = Profile::default();
        profile.set(FieldCategory::Email, "jane@x.com");
        let (_dir, store) = store_with(profile).await;

        let mut page = HtmlPage::parse(r#"<input name="email" value="existing@x.com">"#);
        let outcome = FormFiller::new(store).fill_form(&mut page).await.unwrap();
        assert_eq!(outcome.filled, 0);
        assert_eq!(page.fields()[0].value(), "existing@x.com");
    }

    #[tokio::test]
    async fn fills_every_field_sharing_a_category_and_highlights() {
        let mut profile = Profile::default();
        profile.set(FieldCategory::Phone, "555-0100");
        profile.set(FieldCategory::State, "Oregon");
        let (_dir, store) = store_with(profile).await;

        let mut page = HtmlPage::parse(
            r#"<input name="phone"><input name="mobile-phone">
               <select name="state"><option value="">--</option><option>CA</option></select>"#,
        );
        let filler = FormFiller::new(store).with_highlight("2px solid #4CAF50");
        let outcome = filler.fill_form(&mut page).await.unwrap();
        assert_eq!(outcome.matched, 3);
        assert_eq!(outcome.filled, 2);
        assert!(page.fields()[1]
            .style()
            .is_some_and(|style| style.contains("#4CAF50")));
        assert_eq!(page.fields()[2].style(), None);
    }

    #[tokio::test]
    async fn field_fault_does_not_stop_the_pass() {
        let mut profile = Profile::default();
        profile.set(FieldCategory::State, "Oregon");
        profile.set(FieldCategory::City, "Portland");
        let (_dir, store) = store_with(profile).await;

        let mut page = HtmlPage::parse(
            r#"<select name="state"><option value="">--</option><option>CA</option></select>
               <input name="city">"#,
        );
        let outcome = FormFiller::new(store).fill_form(&mut page).await.unwrap();
        assert_eq!(outcome.matched, 2);
        assert_eq!(outcome.filled, 1);
        assert_eq!(page.fields()[0].value(), "");
        assert_eq!(page.fields()[1].value(), "Portland");
    }

    #[tokio::test]
    async fn scan_fields_lists_without_mutation() {
        let (_dir, store) = store_with(Profile::default()).await;
        let page = HtmlPage::parse(r#"<input name="first-name" placeholder="Jane"><input name="why-apply">"#);
        let detected = FormFiller::new(store).scan_fields(&page);
        assert_eq!(
            detected,
            vec![DetectedField {
                category: FieldCategory::FirstName,
                identifier: Some("first-name".into()),
                placeholder: Some("Jane".into()),
            }]
        );
    }
}
