use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::category::FieldCategory;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile data is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("profile data must be a JSON object")]
    NotAnObject,
}

/// User data keyed by field category. Every category is always present;
/// unset values are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Profile {
    values: BTreeMap<FieldCategory, String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            values: FieldCategory::ALL
                .into_iter()
                .map(|category| (category, String::new()))
                .collect(),
        }
    }
}

impl Profile {
    pub fn get(&self, category: FieldCategory) -> &str {
        self.values.get(&category).map(String::as_str).unwrap_or("")
    }

    /// Value usable for filling, `None` when unset.
    pub fn value(&self, category: FieldCategory) -> Option<&str> {
        let value = self.get(category);
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    /// Stores a trimmed copy of `value`.
    pub fn set(&mut self, category: FieldCategory, value: &str) {
        self.values.insert(category, value.trim().to_string());
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldCategory, &str)> {
        self.values.iter().map(|(category, value)| (*category, value.as_str()))
    }

    pub fn is_blank(&self) -> bool {
        self.values.values().all(|value| value.is_empty())
    }

    /// Sets fullName from first and last name when either is present.
    pub fn sync_full_name(&mut self) {
        let first = self.get(FieldCategory::FirstName).to_string();
        let last = self.get(FieldCategory::LastName).to_string();
        if first.is_empty() && last.is_empty() {
            return;
        }
        self.set(FieldCategory::FullName, &format!("{first} {last}"));
    }

    /// Merges the quick-info triple, deriving first and last name from the
    /// full name the way a single "name" box is usually split.
    pub fn apply_quick_info(&mut self, info: &QuickInfo) {
        let (first, last) = split_full_name(&info.full_name);
        self.set(FieldCategory::FullName, &info.full_name);
        self.set(FieldCategory::FirstName, first);
        self.set(FieldCategory::LastName, last);
        self.set(FieldCategory::Email, &info.email);
        self.set(FieldCategory::Phone, &info.phone);
    }

    pub fn quick_info(&self) -> QuickInfo {
        QuickInfo {
            full_name: self.get(FieldCategory::FullName).to_string(),
            email: self.get(FieldCategory::Email).to_string(),
            phone: self.get(FieldCategory::Phone).to_string(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, ProfileError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a stored or exported record. Unknown keys are ignored.
    pub fn from_json_str(text: &str) -> Result<Self, ProfileError> {
        Profile::default().with_imported(text)
    }

    /// Returns a copy of `self` with every recognized key of `text`
    /// overwritten. The payload is fully validated before anything is copied.
    pub fn with_imported(&self, text: &str) -> Result<Self, ProfileError> {
        let parsed: Value = serde_json::from_str(text)?;
        let object = parsed.as_object().ok_or(ProfileError::NotAnObject)?;

        let mut merged = self.clone();
        for category in FieldCategory::ALL {
            let Some(raw) = object.get(category.as_str()) else {
                continue;
            };
            match raw {
                Value::String(value) => merged.set(category, value),
                Value::Number(value) => merged.set(category, &value.to_string()),
                Value::Bool(value) => merged.set(category, &value.to_string()),
                Value::Null | Value::Array(_) | Value::Object(_) => {
                    tracing::debug!(target: "options", field = %category, "skipping non-scalar import value");
                }
            }
        }
        Ok(merged)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuickInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

fn split_full_name(full_name: &str) -> (&str, &str) {
    let parts: Vec<&str> = full_name.split_whitespace().collect();
    let first = parts.first().copied().unwrap_or("");
    let last = if parts.len() > 1 {
        parts[parts.len() - 1]
    } else {
        ""
    };
    (first, last)
}
