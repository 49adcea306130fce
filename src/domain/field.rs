use std::fmt;

use serde::{Deserialize, Serialize};

use super::category::FieldCategory;

/// Coarse control type, derived from the element tag and `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    TextLike,
    Hidden,
    Submit,
    Button,
    Other,
}

impl FieldKind {
    /// Maps an `<input type=...>` value. Unknown types behave like text,
    /// matching how browsers treat them.
    pub fn from_input_type(input_type: &str) -> Self {
        match input_type.trim().to_ascii_lowercase().as_str() {
            "hidden" => FieldKind::Hidden,
            "submit" => FieldKind::Submit,
            "button" => FieldKind::Button,
            "checkbox" | "radio" | "file" | "image" | "reset" | "range" | "color" => {
                FieldKind::Other
            }
            _ => FieldKind::TextLike,
        }
    }

    pub fn is_control_button(&self) -> bool {
        matches!(self, FieldKind::Hidden | FieldKind::Submit | FieldKind::Button)
    }
}

/// Snapshot of one page field taken at scan time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub kind: FieldKind,
    pub value: String,
    pub name: Option<String>,
    pub id: Option<String>,
    pub class: Option<String>,
    pub placeholder: Option<String>,
    pub test_id: Option<String>,
    pub aria_label: Option<String>,
}

impl FieldDescriptor {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            value: String::new(),
            name: None,
            id: None,
            class: None,
            placeholder: None,
            test_id: None,
            aria_label: None,
        }
    }

    /// Lowercased identifier attributes joined by single spaces. Missing
    /// attributes still take their slot as an empty string.
    pub fn search_text(&self) -> String {
        [
            &self.name,
            &self.id,
            &self.class,
            &self.placeholder,
            &self.test_id,
            &self.aria_label,
        ]
        .iter()
        .map(|attr| attr.as_deref().unwrap_or("").to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Short name shown to the user: name, then id, then class.
    pub fn identifier(&self) -> Option<String> {
        [&self.name, &self.id, &self.class]
            .into_iter()
            .flatten()
            .find(|value| !value.is_empty())
            .cloned()
    }
}

/// A field of the current document with the category it was mapped to.
/// `index` addresses the field within its document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedField {
    pub index: usize,
    pub category: FieldCategory,
    pub identifier: Option<String>,
    pub placeholder: Option<String>,
}

/// Wire form of a classified field, as listed by the popup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedField {
    #[serde(rename = "type")]
    pub category: FieldCategory,
    pub identifier: Option<String>,
    pub placeholder: Option<String>,
}

impl From<&ClassifiedField> for DetectedField {
    fn from(field: &ClassifiedField) -> Self {
        Self {
            category: field.category,
            identifier: field.identifier.clone(),
            placeholder: field.placeholder.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Input,
    Change,
    Focus,
    Blur,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Input => "input",
            EventKind::Change => "change",
            EventKind::Focus => "focus",
            EventKind::Blur => "blur",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomEvent {
    pub kind: EventKind,
    pub bubbles: bool,
}

impl DomEvent {
    pub fn bubbling(kind: EventKind) -> Self {
        Self {
            kind,
            bubbles: true,
        }
    }
}
