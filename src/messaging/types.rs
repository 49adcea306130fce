use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::DetectedField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TabId(pub u32);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab-{}", self.0)
    }
}

/// Messages exchanged between the control surfaces, the page script and the
/// background relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    FillForm,
    ScanFields,
    FieldsDetected { count: usize, url: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Filled {
        success: bool,
        count: usize,
    },
    Scanned {
        success: bool,
        fields: Vec<DetectedField>,
    },
    Failed {
        success: bool,
        error: String,
    },
}

impl Response {
    pub fn filled(count: usize) -> Self {
        Response::Filled {
            success: true,
            count,
        }
    }

    pub fn scanned(fields: Vec<DetectedField>) -> Self {
        Response::Scanned {
            success: true,
            fields,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Response::Failed {
            success: false,
            error: error.into(),
        }
    }
}

/// Load state reported for a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabStatus {
    Loading,
    Complete,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::FieldCategory;

    #[test]
    fn requests_use_action_tag() {
        assert_eq!(
            serde_json::to_value(Request::FillForm).unwrap(),
            json!({"action": "fillForm"})
        );
        let parsed: Request = serde_json::from_value(
            json!({"action": "fieldsDetected", "count": 3, "url": "https://jobs.example/apply"}),
        )
        .unwrap();
        assert_eq!(
            parsed,
            Request::FieldsDetected {
                count: 3,
                url: "https://jobs.example/apply".into()
            }
        );
    }

    #[test]
    fn responses_match_wire_shapes() {
        assert_eq!(
            serde_json::to_value(Response::filled(2)).unwrap(),
            json!({"success": true, "count": 2})
        );
        let scanned = Response::scanned(vec![DetectedField {
            category: FieldCategory::ZipCode,
            identifier: Some("zip".into()),
            placeholder: None,
        }]);
        assert_eq!(
            serde_json::to_value(scanned).unwrap(),
            json!({"success": true, "fields": [{"type": "zipCode", "identifier": "zip", "placeholder": null}]})
        );
        let parsed: Response =
            serde_json::from_value(json!({"success": false, "error": "store down"})).unwrap();
        assert_eq!(parsed, Response::failed("store down"));
    }
}
