pub mod category;
pub mod field;
pub mod profile;

pub use category::{FieldCategory, KEYWORD_TABLE};
pub use field::{ClassifiedField, DetectedField, DomEvent, EventKind, FieldDescriptor, FieldKind};
pub use profile::{Profile, ProfileError, QuickInfo};
