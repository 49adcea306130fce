//! Control surfaces: the per-tab popup and the full options editor.

pub mod options;
pub mod popup;

pub use options::OptionsController;
pub use popup::{describe_field, PopupController, ScanState};
