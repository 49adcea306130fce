use thiserror::Error;

use crate::domain::{DomEvent, FieldDescriptor};

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("no option with value {0:?}")]
    NoSuchOption(String),
    #[error("event dispatch failed: {0}")]
    Dispatch(String),
}

/// Mutable handle to one form control of a page.
pub trait FieldHandle {
    fn descriptor(&self) -> FieldDescriptor;

    fn set_value(&mut self, value: &str) -> Result<(), FieldError>;

    fn dispatch_event(&mut self, event: DomEvent) -> Result<(), FieldError>;

    /// Resets a framework value tracker if the control carries one.
    /// Returns whether a tracker was present.
    fn reset_value_tracker(&mut self) -> Result<bool, FieldError> {
        Ok(false)
    }

    fn focus(&mut self) -> Result<(), FieldError>;

    fn blur(&mut self) -> Result<(), FieldError>;

    /// Applies a temporary border; undone by [`FieldHandle::clear_highlight`].
    fn highlight(&mut self, _border: &str) {}

    fn clear_highlight(&mut self) {}
}

/// Ordered collection of the `input`, `textarea` and `select` controls of a
/// page, in document order.
pub trait FormDocument {
    type Field: FieldHandle;

    fn fields(&self) -> &[Self::Field];

    fn fields_mut(&mut self) -> &mut [Self::Field];

    fn url(&self) -> Option<&str> {
        None
    }
}
