use crate::domain::{DomEvent, EventKind};

use super::page::{FieldError, FieldHandle};

const FILL_EVENTS: [EventKind; 3] = [EventKind::Input, EventKind::Change, EventKind::Blur];

#[derive(Debug, Clone, Default)]
pub struct FieldFiller;

impl FieldFiller {
    pub fn new() -> Self {
        Self
    }

    /// Writes `value` into the field and replays the events a user edit
    /// would produce. Returns `false` for an empty value or when any step
    /// fails; failures are logged and never propagated.
    pub fn fill<F: FieldHandle + ?Sized>(&self, field: &mut F, value: &str) -> bool {
        if value.is_empty() {
            return false;
        }
        match self.apply(field, value) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(target: "content", error = %err, "error filling field");
                false
            }
        }
    }

    fn apply<F: FieldHandle + ?Sized>(&self, field: &mut F, value: &str) -> Result<(), FieldError> {
        field.set_value(value)?;
        for kind in FILL_EVENTS {
            field.dispatch_event(DomEvent::bubbling(kind))?;
        }
        if field.reset_value_tracker()? {
            tracing::trace!(target: "content", "value tracker reset");
        }
        field.focus()?;
        field.blur()?;
        Ok(())
    }
}
