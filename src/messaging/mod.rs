pub mod runtime;
pub mod types;

pub use runtime::{BackgroundEvent, BackgroundPort, Envelope, TabPort, TransportError};
pub use types::{Request, Response, TabId, TabStatus};
