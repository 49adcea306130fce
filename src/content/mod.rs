//! Page-side logic: field detection, classification and filling.

pub mod classifier;
pub mod filler;
pub mod html;
pub mod orchestrator;
pub mod page;
pub mod scanner;
pub mod script;

pub use html::HtmlPage;
pub use orchestrator::FormFiller;
pub use script::ContentScript;
