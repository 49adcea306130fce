pub mod env;
mod loader;

pub use env::{AppConfig, BadgeConfig, DirectoryConfig};
pub use loader::load_config;
