//! Cross-cutting infrastructure: configuration loading and logging setup.

pub mod config;
pub mod logging;
pub mod setup;

pub use config::{ConfigError, ConfigLoader};
pub use logging::init_logging;
pub use setup::AppServices;
