//! viaconf-host library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.

pub mod application;
pub mod infrastructure;

pub use application::error::ConfigError;
pub use application::options::OptionSource;
pub use application::platform::{PlatformConfig, PlatformError, ProtocolHost, TemplateLocation};
pub use application::settings::Settings;
pub use infrastructure::storage::config_store::ConfigStore;
