//! envelope-config
//!
//! Persistent user preferences: display locale, remote store endpoint and the
//! tunable parts of the allocation policy.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::{default_home_dir, ConfigManager, HOME_ENV_VAR, REMOTE_URL_ENV_VAR};
pub use model::{Config, PLACEHOLDER_MARKER};
