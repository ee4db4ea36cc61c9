pub mod config;
pub mod error;
pub mod event;

pub use config::{AdminConfig, AdminConfigPatch, AnalyticsConfig, Config, ConfigError};
pub use error::*;
pub use event::*;
