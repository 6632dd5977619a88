//! cashflow-config
//!
//! Persistent user preferences: accounting cycle, reconciliation policy and
//! the active profile. Owns the Config data structure plus disk persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::Config;
