//! budget-config
//!
//! Persistent runtime configuration: where wallets live, how verbose logging is,
//! and the calendar lookups balances are computed with.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::Config;
