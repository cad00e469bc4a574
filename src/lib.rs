#![doc(test(attr(deny(warnings))))]

//! Wallet Budget estimates how much money an owner can still spend before the
//! next billing cycle, reconciling planned recurring cash flow with what was
//! actually recorded.
//!
//! This crate wires the engine ([`budget_core`]) to its configuration and
//! JSON storage. Front ends obtain a [`Budget`] and work with [`Wallet`]s.

pub mod app;
pub mod errors;
pub mod utils;

pub use app::Budget;
pub use budget_config::{Config, ConfigManager};
pub use budget_core::{
    BalanceBreakdown, Clock, CoreError, FixedClock, InvariantViolation, StorageError,
    SystemClock, Wallet, WalletStorage,
};
pub use budget_domain::{
    ActualTransaction, BillingWindow, DayTable, OwnerId, RegularTransaction, WalletId, WalletInfo,
};
pub use errors::BudgetError;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing with the default filter and emits a startup info log.
pub fn init() {
    init_with_filter(&Config::default_log_filter());
}

/// Initializes global tracing with the filter stored in `config`.
pub fn init_from_config(config: &Config) {
    init_with_filter(&config.log_filter);
}

/// Initializes global tracing once; `RUST_LOG` takes precedence over `filter`.
pub fn init_with_filter(filter: &str) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(filter);
        tracing::info!("Wallet Budget tracing initialized.");
    });
}
