//! budget-core
//!
//! Reconciliation and prorated-balance engine for personal budget wallets.
//! Depends on budget-domain. Persistence is reached only through [`storage::WalletStorage`].

pub mod balance_service;
pub mod billing_window;
pub mod error;
pub mod matcher;
pub mod proration;
pub mod registry_service;
pub mod storage;
pub mod time;
pub mod wallet;

pub use balance_service::*;
pub use billing_window::*;
pub use error::{CoreError, InvariantViolation, StorageError};
pub use matcher::*;
pub use proration::*;
pub use registry_service::*;
pub use storage::{MemoryWalletStorage, WalletStorage};
pub use time::{Clock, FixedClock, SystemClock};
pub use wallet::Wallet;
