//! budget-domain
//!
//! Pure domain models (wallets, planned and realized transactions, billing windows).
//! No I/O, no storage. Only data types and the fixed calendar lookups they rely on.

pub mod common;
pub mod transaction;
pub mod wallet;

pub use common::*;
pub use transaction::*;
pub use wallet::*;
