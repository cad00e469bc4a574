//! Wallet metadata and billing cycle boundaries.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::common::{WalletId, MIN_BILLING_DAY};

/// Persisted wallet settings, detached from any storage handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletInfo {
    pub id: WalletId,
    /// Day of month (1..=28) on which the wallet's billing cycle starts.
    #[serde(default = "WalletInfo::default_month_start")]
    pub month_start: u32,
}

impl WalletInfo {
    pub fn new(id: WalletId, month_start: u32) -> Self {
        Self { id, month_start }
    }

    pub fn default_month_start() -> u32 {
        MIN_BILLING_DAY
    }
}

/// Boundaries of one billing cycle, both at local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl BillingWindow {
    /// Whether `instant` lies in `[start, end)`.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant < self.end
    }
}
