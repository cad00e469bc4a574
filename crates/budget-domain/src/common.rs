//! Identifiers and calendar lookups shared by wallet entities.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// First day of month a wallet cycle or a planned transaction may be anchored to.
pub const MIN_BILLING_DAY: u32 = 1;
/// Last day of month a wallet cycle or a planned transaction may be anchored to.
/// Every month has at least this many days, so the anchor always exists.
pub const MAX_BILLING_DAY: u32 = 28;

/// Returns whether `day` can anchor a billing cycle or a recurring transaction.
pub fn is_billing_day(day: u32) -> bool {
    (MIN_BILLING_DAY..=MAX_BILLING_DAY).contains(&day)
}

/// Opaque wallet identity as handed out by the storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletId(String);

impl WalletId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random identity for a newly provisioned wallet.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WalletId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Identity of the account owner a wallet belongs to (e.g. a chat user id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub i64);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed number of days per calendar month, indexed January through December.
///
/// The default table deliberately treats February as 28 days in every year;
/// balances computed by the engine depend on that, so leap years are not
/// special-cased here. Swapping the table is the single place to change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct DayTable([u32; 12]);

impl DayTable {
    pub const FIXED: DayTable = DayTable([31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]);

    /// Builds a table, rejecting entries outside 28..=31.
    pub fn new(days: [u32; 12]) -> Result<Self, String> {
        if let Some((idx, bad)) = days
            .iter()
            .enumerate()
            .find(|(_, days)| !(28..=31).contains(*days))
        {
            return Err(format!(
                "month {} has {} days; expected a value between 28 and 31",
                idx + 1,
                bad
            ));
        }
        Ok(Self(days))
    }

    /// Days in `month` (1 = January). Out-of-range months are clamped.
    pub fn days_in(&self, month: u32) -> u32 {
        self.0[(month.clamp(1, 12) - 1) as usize]
    }

    /// Days in the month preceding `month`; January wraps to December.
    pub fn days_in_previous(&self, month: u32) -> u32 {
        let previous = if month <= 1 { 12 } else { month - 1 };
        self.days_in(previous)
    }

    pub fn as_array(&self) -> [u32; 12] {
        self.0
    }
}

impl Default for DayTable {
    fn default() -> Self {
        Self::FIXED
    }
}

impl TryFrom<Vec<u32>> for DayTable {
    type Error = String;

    fn try_from(value: Vec<u32>) -> Result<Self, Self::Error> {
        let days: [u32; 12] = value
            .try_into()
            .map_err(|raw: Vec<u32>| format!("day table needs 12 entries, got {}", raw.len()))?;
        Self::new(days)
    }
}

impl From<DayTable> for Vec<u32> {
    fn from(value: DayTable) -> Self {
        value.0.to_vec()
    }
}
