//! Planned (regular) and realized (actual) cash-flow records.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A planned recurring income (positive value) or expense (negative value).
///
/// `label` identifies the plan within its wallet and is what realized
/// transactions are matched against. `date` is the day of month it recurs on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegularTransaction {
    pub label: String,
    pub value: i64,
    pub date: u32,
}

impl RegularTransaction {
    pub fn new(label: impl Into<String>, value: i64, date: u32) -> Self {
        Self {
            label: label.into(),
            value,
            date,
        }
    }

    pub fn is_income(&self) -> bool {
        self.value > 0
    }
}

/// A realized cash-flow event recorded against a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActualTransaction {
    /// Empty when the event was recorded without a label; such events never match a plan.
    #[serde(default)]
    pub label: String,
    pub value: i64,
    pub time: NaiveDateTime,
    /// Free-form note describing where the record came from.
    #[serde(default)]
    pub raw_text: String,
}

impl ActualTransaction {
    pub fn new(label: impl Into<String>, value: i64, time: NaiveDateTime) -> Self {
        Self {
            label: label.into(),
            value,
            time,
            raw_text: String::new(),
        }
    }

    pub fn unlabeled(value: i64, time: NaiveDateTime) -> Self {
        Self::new(String::new(), value, time)
    }

    pub fn with_raw_text(mut self, raw_text: impl Into<String>) -> Self {
        self.raw_text = raw_text.into();
        self
    }

    pub fn is_labeled(&self) -> bool {
        !self.label.is_empty()
    }
}
