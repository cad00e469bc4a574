use std::io;

use chrono::NaiveDateTime;
use thiserror::Error;

use budget_domain::OwnerId;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("`{field}` must be between 1 and 28, got {value}")]
    RangeViolation { field: &'static str, value: u32 },
    #[error("Label `{0}` already exists")]
    DuplicateLabel(String),
    #[error("Label must not be empty")]
    EmptyLabel,
    #[error("Regular transaction not found: {0}")]
    NotFound(String),
    #[error("No wallet for owner {0}")]
    WalletNotFound(OwnerId),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
}

impl CoreError {
    /// Fatal errors indicate corrupted wallet data rather than a bad request or a
    /// transient storage failure. Callers should fail the request and alert on them.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CoreError::Invariant(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CoreError::RangeViolation { .. }
                | CoreError::DuplicateLabel(_)
                | CoreError::EmptyLabel
                | CoreError::NotFound(_)
        )
    }
}

/// Adds two amounts, reporting overflow as a data-integrity failure.
pub(crate) fn add_amounts(lhs: i64, rhs: i64, context: &'static str) -> Result<i64, CoreError> {
    lhs.checked_add(rhs).ok_or_else(|| {
        tracing::error!("amount overflow while summing {}: {} + {}", context, lhs, rhs);
        InvariantViolation::Overflow { context }.into()
    })
}

/// Data-integrity failures detected while computing a balance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("regular transaction with an empty label")]
    EmptyPlannedLabel,
    #[error(
        "planned value {planned} for `{label}` is matched by realized total {realized} of the opposite sign"
    )]
    SignMismatch {
        label: String,
        planned: i64,
        realized: i64,
    },
    #[error("proration divisor {divisor} is not positive")]
    DegenerateProration { divisor: i64 },
    #[error("amount overflow while summing {context}")]
    Overflow { context: &'static str },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("Invalid range: {to} is before {from}")]
    InvalidRange {
        from: NaiveDateTime,
        to: NaiveDateTime,
    },
    #[error("Corrupt wallet data: {0}")]
    Corrupt(String),
    #[error("Storage backend error: {0}")]
    Backend(String),
}
