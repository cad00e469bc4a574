//! Resolution of wallet billing cycles that need not align with calendar months.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use budget_domain::{is_billing_day, BillingWindow};

use crate::CoreError;

/// Validates a day-of-month anchor, naming the offending field on failure.
pub fn ensure_billing_day(field: &'static str, value: u32) -> Result<(), CoreError> {
    if is_billing_day(value) {
        Ok(())
    } else {
        Err(CoreError::RangeViolation { field, value })
    }
}

/// Maps a month-start day and an instant to the billing cycle containing it.
pub struct BillingWindowResolver;

impl BillingWindowResolver {
    /// Computes the cycle containing `at` for a wallet whose cycle starts on `month_start`.
    ///
    /// The start is local midnight of `month_start` in `at`'s month, moved back one
    /// calendar month when `at` falls before that day. The end is one calendar month later.
    pub fn resolve(month_start: u32, at: NaiveDateTime) -> Result<BillingWindow, CoreError> {
        ensure_billing_day("month_start", month_start)?;

        let mut start_date = NaiveDate::from_ymd_opt(at.year(), at.month(), month_start)
            .ok_or(CoreError::RangeViolation {
                field: "month_start",
                value: month_start,
            })?;
        if at.day() < month_start {
            start_date = shift_months_back(start_date)?;
        }
        let end_date = start_date
            .checked_add_months(Months::new(1))
            .ok_or(CoreError::RangeViolation {
                field: "month_start",
                value: month_start,
            })?;

        let window = BillingWindow {
            start: start_date.and_time(NaiveTime::MIN),
            end: end_date.and_time(NaiveTime::MIN),
        };
        debug!("month borders are from {} to {}", window.start, window.end);
        Ok(window)
    }
}

fn shift_months_back(date: NaiveDate) -> Result<NaiveDate, CoreError> {
    date.checked_sub_months(Months::new(1))
        .ok_or(CoreError::RangeViolation {
            field: "month_start",
            value: date.day(),
        })
}
