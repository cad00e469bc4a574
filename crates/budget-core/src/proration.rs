//! Expected income for the elapsed part of a billing cycle.

use chrono::{Datelike, NaiveDateTime};
use tracing::{debug, error};

use budget_domain::{DayTable, RegularTransaction};

use crate::{
    billing_window::ensure_billing_day, error::add_amounts, CoreError, InvariantViolation,
    MatchedSet,
};

/// Scales the month's planned cash flow, corrected by realized matches, to the
/// portion of the billing cycle that has already elapsed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProrationCalculator {
    day_table: DayTable,
}

impl ProrationCalculator {
    pub fn new(day_table: DayTable) -> Self {
        Self { day_table }
    }

    pub fn day_table(&self) -> &DayTable {
        &self.day_table
    }

    /// What a single plan contributes to the monthly total given its realized matches.
    ///
    /// * unmatched plans count in full;
    /// * a matched income is replaced by the realized total;
    /// * a matched expense counts as whichever of planned and realized is larger in magnitude.
    pub fn contribution(plan: &RegularTransaction, matched: &MatchedSet) -> Result<i64, CoreError> {
        let Some(realized) = matched.get(&plan.label) else {
            debug!(
                "label `{}` adds {}: no matched actual",
                plan.label, plan.value
            );
            return Ok(plan.value);
        };

        if (plan.value > 0 && realized < 0) || (plan.value < 0 && realized > 0) {
            error!(
                "mismatched signs of regular and actual values for `{}`: regular {}, actual {}",
                plan.label, plan.value, realized
            );
            return Err(InvariantViolation::SignMismatch {
                label: plan.label.clone(),
                planned: plan.value,
                realized,
            }
            .into());
        }

        let value = if plan.is_income() {
            debug!("label `{}` adds {}: matched income", plan.label, realized);
            realized
        } else if plan.value.unsigned_abs() > realized.unsigned_abs() {
            debug!(
                "label `{}` adds {}: planned expense not yet reached",
                plan.label, plan.value
            );
            plan.value
        } else {
            debug!(
                "label `{}` adds {}: realized expense reached the plan",
                plan.label, realized
            );
            realized
        };
        Ok(value)
    }

    /// Sum of every plan's contribution for a whole cycle.
    pub fn monthly_total(
        regular: &[RegularTransaction],
        matched: &MatchedSet,
    ) -> Result<i64, CoreError> {
        let mut total = 0i64;
        for plan in regular {
            total = add_amounts(total, Self::contribution(plan, matched)?, "monthly total")?;
        }
        debug!("monthly total equals {}", total);
        Ok(total)
    }

    /// Prorates `total` by the days elapsed in the cycle at `at`.
    ///
    /// Arithmetic runs in `f32` and the result is truncated toward zero; both are part
    /// of the observable balance and must not be rounded differently.
    pub fn prorate(&self, total: i64, month_start: u32, at: NaiveDateTime) -> Result<i64, CoreError> {
        ensure_billing_day("month_start", month_start)?;

        let current_day = at.day();
        let result = if current_day >= month_start {
            let days_in_month = self.day_table.days_in(at.month());
            // the start day itself counts as already earned
            let elapsed = current_day - month_start + 1;
            total as f32 / days_in_month as f32 * elapsed as f32
        } else {
            // cycle began in the previous calendar month
            let days_in_previous = i64::from(self.day_table.days_in_previous(at.month()));
            let divisor = 31
                - (i64::from(month_start) - i64::from(current_day))
                - (31 - days_in_previous);
            if divisor <= 0 {
                error!(
                    "non-positive proration divisor {} for start day {} at {}",
                    divisor, month_start, at
                );
                return Err(InvariantViolation::DegenerateProration { divisor }.into());
            }
            total as f32 / divisor as f32
        };

        debug!("prorated income till {} equals {}", at, result);
        Ok(result as i64)
    }

    /// Monthly total of `regular` corrected by `matched`, prorated to `at`.
    pub fn expected_income(
        &self,
        regular: &[RegularTransaction],
        matched: &MatchedSet,
        month_start: u32,
        at: NaiveDateTime,
    ) -> Result<i64, CoreError> {
        let total = Self::monthly_total(regular, matched)?;
        self.prorate(total, month_start, at)
    }
}
