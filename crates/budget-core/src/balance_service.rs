//! Available-balance estimate for a wallet at a given instant.

use chrono::NaiveDateTime;
use tracing::{debug, info};

use budget_domain::{ActualTransaction, BillingWindow, DayTable, WalletInfo};

use crate::{
    error::add_amounts, storage::WalletStorage, BillingWindowResolver, CoreError, MatchedSet, ProrationCalculator,
    TransactionMatcher,
};

/// Parts the balance is made of, kept for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceBreakdown {
    pub window: BillingWindow,
    /// Planned cash flow corrected by matched activity, prorated to the instant.
    pub prorated: i64,
    /// Realized activity that matched no plan, counted in full.
    pub unmatched: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceService {
    calculator: ProrationCalculator,
}

impl BalanceService {
    pub fn new(day_table: DayTable) -> Self {
        Self {
            calculator: ProrationCalculator::new(day_table),
        }
    }

    pub fn balance(
        &self,
        storage: &dyn WalletStorage,
        wallet: &WalletInfo,
        at: NaiveDateTime,
    ) -> Result<i64, CoreError> {
        self.breakdown(storage, wallet, at).map(|parts| parts.total)
    }

    /// Recomputes everything from storage; nothing is cached between calls.
    pub fn breakdown(
        &self,
        storage: &dyn WalletStorage,
        wallet: &WalletInfo,
        at: NaiveDateTime,
    ) -> Result<BalanceBreakdown, CoreError> {
        debug!(
            "calculating available amount for wallet `{}` at {}",
            wallet.id, at
        );

        let regular = storage.regular_transactions(&wallet.id)?;
        let window = BillingWindowResolver::resolve(wallet.month_start, at)?;
        let actual = Self::realized_since_window_start(storage, wallet, window, at)?;
        debug!(
            "wallet `{}` has {} regular and {} actual transactions in the current cycle",
            wallet.id,
            regular.len(),
            actual.len()
        );

        let matched = TransactionMatcher::accumulate(&regular, &actual)?;
        let prorated = self
            .calculator
            .expected_income(&regular, &matched, wallet.month_start, at)?;
        let unmatched = Self::unmatched_sum(&actual, &matched)?;
        let total = add_amounts(prorated, unmatched, "available balance")?;

        info!(
            "available money for wallet `{}`: {} (matched with regular: {}; unmatched: {})",
            wallet.id, total, prorated, unmatched
        );
        Ok(BalanceBreakdown {
            window,
            prorated,
            unmatched,
            total,
        })
    }

    /// Total of realized transactions that did not match any plan.
    pub fn unmatched_sum(
        actual: &[ActualTransaction],
        matched: &MatchedSet,
    ) -> Result<i64, CoreError> {
        TransactionMatcher::unmatched(actual, matched)
            .try_fold(0i64, |sum, txn| add_amounts(sum, txn.value, "unmatched transactions"))
    }

    // The cycle start itself is excluded: only activity strictly after it counts.
    fn realized_since_window_start(
        storage: &dyn WalletStorage,
        wallet: &WalletInfo,
        window: BillingWindow,
        at: NaiveDateTime,
    ) -> Result<Vec<ActualTransaction>, CoreError> {
        let mut actual = storage.actual_transactions(&wallet.id, window.start, at)?;
        actual.retain(|txn| txn.time > window.start);
        Ok(actual)
    }
}
