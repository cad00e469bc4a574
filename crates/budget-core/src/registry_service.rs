//! Registration of planned recurring transactions.

use tracing::{info, warn};

use budget_domain::{RegularTransaction, WalletId};

use crate::{
    billing_window::ensure_billing_day, error::add_amounts, storage::WalletStorage, CoreError,
};

/// Guards the per-wallet set of plans: labels are unique and non-empty, recurrence
/// days lie in 1..=28, and removal needs an exact match.
pub struct RegularTransactionRegistry;

impl RegularTransactionRegistry {
    pub fn add(
        storage: &dyn WalletStorage,
        wallet: &WalletId,
        transaction: RegularTransaction,
    ) -> Result<(), CoreError> {
        if let Err(err) = Self::validate(&transaction) {
            warn!(
                "rejected regular transaction `{}` for wallet `{}`: {}",
                transaction.label, wallet, err
            );
            return Err(err);
        }

        let existing = storage.regular_transactions(wallet)?;
        if existing.iter().any(|plan| plan.label == transaction.label) {
            warn!(
                "label `{}` already exists for wallet `{}`",
                transaction.label, wallet
            );
            return Err(CoreError::DuplicateLabel(transaction.label));
        }

        storage.add_regular_transaction(wallet, &transaction)?;
        info!(
            "registered `{}` ({} on day {}) for wallet `{}`",
            transaction.label, transaction.value, transaction.date, wallet
        );
        Ok(())
    }

    /// Removes the plan equal to `transaction` in every field.
    pub fn remove(
        storage: &dyn WalletStorage,
        wallet: &WalletId,
        transaction: &RegularTransaction,
    ) -> Result<(), CoreError> {
        let existing = storage.regular_transactions(wallet)?;
        if !existing.iter().any(|plan| plan == transaction) {
            warn!(
                "no exactly matching regular transaction `{}` for wallet `{}`",
                transaction.label, wallet
            );
            return Err(CoreError::NotFound(format!(
                "`{}` ({} on day {})",
                transaction.label, transaction.value, transaction.date
            )));
        }
        storage.remove_regular_transaction(wallet, transaction)?;
        info!("removed `{}` from wallet `{}`", transaction.label, wallet);
        Ok(())
    }

    /// Sum of raw planned values, without proration or matching.
    pub fn planned_monthly_income(
        storage: &dyn WalletStorage,
        wallet: &WalletId,
    ) -> Result<i64, CoreError> {
        let total = storage
            .regular_transactions(wallet)?
            .iter()
            .try_fold(0i64, |sum, plan| add_amounts(sum, plan.value, "planned income"))?;
        info!("planned monthly income for wallet `{}` is {}", wallet, total);
        Ok(total)
    }

    fn validate(transaction: &RegularTransaction) -> Result<(), CoreError> {
        ensure_billing_day("date", transaction.date)?;
        if transaction.label.is_empty() {
            return Err(CoreError::EmptyLabel);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryWalletStorage;

    fn wallet() -> WalletId {
        WalletId::new("registry")
    }

    #[test]
    fn boundary_days_are_accepted_and_outside_rejected() {
        let storage = MemoryWalletStorage::new();
        for (label, day) in [("first", 1), ("last", 28)] {
            RegularTransactionRegistry::add(
                &storage,
                &wallet(),
                RegularTransaction::new(label, 10, day),
            )
            .expect("in range");
        }
        for day in [0, 29] {
            let err = RegularTransactionRegistry::add(
                &storage,
                &wallet(),
                RegularTransaction::new(format!("day{day}"), 10, day),
            )
            .unwrap_err();
            assert!(matches!(err, CoreError::RangeViolation { field: "date", .. }));
        }
        assert_eq!(storage.regular_transactions(&wallet()).unwrap().len(), 2);
    }

    #[test]
    fn duplicate_label_keeps_first_entry() {
        let storage = MemoryWalletStorage::new();
        let first = RegularTransaction::new("rent", -800, 1);
        RegularTransactionRegistry::add(&storage, &wallet(), first.clone()).unwrap();

        let err = RegularTransactionRegistry::add(
            &storage,
            &wallet(),
            RegularTransaction::new("rent", -900, 3),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::DuplicateLabel(ref label) if label == "rent"));
        assert!(err.is_validation());
        assert_eq!(storage.regular_transactions(&wallet()).unwrap(), vec![first]);
    }

    #[test]
    fn same_label_is_allowed_on_other_wallets() {
        let storage = MemoryWalletStorage::new();
        let plan = RegularTransaction::new("rent", -800, 1);
        RegularTransactionRegistry::add(&storage, &WalletId::new("a"), plan.clone()).unwrap();
        RegularTransactionRegistry::add(&storage, &WalletId::new("b"), plan).unwrap();
    }

    #[test]
    fn empty_label_is_rejected() {
        let storage = MemoryWalletStorage::new();
        let err =
            RegularTransactionRegistry::add(&storage, &wallet(), RegularTransaction::new("", 5, 5))
                .unwrap_err();
        assert!(matches!(err, CoreError::EmptyLabel));
    }

    #[test]
    fn removal_requires_exact_match() {
        let storage = MemoryWalletStorage::new();
        let plan = RegularTransaction::new("rent", -800, 1);
        RegularTransactionRegistry::add(&storage, &wallet(), plan.clone()).unwrap();

        let near_miss = RegularTransaction::new("rent", -800, 2);
        let err = RegularTransactionRegistry::remove(&storage, &wallet(), &near_miss).unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
        assert_eq!(
            storage.regular_transactions(&wallet()).unwrap(),
            vec![plan.clone()]
        );

        RegularTransactionRegistry::remove(&storage, &wallet(), &plan).unwrap();
        assert!(storage.regular_transactions(&wallet()).unwrap().is_empty());
    }

    #[test]
    fn planned_income_sums_raw_values() {
        let storage = MemoryWalletStorage::new();
        RegularTransactionRegistry::add(&storage, &wallet(), RegularTransaction::new("salary", 3000, 1))
            .unwrap();
        RegularTransactionRegistry::add(&storage, &wallet(), RegularTransaction::new("rent", -800, 3))
            .unwrap();
        assert_eq!(
            RegularTransactionRegistry::planned_monthly_income(&storage, &wallet()).unwrap(),
            2200
        );
    }

    #[test]
    fn planned_income_overflow_is_reported() {
        let storage = MemoryWalletStorage::new();
        RegularTransactionRegistry::add(
            &storage,
            &wallet(),
            RegularTransaction::new("salary", i64::MAX, 1),
        )
        .unwrap();
        RegularTransactionRegistry::add(&storage, &wallet(), RegularTransaction::new("bonus", 1, 2))
            .unwrap();

        let err = RegularTransactionRegistry::planned_monthly_income(&storage, &wallet()).unwrap_err();
        assert!(err.is_fatal());
    }
}
