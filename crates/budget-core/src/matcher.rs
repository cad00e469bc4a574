//! Pairing of realized transactions with the plans they fulfil.

use std::collections::{HashMap, HashSet};

use tracing::{debug, error};

use budget_domain::{ActualTransaction, RegularTransaction};

use crate::{error::add_amounts, CoreError, InvariantViolation};

/// Realized totals keyed by the planned label they were matched to.
///
/// Only labels with at least one realized counterpart have an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchedSet {
    totals: HashMap<String, i64>,
}

impl MatchedSet {
    pub fn get(&self, label: &str) -> Option<i64> {
        self.totals.get(label).copied()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.totals.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.totals
            .iter()
            .map(|(label, total)| (label.as_str(), *total))
    }
}

pub struct TransactionMatcher;

impl TransactionMatcher {
    /// Sums realized values per planned label.
    ///
    /// Realized transactions without a label, or with a label no plan carries, are
    /// left out. A plan with an empty label is a data-integrity violation.
    pub fn accumulate(
        regular: &[RegularTransaction],
        actual: &[ActualTransaction],
    ) -> Result<MatchedSet, CoreError> {
        debug!(
            "accumulating matched transactions for {} regular and {} actual",
            regular.len(),
            actual.len()
        );

        let mut labels = HashSet::with_capacity(regular.len());
        for plan in regular {
            if plan.label.is_empty() {
                error!("regular transaction with an empty label: {:?}", plan);
                return Err(InvariantViolation::EmptyPlannedLabel.into());
            }
            labels.insert(plan.label.as_str());
        }

        let mut totals: HashMap<String, i64> = HashMap::with_capacity(regular.len());
        for txn in actual {
            if !txn.is_labeled() || !labels.contains(txn.label.as_str()) {
                continue;
            }
            let total = totals.entry(txn.label.clone()).or_default();
            *total = add_amounts(*total, txn.value, "matched transactions")?;
        }
        Ok(MatchedSet { totals })
    }

    /// Realized transactions that did not contribute to `matched`.
    pub fn unmatched<'a>(
        actual: &'a [ActualTransaction],
        matched: &'a MatchedSet,
    ) -> impl Iterator<Item = &'a ActualTransaction> + 'a {
        actual.iter().filter(move |txn| !matched.contains(&txn.label))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;

    fn noon(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn all_realized_sharing_a_planned_label_are_summed() {
        let regular = vec![RegularTransaction::new("bills", -300, 3)];
        let actual = vec![
            ActualTransaction::new("bills", -120, noon(3)),
            ActualTransaction::new("bills", -80, noon(9)),
            ActualTransaction::new("coffee", -4, noon(9)),
            ActualTransaction::unlabeled(-10, noon(10)),
        ];

        let matched = TransactionMatcher::accumulate(&regular, &actual).unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched.get("bills"), Some(-200));
        assert!(!matched.contains("coffee"));

        let unmatched: Vec<_> = TransactionMatcher::unmatched(&actual, &matched)
            .map(|txn| txn.value)
            .collect();
        assert_eq!(unmatched, vec![-4, -10]);
    }

    #[test]
    fn plans_without_realized_counterparts_have_no_entry() {
        let regular = vec![RegularTransaction::new("salary", 3000, 1)];
        let matched = TransactionMatcher::accumulate(&regular, &[]).unwrap();
        assert!(matched.is_empty());
        assert_eq!(matched.get("salary"), None);
    }

    #[test]
    fn empty_planned_label_is_fatal() {
        let regular = vec![RegularTransaction::new("", 100, 1)];
        let err = TransactionMatcher::accumulate(&regular, &[]).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(
            err,
            CoreError::Invariant(InvariantViolation::EmptyPlannedLabel)
        ));
    }

    #[test]
    fn matched_total_overflow_is_fatal() {
        let regular = vec![RegularTransaction::new("salary", 3000, 1)];
        let actual = vec![
            ActualTransaction::new("salary", i64::MAX, noon(1)),
            ActualTransaction::new("salary", 1, noon(2)),
        ];
        let err = TransactionMatcher::accumulate(&regular, &actual).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(
            err,
            CoreError::Invariant(InvariantViolation::Overflow { .. })
        ));
    }
}
