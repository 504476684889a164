//! Paid flags and the month rollover.

use envelope_domain::{BucketSet, Money, Snapshot};
use tracing::info;

use crate::{policy::AllocationPolicy, CoreError};

/// Helpers for bill bookkeeping between income events.
pub struct MonthService;

impl MonthService {
    /// Flips `is_paid` on bucket `id`; nothing else changes.
    pub fn toggle_paid(buckets: &BucketSet, id: &str) -> Result<BucketSet, CoreError> {
        let mut next = buckets.clone();
        let bucket = next
            .get_mut(id)
            .ok_or_else(|| CoreError::BucketNotFound(id.to_string()))?;
        bucket.is_paid = !bucket.is_paid;
        Ok(next)
    }

    /// Starts a new month on the bucket set.
    ///
    /// Preserved buckets keep their balance and only lose the paid flag. Every
    /// other bucket is emptied and unflagged, and restored targets (the shrinking
    /// daily cap) go back to their defaults.
    pub fn reset_buckets(buckets: &BucketSet, policy: &AllocationPolicy) -> BucketSet {
        let mut next = buckets.clone();
        for bucket in next.iter_mut() {
            bucket.is_paid = false;
            if policy.reset.preserves(&bucket.id, &bucket.name) {
                continue;
            }
            bucket.current = Money::ZERO;
            if let Some((_, target)) = policy
                .reset
                .restored_targets
                .iter()
                .find(|(id, _)| *id == bucket.id)
            {
                bucket.target = Some(*target);
            }
        }
        next
    }

    /// Resets the buckets and discards the whole ledger.
    pub fn reset_month(snapshot: &Snapshot, policy: &AllocationPolicy) -> Snapshot {
        let mut next = snapshot.clone();
        next.buckets = Self::reset_buckets(&snapshot.buckets, policy);
        next.transactions.clear();
        next.touch();
        info!(
            discarded = snapshot.transactions.len(),
            "month reset applied"
        );
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use envelope_domain::{roster::reference_roster, Ledger, Transaction, TransactionKind};

    #[test]
    fn toggle_unknown_bucket_fails() {
        let err = MonthService::toggle_paid(&reference_roster(), "yacht").unwrap_err();
        assert_eq!(err, CoreError::BucketNotFound("yacht".into()));
    }

    #[test]
    fn reset_keeps_buckets_named_like_savings() {
        let mut roster = reference_roster();
        if let Some(meal) = roster.get_mut("meal") {
            meal.name = "Meal Savings".into();
            meal.current = Money::from_units(30);
        }
        let next = MonthService::reset_buckets(&roster, &AllocationPolicy::reference());
        assert_eq!(next.get("meal").map(|b| b.current), Some(Money::from_units(30)));
    }

    #[test]
    fn reset_month_empties_the_ledger_and_keeps_savings() {
        let mut buckets = reference_roster();
        if let Some(savings) = buckets.get_mut("savings") {
            savings.current = Money::from_units(700);
        }
        if let Some(rent) = buckets.get_mut("rent") {
            rent.current = Money::from_units(40);
            rent.is_paid = true;
        }
        let mut ledger = Ledger::new();
        ledger.record(Transaction::new(
            TransactionKind::Income,
            Money::from_units(740),
            None,
        ));
        let snapshot = Snapshot::new(buckets, ledger);

        let next = MonthService::reset_month(&snapshot, &AllocationPolicy::reference());
        assert!(next.transactions.is_empty());
        assert_eq!(snapshot.transactions.len(), 1);
        assert_eq!(
            next.buckets.get("savings").map(|b| b.current),
            Some(Money::from_units(700))
        );
        let rent = next.buckets.get("rent").unwrap();
        assert_eq!(rent.current, Money::ZERO);
        assert!(!rent.is_paid);
    }
}
