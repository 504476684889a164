//! Read-only views over a bucket set: totals, bill status, advisory line.

use std::fmt;

use envelope_domain::{BucketId, BucketSet, Money};

use crate::policy::AllocationPolicy;

const LOW_DAILY_CAP: Money = Money::from_units(100);
const OVERFLOW_CASH: Money = Money::from_units(500);

/// Single status line derived from bucket state, most urgent first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    BillPending(String),
    SplitBucketMaxed(String),
    DailyCashLow,
    OverflowCash,
    Stable,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::BillPending(name) => write!(
                f,
                "Priority alert: {name} is still pending. Don't spend on snacks."
            ),
            Advisory::SplitBucketMaxed(name) => {
                write!(f, "{name} fund is maxed out. You are breathing easy.")
            }
            Advisory::DailyCashLow => f.write_str("You are broke on daily cash. Go home."),
            Advisory::OverflowCash => f.write_str("Nice. You have overflow cash in savings."),
            Advisory::Stable => f.write_str("System stable. Waiting for income."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillStatus {
    pub id: BucketId,
    pub name: String,
    pub current: Money,
    pub target: Option<Money>,
    pub is_paid: bool,
    pub is_funded: bool,
}

pub struct SummaryService;

impl SummaryService {
    pub fn total_balance(buckets: &BucketSet) -> Money {
        buckets.total()
    }

    /// Bill-like buckets in policy order with their paid and funded state.
    pub fn bills(buckets: &BucketSet, policy: &AllocationPolicy) -> Vec<BillStatus> {
        policy
            .bills
            .iter()
            .filter_map(|id| buckets.get(id.as_str()))
            .map(|bucket| BillStatus {
                id: bucket.id.clone(),
                name: bucket.name.clone(),
                current: bucket.current,
                target: bucket.target,
                is_paid: bucket.is_paid,
                is_funded: bucket.is_full(),
            })
            .collect()
    }

    pub fn advisory(buckets: &BucketSet, policy: &AllocationPolicy) -> Advisory {
        let first_bill = policy
            .income
            .critical_bills()
            .first()
            .and_then(|id| buckets.get(id.as_str()));
        if let Some(bill) = first_bill {
            if !bill.is_paid && matches!(bill.target, Some(target) if bill.current < target) {
                return Advisory::BillPending(bill.name.clone());
            }
        }

        let first_share = policy
            .income
            .split_shares()
            .first()
            .and_then(|share| buckets.get(share.bucket.as_str()));
        if let Some(share) = first_share {
            if share.is_full() {
                return Advisory::SplitBucketMaxed(share.name.clone());
            }
        }

        if let Some(daily) = buckets.get(policy.spend.primary.as_str()) {
            if matches!(daily.target, Some(target) if target < LOW_DAILY_CAP) {
                return Advisory::DailyCashLow;
            }
        }

        let sink = policy
            .income
            .sink()
            .and_then(|id| buckets.get(id.as_str()));
        if matches!(sink, Some(savings) if savings.current > OVERFLOW_CASH) {
            return Advisory::OverflowCash;
        }

        Advisory::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use envelope_domain::roster::reference_roster;

    fn set(buckets: &mut BucketSet, id: &str, current: Money) {
        if let Some(bucket) = buckets.get_mut(id) {
            bucket.current = current;
        }
    }

    #[test]
    fn advisory_prefers_pending_rent() {
        let policy = AllocationPolicy::reference();
        let mut buckets = reference_roster();
        assert_eq!(
            SummaryService::advisory(&buckets, &policy),
            Advisory::BillPending("Rent".into())
        );

        if let Some(rent) = buckets.get_mut("rent") {
            rent.is_paid = true;
        }
        set(&mut buckets, "vape", Money::from_units(2500));
        assert_eq!(
            SummaryService::advisory(&buckets, &policy),
            Advisory::SplitBucketMaxed("Vape Supplies".into())
        );
    }

    #[test]
    fn advisory_reports_low_daily_cap_then_overflow() {
        let policy = AllocationPolicy::reference();
        let mut buckets = reference_roster();
        set(&mut buckets, "rent", Money::from_units(2150));
        if let Some(daily) = buckets.get_mut("daily") {
            daily.target = Some(Money::from_units(40));
        }
        assert_eq!(SummaryService::advisory(&buckets, &policy), Advisory::DailyCashLow);

        if let Some(daily) = buckets.get_mut("daily") {
            daily.target = Some(Money::from_units(600));
        }
        set(&mut buckets, "savings", Money::from_units(501));
        assert_eq!(SummaryService::advisory(&buckets, &policy), Advisory::OverflowCash);

        set(&mut buckets, "savings", Money::from_units(20));
        assert_eq!(SummaryService::advisory(&buckets, &policy), Advisory::Stable);
    }

    #[test]
    fn bills_follow_policy_order() {
        let policy = AllocationPolicy::reference();
        let bills = SummaryService::bills(&reference_roster(), &policy);
        let ids: Vec<_> = bills.iter().map(|bill| bill.id.as_str()).collect();
        assert_eq!(ids, vec!["rent", "wifi", "elec", "maid"]);
        assert!(bills.iter().all(|bill| !bill.is_paid && !bill.is_funded));
    }
}
