//! Income waterfall and two-tier spend rule.
//!
//! Both operations are value-in/value-out: the caller's [`BucketSet`] is never
//! touched, a new set is returned together with the transaction to record.

use envelope_domain::{Bucket, BucketId, BucketSet, Money, Transaction, TransactionKind};
use tracing::debug;

use crate::{policy::*, CoreError};

/// Money moved into (positive) or out of (negative) one bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movement {
    pub bucket: BucketId,
    pub delta: Money,
}

/// Result of a successful income or spend operation.
#[derive(Debug, Clone)]
pub struct Allocation {
    pub buckets: BucketSet,
    pub transaction: Transaction,
    pub movements: Vec<Movement>,
}

impl Allocation {
    /// Net change applied to `bucket`, zero when untouched.
    pub fn delta_for(&self, bucket: &str) -> Money {
        self.movements
            .iter()
            .filter(|movement| movement.bucket == bucket)
            .map(|movement| movement.delta)
            .sum()
    }
}

/// Stateless allocation engine driven by an [`AllocationPolicy`].
pub struct AllocationService;

impl AllocationService {
    /// Distributes `amount` across `buckets` following `policy.income`.
    pub fn apply_income(
        buckets: &BucketSet,
        amount: Money,
        note: Option<&str>,
        policy: &AllocationPolicy,
    ) -> Result<Allocation, CoreError> {
        ensure_positive(amount)?;
        // Keeps every balance and the wallet total representable in cents.
        if buckets
            .checked_total()
            .and_then(|total| total.checked_add(amount))
            .is_none()
        {
            return Err(too_large(amount));
        }
        let mut working = buckets.clone();
        let mut movements = Vec::new();
        let mut pool = amount;

        for step in &policy.income.steps {
            if pool.is_zero() {
                break;
            }
            match step {
                IncomeStep::SurvivalCut {
                    bucket,
                    rate_bps,
                    default_target,
                } => {
                    let target = require_mut(&mut working, bucket)?;
                    let cap = policy.drained_target.resolve(target.target, *default_target);
                    let room = cap.saturating_sub(target.current);
                    let moved = amount.percent_bps(*rate_bps).min(room).min(pool);
                    credit(target, moved, &mut movements)?;
                    pool -= moved;
                    debug!(bucket = %bucket, moved = %moved, "survival cut");
                }
                IncomeStep::Fill { bucket, honor_paid } => {
                    let target = require_mut(&mut working, bucket)?;
                    if *honor_paid && target.is_paid {
                        debug!(bucket = %bucket, "skipping paid bucket");
                        continue;
                    }
                    let moved = target.headroom().unwrap_or(Money::ZERO).min(pool);
                    credit(target, moved, &mut movements)?;
                    pool -= moved;
                    debug!(bucket = %bucket, moved = %moved, "fill");
                }
                IncomeStep::Split { shares } => {
                    let portions = split_portions(pool, shares);
                    let mut absorbed = Money::ZERO;
                    for (share, portion) in shares.iter().zip(portions) {
                        let target = require_mut(&mut working, &share.bucket)?;
                        let moved = target.headroom().unwrap_or(portion).min(portion);
                        credit(target, moved, &mut movements)?;
                        absorbed += moved;
                        debug!(bucket = %share.bucket, portion = %portion, moved = %moved, "split");
                    }
                    pool -= absorbed;
                }
                IncomeStep::Sink { bucket } => {
                    let target = require_mut(&mut working, bucket)?;
                    credit(target, pool, &mut movements)?;
                    debug!(bucket = %bucket, moved = %pool, "sink");
                    pool = Money::ZERO;
                }
            }
        }

        if !pool.is_zero() {
            return Err(CoreError::InvalidPolicy(format!(
                "income policy left {pool} unallocated"
            )));
        }

        Ok(Allocation {
            buckets: working,
            transaction: Transaction::new(TransactionKind::Income, amount, note),
            movements,
        })
    }

    /// Debits `amount` from the spend primary and secondary buckets.
    ///
    /// Fails atomically with [`CoreError::InsufficientFunds`] when both together
    /// hold less than `amount`.
    pub fn apply_spend(
        buckets: &BucketSet,
        amount: Money,
        note: Option<&str>,
        policy: &AllocationPolicy,
    ) -> Result<Allocation, CoreError> {
        ensure_positive(amount)?;
        let rule = &policy.spend;
        let primary = require(buckets, &rule.primary)?;
        let secondary = require(buckets, &rule.secondary)?;

        let primary_funds = primary.current.max(Money::ZERO);
        let secondary_funds = secondary.current.max(Money::ZERO);
        let available = primary_funds.saturating_add(secondary_funds);
        if amount > available {
            return Err(CoreError::InsufficientFunds {
                requested: amount,
                available,
            });
        }

        let preferred = if amount <= rule.small_purchase_threshold {
            primary_funds.min(amount)
        } else {
            primary_funds.min(rule.small_purchase_threshold)
        };
        // A secondary too small for the rest leaves the shortfall on the primary,
        // which the availability check guarantees can cover it.
        let shortfall = (amount - preferred).saturating_sub(secondary_funds);
        let from_primary = preferred + shortfall;
        let from_secondary = amount - from_primary;

        let mut working = buckets.clone();
        let mut movements = Vec::new();
        if from_primary.is_positive() {
            let bucket = require_mut(&mut working, &rule.primary)?;
            bucket.current -= from_primary;
            if rule.shrink_primary_cap {
                let cap = policy
                    .drained_target
                    .resolve(bucket.target, rule.primary_default_target);
                bucket.target = Some(cap.saturating_sub(from_primary));
            }
            movements.push(Movement {
                bucket: rule.primary.clone(),
                delta: -from_primary,
            });
        }
        if from_secondary.is_positive() {
            let bucket = require_mut(&mut working, &rule.secondary)?;
            bucket.current -= from_secondary;
            movements.push(Movement {
                bucket: rule.secondary.clone(),
                delta: -from_secondary,
            });
        }
        debug!(
            amount = %amount,
            from_primary = %from_primary,
            from_secondary = %from_secondary,
            "spend"
        );

        Ok(Allocation {
            buckets: working,
            transaction: Transaction::new(TransactionKind::Spend, amount, note),
            movements,
        })
    }
}

fn ensure_positive(amount: Money) -> Result<(), CoreError> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(CoreError::InvalidAmount(format!(
            "amount must be greater than zero, got {amount}"
        )))
    }
}

fn require<'a>(buckets: &'a BucketSet, id: &BucketId) -> Result<&'a Bucket, CoreError> {
    buckets
        .get(id.as_str())
        .ok_or_else(|| CoreError::BucketNotFound(id.to_string()))
}

fn require_mut<'a>(buckets: &'a mut BucketSet, id: &BucketId) -> Result<&'a mut Bucket, CoreError> {
    buckets
        .get_mut(id.as_str())
        .ok_or_else(|| CoreError::BucketNotFound(id.to_string()))
}

fn too_large(amount: Money) -> CoreError {
    CoreError::InvalidAmount(format!("amount too large: {amount}"))
}

fn credit(
    bucket: &mut Bucket,
    amount: Money,
    movements: &mut Vec<Movement>,
) -> Result<(), CoreError> {
    if amount.is_zero() {
        return Ok(());
    }
    bucket.current = bucket
        .current
        .checked_add(amount)
        .ok_or_else(|| too_large(amount))?;
    movements.push(Movement {
        bucket: bucket.id.clone(),
        delta: amount,
    });
    Ok(())
}

/// Rounded ratio shares of `pool`; the last share takes the exact remainder.
fn split_portions(pool: Money, shares: &[SplitShare]) -> Vec<Money> {
    let mut portions = Vec::with_capacity(shares.len());
    let mut assigned = Money::ZERO;
    for (index, share) in shares.iter().enumerate() {
        let portion = if index + 1 == shares.len() {
            pool - assigned
        } else {
            pool.percent_bps(share.ratio_bps)
        };
        assigned += portion;
        portions.push(portion);
    }
    portions
}
