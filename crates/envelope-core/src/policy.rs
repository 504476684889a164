//! Allocation rules expressed as data.
//!
//! Income runs through an ordered table of [`IncomeStep`]s; spending follows a
//! [`SpendPolicy`]; month reset follows a [`ResetPolicy`]. The engine in
//! [`crate::allocation_service`] knows nothing about particular bucket ids.

use std::collections::HashSet;

use envelope_domain::{roster, BucketId, BucketSet, Money};

use crate::CoreError;

const WHOLE_BPS: u32 = 10_000;

/// One stage of the income waterfall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomeStep {
    /// Reserve `rate_bps` of the whole income for `bucket`, capped at its target.
    /// `default_target` applies when the bucket carries no target.
    SurvivalCut {
        bucket: BucketId,
        rate_bps: u32,
        default_target: Money,
    },
    /// Fill `bucket` up to its target from the remaining pool. With `honor_paid`
    /// a bucket marked paid is skipped whatever its balance.
    Fill { bucket: BucketId, honor_paid: bool },
    /// Divide the remaining pool by ratio; every share is capped at its bucket's
    /// target and whatever is not absorbed stays in the pool as overflow.
    Split { shares: Vec<SplitShare> },
    /// Uncapped bucket that absorbs everything left.
    Sink { bucket: BucketId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitShare {
    pub bucket: BucketId,
    pub ratio_bps: u32,
}

impl SplitShare {
    pub fn new(bucket: impl Into<BucketId>, ratio_bps: u32) -> Self {
        Self {
            bucket: bucket.into(),
            ratio_bps,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomePolicy {
    pub steps: Vec<IncomeStep>,
}

impl IncomePolicy {
    /// Bucket receiving the final residue.
    pub fn sink(&self) -> Option<&BucketId> {
        self.steps.iter().rev().find_map(|step| match step {
            IncomeStep::Sink { bucket } => Some(bucket),
            _ => None,
        })
    }

    /// Buckets filled in priority order before any split happens.
    pub fn critical_bills(&self) -> Vec<&BucketId> {
        let split_at = self
            .steps
            .iter()
            .position(|step| matches!(step, IncomeStep::Split { .. }))
            .unwrap_or(self.steps.len());
        self.steps[..split_at]
            .iter()
            .filter_map(|step| match step {
                IncomeStep::Fill { bucket, .. } => Some(bucket),
                _ => None,
            })
            .collect()
    }

    pub fn split_shares(&self) -> Vec<&SplitShare> {
        self.steps
            .iter()
            .flat_map(|step| match step {
                IncomeStep::Split { shares } => shares.iter().collect::<Vec<_>>(),
                _ => Vec::new(),
            })
            .collect()
    }
}

/// Two-tier spend rule: small purchases come from `primary` first, large ones
/// take at most `small_purchase_threshold` from it and push the rest onto
/// `secondary`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendPolicy {
    pub primary: BucketId,
    pub secondary: BucketId,
    pub small_purchase_threshold: Money,
    /// Target assumed for `primary` when it has none.
    pub primary_default_target: Money,
    /// Shrink `primary.target` by every amount debited from it.
    pub shrink_primary_cap: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetPolicy {
    /// Buckets whose balance carries over month to month.
    pub preserved: Vec<BucketId>,
    /// Case-insensitive name fragment that also marks a bucket as preserved.
    pub preserved_name_marker: Option<String>,
    /// Targets restored after the reset.
    pub restored_targets: Vec<(BucketId, Money)>,
}

impl ResetPolicy {
    pub fn preserves(&self, id: &BucketId, name: &str) -> bool {
        if self.preserved.contains(id) {
            return true;
        }
        self.preserved_name_marker
            .as_deref()
            .map(|marker| name.to_lowercase().contains(&marker.to_lowercase()))
            .unwrap_or(false)
    }
}

/// How a capped bucket whose target has shrunk to zero is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DrainedTarget {
    /// Zero is a real cap until the month reset restores the default.
    #[default]
    Cap,
    /// Zero counts as unset: the default target applies again.
    Unset,
}

impl DrainedTarget {
    /// Cap in force for a bucket carrying `target`.
    pub fn resolve(self, target: Option<Money>, default: Money) -> Money {
        match (self, target) {
            (DrainedTarget::Unset, Some(target)) if target.is_zero() => default,
            (_, Some(target)) => target,
            (_, None) => default,
        }
    }
}

/// Complete rule set consumed by the allocation, month, and summary services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationPolicy {
    pub income: IncomePolicy,
    pub spend: SpendPolicy,
    pub reset: ResetPolicy,
    /// Bill-like buckets whose paid flag the presentation layer exposes.
    pub bills: Vec<BucketId>,
    /// Reading of a default-backed target (survival cut, spend primary) at zero.
    pub drained_target: DrainedTarget,
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        Self::reference()
    }
}

impl AllocationPolicy {
    /// Rules for the reference roster: 8% survival cut to `daily`, bills
    /// `rent, wifi, elec`, a 40/60 `vape`/`meal` split, overflow to `maid` then
    /// `savings`; spending draws on `daily` then `savings` with a 100 threshold.
    pub fn reference() -> Self {
        let sink = BucketId::from(roster::SAVINGS);
        Self {
            income: IncomePolicy {
                steps: vec![
                    IncomeStep::SurvivalCut {
                        bucket: roster::DAILY.into(),
                        rate_bps: 800,
                        default_target: roster::DAILY_DEFAULT_TARGET,
                    },
                    IncomeStep::Fill {
                        bucket: roster::RENT.into(),
                        honor_paid: true,
                    },
                    IncomeStep::Fill {
                        bucket: roster::WIFI.into(),
                        honor_paid: true,
                    },
                    IncomeStep::Fill {
                        bucket: roster::ELEC.into(),
                        honor_paid: true,
                    },
                    IncomeStep::Split {
                        shares: vec![
                            SplitShare::new(roster::VAPE, 4_000),
                            SplitShare::new(roster::MEAL, 6_000),
                        ],
                    },
                    IncomeStep::Fill {
                        bucket: roster::MAID.into(),
                        honor_paid: false,
                    },
                    IncomeStep::Sink {
                        bucket: sink.clone(),
                    },
                ],
            },
            spend: SpendPolicy {
                primary: roster::DAILY.into(),
                secondary: sink.clone(),
                small_purchase_threshold: Money::from_units(100),
                primary_default_target: roster::DAILY_DEFAULT_TARGET,
                shrink_primary_cap: true,
            },
            reset: ResetPolicy {
                preserved: vec![sink],
                preserved_name_marker: Some("savings".into()),
                restored_targets: vec![(roster::DAILY.into(), roster::DAILY_DEFAULT_TARGET)],
            },
            bills: vec![
                roster::RENT.into(),
                roster::WIFI.into(),
                roster::ELEC.into(),
                roster::MAID.into(),
            ],
            drained_target: DrainedTarget::Cap,
        }
    }

    /// Redirects the income residue to `bucket`, keeping it preserved on reset.
    pub fn with_sink(mut self, bucket: impl Into<BucketId>) -> Self {
        let bucket = bucket.into();
        for step in self.income.steps.iter_mut() {
            if let IncomeStep::Sink { bucket: sink } = step {
                *sink = bucket.clone();
            }
        }
        if !self.reset.preserved.contains(&bucket) {
            self.reset.preserved.push(bucket);
        }
        self
    }

    /// Draws large purchases from `bucket` instead of the income sink.
    pub fn with_spend_secondary(mut self, bucket: impl Into<BucketId>) -> Self {
        let bucket = bucket.into();
        self.spend.secondary = bucket.clone();
        if !self.reset.preserved.contains(&bucket) {
            self.reset.preserved.push(bucket);
        }
        self
    }

    pub fn with_small_purchase_threshold(mut self, threshold: Money) -> Self {
        self.spend.small_purchase_threshold = threshold;
        self
    }

    pub fn with_drained_target(mut self, mode: DrainedTarget) -> Self {
        self.drained_target = mode;
        self
    }

    /// Changes the daily allowance default everywhere it is used.
    pub fn with_primary_default_target(mut self, target: Money) -> Self {
        let primary = self.spend.primary.clone();
        self.spend.primary_default_target = target;
        for step in self.income.steps.iter_mut() {
            if let IncomeStep::SurvivalCut {
                bucket,
                default_target,
                ..
            } = step
            {
                if *bucket == primary {
                    *default_target = target;
                }
            }
        }
        for (bucket, restored) in self.reset.restored_targets.iter_mut() {
            if *bucket == primary {
                *restored = target;
            }
        }
        self
    }

    /// Checks the tables against a roster before any money moves.
    pub fn validate(&self, buckets: &BucketSet) -> Result<(), CoreError> {
        let require = |id: &BucketId| {
            if buckets.contains(id.as_str()) {
                Ok(())
            } else {
                Err(CoreError::BucketNotFound(id.to_string()))
            }
        };

        let mut sinks = 0;
        let mut filled = HashSet::new();
        for (index, step) in self.income.steps.iter().enumerate() {
            match step {
                IncomeStep::SurvivalCut {
                    bucket, rate_bps, ..
                } => {
                    require(bucket)?;
                    if *rate_bps > WHOLE_BPS {
                        return Err(CoreError::InvalidPolicy(format!(
                            "survival cut for `{bucket}` exceeds 100%"
                        )));
                    }
                }
                IncomeStep::Fill { bucket, .. } => {
                    require(bucket)?;
                    if !filled.insert(bucket.clone()) {
                        return Err(CoreError::InvalidPolicy(format!(
                            "`{bucket}` is filled more than once"
                        )));
                    }
                }
                IncomeStep::Split { shares } => {
                    if shares.is_empty() {
                        return Err(CoreError::InvalidPolicy("split has no shares".into()));
                    }
                    for share in shares {
                        require(&share.bucket)?;
                    }
                    let total: u32 = shares.iter().map(|share| share.ratio_bps).sum();
                    if total != WHOLE_BPS {
                        return Err(CoreError::InvalidPolicy(format!(
                            "split ratios sum to {} bps, expected {WHOLE_BPS}",
                            total
                        )));
                    }
                }
                IncomeStep::Sink { bucket } => {
                    require(bucket)?;
                    sinks += 1;
                    if index + 1 != self.income.steps.len() {
                        return Err(CoreError::InvalidPolicy(
                            "the sink must be the last income step".into(),
                        ));
                    }
                    if buckets
                        .get(bucket.as_str())
                        .map(|b| !b.is_uncapped())
                        .unwrap_or(false)
                    {
                        return Err(CoreError::InvalidPolicy(format!(
                            "sink `{bucket}` must be uncapped"
                        )));
                    }
                }
            }
        }
        if sinks != 1 {
            return Err(CoreError::InvalidPolicy(
                "income policy needs exactly one sink".into(),
            ));
        }

        require(&self.spend.primary)?;
        require(&self.spend.secondary)?;
        if self.spend.primary == self.spend.secondary {
            return Err(CoreError::InvalidPolicy(
                "spend primary and secondary must differ".into(),
            ));
        }
        for bucket in &self.bills {
            require(bucket)?;
        }
        for (bucket, _) in &self.reset.restored_targets {
            require(bucket)?;
        }
        Ok(())
    }
}
