//! Single-writer session holding the wallet snapshot and the active policy.

use std::path::Path;

use envelope_config::Config;
use envelope_core::{
    Advisory, AllocationPolicy, AllocationService, BillStatus, CoreError, DrainedTarget,
    MonthService, Movement, SummaryService,
};
use envelope_domain::{
    roster::reference_roster, BucketSet, Ledger, Money, MoneyParseError, Snapshot, Transaction,
};
use thiserror::Error;
use tracing::info;

use crate::{
    errors::BudgetError,
    gateway::{PersistenceGateway, SyncStatus, SyncWorker},
};

/// Failures surfaced by the command surface. Persistence never appears here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Insufficient funds: requested {requested}, only {available} available")]
    InsufficientFunds { requested: Money, available: Money },
    #[error("Unknown bucket `{0}`")]
    UnknownBucket(String),
    #[error("Month reset discards balances and history; confirmation required")]
    ConfirmationRequired,
    #[error("Policy error: {0}")]
    Policy(String),
}

impl From<CoreError> for SessionError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidAmount(message) => SessionError::InvalidInput(message),
            CoreError::InsufficientFunds {
                requested,
                available,
            } => SessionError::InsufficientFunds {
                requested,
                available,
            },
            CoreError::BucketNotFound(id) => SessionError::UnknownBucket(id),
            CoreError::InvalidPolicy(message) => SessionError::Policy(message),
        }
    }
}

impl From<MoneyParseError> for SessionError {
    fn from(err: MoneyParseError) -> Self {
        SessionError::InvalidInput(err.to_string())
    }
}

/// What a successful command changed.
#[derive(Debug, Clone)]
pub struct Receipt {
    /// Ledger entry recorded by income and spend; `None` for toggles and resets.
    pub transaction: Option<Transaction>,
    pub movements: Vec<Movement>,
}

/// Parses a user-entered amount and rejects anything not strictly positive.
pub fn parse_amount(input: &str) -> Result<Money, SessionError> {
    let amount = Money::parse(input)?;
    if !amount.is_positive() {
        return Err(SessionError::InvalidInput(format!(
            "amount must be greater than zero, got `{}`",
            input.trim()
        )));
    }
    Ok(amount)
}

/// Builds the allocation policy described by `config`.
pub fn policy_from_config(config: &Config) -> Result<AllocationPolicy, SessionError> {
    let amount = |field: &str, value: f64| {
        Money::from_f64(value)
            .filter(|money| !money.is_negative())
            .ok_or_else(|| SessionError::Policy(format!("`{field}` must be a non-negative amount")))
    };
    let threshold = amount("small_purchase_threshold", config.small_purchase_threshold)?;
    let daily_target = amount("daily_default_target", config.daily_default_target)?;
    let drained = if config.refill_drained_daily {
        DrainedTarget::Unset
    } else {
        DrainedTarget::Cap
    };

    Ok(AllocationPolicy::reference()
        .with_sink(config.overflow_bucket.trim())
        .with_spend_secondary(config.spend_secondary().trim())
        .with_small_purchase_threshold(threshold)
        .with_primary_default_target(daily_target)
        .with_drained_target(drained))
}

pub struct WalletSession {
    snapshot: Snapshot,
    policy: AllocationPolicy,
    sync: Option<SyncWorker>,
}

impl WalletSession {
    /// Session over `snapshot`; fails when `policy` does not fit its buckets.
    pub fn new(snapshot: Snapshot, policy: AllocationPolicy) -> Result<Self, SessionError> {
        policy.validate(&snapshot.buckets)?;
        Ok(Self {
            snapshot,
            policy,
            sync: None,
        })
    }

    /// Session over the reference roster with an empty ledger.
    pub fn fresh(policy: AllocationPolicy) -> Result<Self, SessionError> {
        Self::new(Snapshot::new(reference_roster(), Ledger::new()), policy)
    }

    pub fn with_sync(mut self, worker: SyncWorker) -> Self {
        self.sync = Some(worker);
        self
    }

    /// Loads the latest snapshot through `gateway` (or starts fresh) and hands
    /// the gateway to a background sync worker.
    pub fn open(gateway: PersistenceGateway, policy: AllocationPolicy) -> Result<Self, BudgetError> {
        let session = match gateway.load() {
            Some(snapshot) => {
                info!(
                    buckets = snapshot.buckets.len(),
                    transactions = snapshot.transactions.len(),
                    "wallet loaded"
                );
                Self::new(snapshot, policy)
            }
            None => {
                info!("no saved wallet; starting from the reference roster");
                Self::fresh(policy)
            }
        }
        .map_err(|err| BudgetError::Config(format!("wallet does not fit the allocation policy: {err}")))?;
        let worker = SyncWorker::spawn(gateway).map_err(|err| BudgetError::Store(err.into()))?;
        Ok(session.with_sync(worker))
    }

    /// Opens the wallet stored under `home` using the config found there.
    pub fn open_home(home: &Path, config: &Config) -> Result<Self, BudgetError> {
        config.validate()?;
        let policy =
            policy_from_config(config).map_err(|err| BudgetError::Config(err.to_string()))?;
        let gateway = PersistenceGateway::from_config(config, home)?;
        Self::open(gateway, policy)
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn policy(&self) -> &AllocationPolicy {
        &self.policy
    }

    pub fn record_income(
        &mut self,
        amount: Money,
        note: Option<&str>,
    ) -> Result<Receipt, SessionError> {
        let allocation =
            AllocationService::apply_income(&self.snapshot.buckets, amount, note, &self.policy)?;
        info!(amount = %amount, buckets = allocation.movements.len(), "income allocated");
        Ok(self.commit(allocation.buckets, allocation.transaction, allocation.movements))
    }

    pub fn record_spend(
        &mut self,
        amount: Money,
        note: Option<&str>,
    ) -> Result<Receipt, SessionError> {
        let allocation =
            AllocationService::apply_spend(&self.snapshot.buckets, amount, note, &self.policy)?;
        info!(amount = %amount, "spend recorded");
        Ok(self.commit(allocation.buckets, allocation.transaction, allocation.movements))
    }

    pub fn toggle_paid(&mut self, bucket_id: &str) -> Result<Receipt, SessionError> {
        let buckets = MonthService::toggle_paid(&self.snapshot.buckets, bucket_id)?;
        let paid = buckets
            .get(bucket_id)
            .map(|bucket| bucket.is_paid)
            .unwrap_or(false);
        info!(bucket = bucket_id, paid, "paid flag toggled");
        self.snapshot.buckets = buckets;
        self.persist();
        Ok(Receipt {
            transaction: None,
            movements: Vec::new(),
        })
    }

    /// Starts a new month. Refuses to run unless `confirmed`.
    pub fn reset_month(&mut self, confirmed: bool) -> Result<Receipt, SessionError> {
        if !confirmed {
            return Err(SessionError::ConfirmationRequired);
        }
        let next = MonthService::reset_month(&self.snapshot, &self.policy);
        let movements = self
            .snapshot
            .buckets
            .iter()
            .filter_map(|before| {
                let after = next.buckets.get(before.id.as_str())?;
                let delta = after.current - before.current;
                (!delta.is_zero()).then(|| Movement {
                    bucket: before.id.clone(),
                    delta,
                })
            })
            .collect();
        self.snapshot = next;
        if let Some(sync) = &self.sync {
            sync.save_reset(self.snapshot.buckets.clone());
        }
        Ok(Receipt {
            transaction: None,
            movements,
        })
    }

    pub fn total_balance(&self) -> Money {
        SummaryService::total_balance(&self.snapshot.buckets)
    }

    pub fn advisory(&self) -> Advisory {
        SummaryService::advisory(&self.snapshot.buckets, &self.policy)
    }

    pub fn bills(&self) -> Vec<BillStatus> {
        SummaryService::bills(&self.snapshot.buckets, &self.policy)
    }

    pub fn sync_status(&self) -> SyncStatus {
        self.sync
            .as_ref()
            .map(SyncWorker::status)
            .unwrap_or_default()
    }

    pub fn has_remote(&self) -> bool {
        self.sync
            .as_ref()
            .map(SyncWorker::has_remote)
            .unwrap_or(false)
    }

    /// Waits for queued saves and returns the resulting status.
    pub fn flush(&self) -> SyncStatus {
        self.sync
            .as_ref()
            .map(SyncWorker::flush)
            .unwrap_or_default()
    }

    fn commit(
        &mut self,
        buckets: BucketSet,
        transaction: Transaction,
        movements: Vec<Movement>,
    ) -> Receipt {
        self.snapshot.buckets = buckets;
        self.snapshot.transactions.record(transaction.clone());
        self.persist();
        Receipt {
            transaction: Some(transaction),
            movements,
        }
    }

    fn persist(&mut self) {
        self.snapshot.touch();
        if let Some(sync) = &self.sync {
            sync.save(self.snapshot.clone());
        }
    }
}
