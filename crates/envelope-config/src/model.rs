use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Marker left in credentials copied from a template connection string.
pub const PLACEHOLDER_MARKER: &str = "<YOUR_PASSWORD>";

/// User-configurable wallet preferences.
///
/// Amounts are plain currency units here (`100.0`); the root crate converts them
/// into exact minor units when building the allocation policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    /// Base URL of the remote document store. `None` keeps the wallet local-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_endpoint: Option<String>,
    #[serde(default = "Config::default_remote_timeout_secs")]
    pub remote_timeout_secs: u64,
    #[serde(default = "Config::default_overflow_bucket")]
    pub overflow_bucket: String,
    /// Source drawn after the daily allowance. Falls back to `overflow_bucket`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spend_secondary_bucket: Option<String>,
    #[serde(default = "Config::default_small_purchase_threshold")]
    pub small_purchase_threshold: f64,
    #[serde(default = "Config::default_daily_target")]
    pub daily_default_target: f64,
    /// Treat a daily target spent down to zero as unset, so income refills it
    /// toward `daily_default_target` before the month ends.
    #[serde(default)]
    pub refill_drained_daily: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            remote_endpoint: None,
            remote_timeout_secs: Self::default_remote_timeout_secs(),
            overflow_bucket: Self::default_overflow_bucket(),
            spend_secondary_bucket: None,
            small_purchase_threshold: Self::default_small_purchase_threshold(),
            daily_default_target: Self::default_daily_target(),
            refill_drained_daily: false,
        }
    }
}

impl Config {
    pub fn default_remote_timeout_secs() -> u64 {
        10
    }

    pub fn default_overflow_bucket() -> String {
        "savings".into()
    }

    pub fn default_small_purchase_threshold() -> f64 {
        100.0
    }

    pub fn default_daily_target() -> f64 {
        600.0
    }

    pub fn spend_secondary(&self) -> &str {
        self.spend_secondary_bucket
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or(&self.overflow_bucket)
    }

    /// Remote endpoint with surrounding whitespace removed; blank counts as unset.
    pub fn remote(&self) -> Option<&str> {
        self.remote_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Checks values that would otherwise only fail once the engine runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.overflow_bucket.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "overflow_bucket",
                reason: "must name a bucket".into(),
            });
        }
        for (field, value) in [
            ("small_purchase_threshold", self.small_purchase_threshold),
            ("daily_default_target", self.daily_default_target),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("expected a non-negative amount, got {value}"),
                });
            }
        }
        if self.remote_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "remote_timeout_secs",
                reason: "must be at least one second".into(),
            });
        }
        if let Some(url) = self.remote() {
            if url.contains(PLACEHOLDER_MARKER) {
                return Err(ConfigError::Invalid {
                    field: "remote_endpoint",
                    reason: "still contains the credential placeholder".into(),
                });
            }
        }
        Ok(())
    }
}
