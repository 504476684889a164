use std::io;

use envelope_domain::Money;
use thiserror::Error;

/// Failures of the allocation domain. Always reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: Money, available: Money },
    #[error("Bucket not found: {0}")]
    BucketNotFound(String),
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),
}

/// Failures of a persistence backend. Contained at the gateway boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("Remote store unreachable: {0}")]
    Unreachable(String),
    #[error("Remote store rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Remote store misconfigured: {0}")]
    Configuration(String),
}
