#![doc(test(attr(deny(warnings))))]

//! Envelope Budget distributes income across fixed-purpose buckets through an
//! ordered policy table, draws spending from a two-tier source rule, and keeps
//! the wallet snapshot synced to a local cache and an optional remote store.

pub mod cli;
pub mod currency;
pub mod errors;
pub mod gateway;
pub mod session;
pub mod utils;

pub use errors::BudgetError;
pub use gateway::{PersistenceGateway, SyncStatus};
pub use session::{Receipt, SessionError, WalletSession};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Envelope Budget tracing initialized.");
    });
}
