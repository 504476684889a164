//! envelope-domain
//!
//! Pure domain models (Money, Bucket, Transaction, Ledger, Snapshot).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod bucket;
pub mod common;
pub mod ledger;
pub mod money;
pub mod roster;
pub mod snapshot;
pub mod transaction;

pub use bucket::*;
pub use common::*;
pub use ledger::*;
pub use money::*;
pub use snapshot::*;
pub use transaction::*;
