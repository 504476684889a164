//! envelope-core
//!
//! Allocation engine and services for the envelope wallet.
//! Depends on envelope-domain. No CLI, no terminal I/O, no direct storage interactions.

pub mod allocation_service;
pub mod error;
pub mod month_service;
pub mod policy;
pub mod storage;
pub mod summary_service;

pub use allocation_service::*;
pub use error::{CoreError, StoreError};
pub use month_service::*;
pub use policy::*;
pub use summary_service::*;

#[cfg(test)]
mod tests;
