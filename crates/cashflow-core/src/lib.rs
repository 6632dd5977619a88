//! cashflow-core
//!
//! Ledger algorithms and profile services: occurrence expansion, aggregation,
//! override application, daily balances, calibration, checkpoint
//! reconciliation and provisions.
//! Depends on cashflow-domain. No CLI, no terminal I/O, no direct storage interactions.

pub mod aggregation;
pub mod balance;
pub mod calibration;
pub mod error;
pub mod occurrence;
pub mod overrides;
pub mod profile_service;
pub mod provision;
pub mod reconciliation;
pub mod storage;
pub mod summary;
pub mod time;
pub mod view;

#[cfg(test)]
mod tests;

pub use aggregation::*;
pub use balance::*;
pub use calibration::*;
pub use error::CoreError;
pub use occurrence::*;
pub use overrides::*;
pub use profile_service::*;
pub use provision::*;
pub use reconciliation::*;
pub use summary::*;
pub use view::*;
