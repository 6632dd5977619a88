//! cashflow-domain
//!
//! Pure records for the cash-flow ledger (series, one-offs, checkpoints, overrides)
//! and the value types they are built from. No I/O, no storage, no CLI.

pub mod cadence;
pub mod checkpoint;
pub mod common;
pub mod ledger;
pub mod money;
pub mod overrides;
pub mod profile;
pub mod transaction;
pub mod window;

pub use cadence::*;
pub use checkpoint::*;
pub use common::*;
pub use ledger::*;
pub use money::*;
pub use overrides::*;
pub use profile::*;
pub use transaction::*;
pub use window::*;
