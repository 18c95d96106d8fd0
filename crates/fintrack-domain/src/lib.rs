//! fintrack-domain
//!
//! Pure domain models (ledger entries, kinds, report policies, derived rows).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod common;
pub mod entry;
pub mod policy;
pub mod report;

pub use common::*;
pub use entry::*;
pub use policy::*;
pub use report::*;
