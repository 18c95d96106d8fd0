#![doc(test(attr(deny(warnings))))]

//! fintrack records income and expense entries through a document store and
//! turns live snapshots of them into reports: totals, category breakdowns,
//! per-date series, and daily averages.

pub mod auth;
pub mod cli;
pub mod errors;
pub mod intake;
pub mod render;
pub mod session;
pub mod store;
pub mod utils;

pub use fintrack_config as config;
pub use fintrack_core as reporting;
pub use fintrack_domain as domain;

/// Initializes global tracing. Safe to call more than once.
pub fn init() {
    utils::init_tracing();
}
