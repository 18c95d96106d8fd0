//! fintrack-core
//!
//! Ledger aggregation for fintrack: record normalization, grouping, insights.
//! Depends on fintrack-domain. No CLI, no terminal I/O, no storage interactions.

pub mod aggregate_service;
pub mod error;
pub mod insight_service;
pub mod normalize_service;
pub mod report_service;
pub mod time;

pub use aggregate_service::*;
pub use error::CoreError;
pub use insight_service::*;
pub use normalize_service::*;
pub use report_service::*;
pub use time::{Clock, FixedClock};
