//! Wealthledger Core - valuation and temporal aggregation engine.
//!
//! This crate contains the domain models, lifecycle rules, valuation calculators,
//! spending buckets and portfolio rollup. It is database-agnostic and defines
//! traits that are implemented by the `storage-sqlite` and `market-data` crates.

pub mod constants;
pub mod errors;
pub mod fixed_deposits;
pub mod instruments;
pub mod lifecycle;
pub mod market_data;
pub mod mutual_funds;
pub mod portfolio;
pub mod recurring_deposits;
pub mod settings;
pub mod spending;
pub mod tradables;
pub mod utils;
pub mod valuation;

// Re-export the cross-class types
pub use instruments::*;
pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
