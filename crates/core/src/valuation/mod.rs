//! Valuation module - pure calculators turning instrument snapshots into valuations.

mod valuation_calculator;
mod valuation_model;
mod valuation_traits;

pub use valuation_calculator::*;
pub use valuation_model::*;
pub use valuation_traits::ValuationCalculator;

#[cfg(test)]
mod valuation_tests;
