//! Valuation calculator trait.

use chrono::NaiveDate;

use super::Valuation;

/// Maps an instrument snapshot and an "as of" date to its valuation.
/// Implementations are deterministic and perform no I/O.
pub trait ValuationCalculator<I> {
    fn value(&self, instrument: &I, as_of: NaiveDate) -> Valuation;
}
