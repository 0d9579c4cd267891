//! Per-class valuation calculators.
//!
//! Calculators are pure: they read an instrument snapshot and an "as of" date and
//! never touch the ledger.

use chrono::NaiveDate;
use log::warn;
use num_traits::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};

use super::valuation_model::Valuation;
use super::valuation_traits::ValuationCalculator;
use crate::constants::{DECIMAL_PRECISION, MAX_TOTAL_INSTALLMENTS};
use crate::fixed_deposits::FixedDeposit;
use crate::instruments::{InstrumentDetail, InstrumentRecord};
use crate::lifecycle::{FixedDepositStatus, RecurringDepositStatus, TradableStatus};
use crate::mutual_funds::MutualFund;
use crate::recurring_deposits::RecurringDeposit;
use crate::settings::{EngineSettings, InterestMode, RdCompounding};
use crate::tradables::TradablePosition;

const QUARTERS_PER_YEAR: u32 = 4;

fn percent_to_rate(percent: Decimal) -> Decimal {
    percent / Decimal::ONE_HUNDRED
}

/// `principal * (1 + rate * days / basis)`, `None` on overflow.
fn simple_interest(
    principal: Decimal,
    annual_rate: Decimal,
    days: Decimal,
    day_count_basis: Decimal,
) -> Option<Decimal> {
    annual_rate
        .checked_mul(days)?
        .checked_div(day_count_basis)?
        .checked_add(Decimal::ONE)?
        .checked_mul(principal)
}

/// `principal * (1 + rate/n)^whole_periods * (1 + rate * remaining_days / basis)`.
///
/// Whole periods are compounded, the trailing partial period earns simple interest.
/// Falls back to simple interest over the whole term when compounding overflows, and
/// returns `None` only when that overflows too.
fn compound_with_simple_remainder(
    principal: Decimal,
    annual_rate: Decimal,
    periods_per_year: u32,
    days: Decimal,
    day_count_basis: Decimal,
) -> Option<Decimal> {
    let period_days = day_count_basis / Decimal::from(periods_per_year);
    let whole = days.checked_div(period_days)?.floor();
    let remaining_days = days - whole * period_days;
    let growth = Decimal::ONE + annual_rate / Decimal::from(periods_per_year);

    let compounded = whole
        .to_u64()
        .and_then(|n| growth.checked_powu(n))
        .and_then(|g| principal.checked_mul(g))
        .and_then(|value| simple_interest(value, annual_rate, remaining_days, day_count_basis));
    if compounded.is_some() {
        return compounded;
    }
    warn!(
        "Compounding overflow over {} days; falling back to simple interest",
        days
    );
    simple_interest(principal, annual_rate, days, day_count_basis)
}

// ============================================================================
// Fixed deposits
// ============================================================================

/// Values fixed-term deposits. Before maturity the deposit is carried at cost.
#[derive(Debug, Clone, Copy)]
pub struct FixedTermCalculator {
    pub interest_mode: InterestMode,
    pub day_count_basis: u32,
}

impl FixedTermCalculator {
    pub fn new(interest_mode: InterestMode, day_count_basis: u32) -> Self {
        Self {
            interest_mode,
            day_count_basis: day_count_basis.max(1),
        }
    }

    /// Contracted payout at maturity.
    pub fn expected_withdrawal(&self, deposit: &FixedDeposit) -> Decimal {
        let principal = deposit.invested_amount;
        let rate = percent_to_rate(deposit.interest_rate);
        let days = Decimal::from(deposit.term_days().max(0));
        let basis = Decimal::from(self.day_count_basis);

        let value = match self.interest_mode.periods_per_year() {
            None => simple_interest(principal, rate, days, basis),
            Some(n) => compound_with_simple_remainder(principal, rate, n, days, basis),
        };
        value
            .unwrap_or_else(|| {
                warn!(
                    "Maturity of fixed deposit {} overflows; carrying it at cost",
                    deposit.id
                );
                principal
            })
            .round_dp(DECIMAL_PRECISION)
    }
}

impl ValuationCalculator<FixedDeposit> for FixedTermCalculator {
    fn value(&self, deposit: &FixedDeposit, as_of: NaiveDate) -> Valuation {
        let expected = self.expected_withdrawal(deposit);
        let current = match &deposit.status {
            FixedDepositStatus::Closed {
                actual_withdrawal, ..
            } => *actual_withdrawal,
            FixedDepositStatus::Ongoing if deposit.is_matured(as_of) => expected,
            FixedDepositStatus::Ongoing => deposit.invested_amount,
        };
        Valuation::new(deposit.invested_amount, current, Some(expected))
    }
}

// ============================================================================
// Unit-based positions
// ============================================================================

/// Values unit-based positions at `units * NAV`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitBasedCalculator;

impl ValuationCalculator<MutualFund> for UnitBasedCalculator {
    fn value(&self, fund: &MutualFund, _as_of: NaiveDate) -> Valuation {
        Valuation::new(
            fund.total_invested,
            fund.total_units.saturating_mul(fund.current_nav),
            None,
        )
    }
}

// ============================================================================
// Recurring deposits
// ============================================================================

/// Values recurring deposits against their contracted installment schedule.
#[derive(Debug, Clone, Copy)]
pub struct InstallmentCalculator {
    pub compounding: RdCompounding,
    pub day_count_basis: u32,
}

impl InstallmentCalculator {
    pub fn new(compounding: RdCompounding, day_count_basis: u32) -> Self {
        Self {
            compounding,
            day_count_basis: day_count_basis.max(1),
        }
    }

    /// Contracted maturity value. Depends only on the schedule, never on how many
    /// installments have actually been paid.
    ///
    /// A schedule whose interest overflows is carried at its total contributions.
    pub fn maturity_value(&self, deposit: &RecurringDeposit) -> Decimal {
        let value = if deposit.total_installments > MAX_TOTAL_INSTALLMENTS {
            None
        } else {
            match self.compounding {
                RdCompounding::PerInstallment => self.per_installment_maturity(deposit),
                RdCompounding::Quarterly => self.quarterly_maturity(deposit),
            }
        };
        match value {
            Some(value) => value.round_dp(DECIMAL_PRECISION),
            None => {
                warn!(
                    "Maturity of recurring deposit {} ({} installments) is out of range; \
                     using total contributions",
                    deposit.id, deposit.total_installments
                );
                deposit
                    .installment_amount
                    .checked_mul(Decimal::from(deposit.total_installments))
                    .unwrap_or(Decimal::MAX)
            }
        }
    }

    fn per_installment_maturity(&self, deposit: &RecurringDeposit) -> Option<Decimal> {
        let periods = deposit.frequency.periods_per_year(self.day_count_basis);
        let growth = Decimal::ONE + percent_to_rate(deposit.interest_rate).checked_div(periods)?;

        // Installment k (1-based from the last) earns interest for k periods.
        let mut factor = Decimal::ONE;
        let mut sum = Decimal::ZERO;
        for _ in 0..deposit.total_installments {
            factor = factor.checked_mul(growth)?;
            sum = sum.checked_add(factor)?;
        }
        deposit.installment_amount.checked_mul(sum)
    }

    fn quarterly_maturity(&self, deposit: &RecurringDeposit) -> Option<Decimal> {
        let basis = Decimal::from(self.day_count_basis);
        let period_days = deposit.frequency.period_days(self.day_count_basis);
        let rate = percent_to_rate(deposit.interest_rate);
        let n = deposit.total_installments;

        (1..=n).try_fold(Decimal::ZERO, |total, k| {
            let held_days = Decimal::from(n - k + 1).checked_mul(period_days)?;
            let value = compound_with_simple_remainder(
                deposit.installment_amount,
                rate,
                QUARTERS_PER_YEAR,
                held_days,
                basis,
            )?;
            total.checked_add(value)
        })
    }
}

impl ValuationCalculator<RecurringDeposit> for InstallmentCalculator {
    fn value(&self, deposit: &RecurringDeposit, as_of: NaiveDate) -> Valuation {
        let maturity = self.maturity_value(deposit);
        let invested = deposit.total_invested();
        let current = match &deposit.status {
            RecurringDepositStatus::Closed {
                actual_withdrawal, ..
            } => *actual_withdrawal,
            RecurringDepositStatus::Completed
                if deposit.maturity_date().is_some_and(|m| as_of >= m) =>
            {
                maturity
            }
            _ => invested,
        };
        Valuation::new(invested, current, Some(maturity))
    }
}

// ============================================================================
// Tradable positions
// ============================================================================

/// Values tradable positions at the last known price, or the sale price once sold.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkToMarketCalculator;

impl ValuationCalculator<TradablePosition> for MarkToMarketCalculator {
    fn value(&self, position: &TradablePosition, _as_of: NaiveDate) -> Valuation {
        let price = match &position.status {
            TradableStatus::Sold { sell_price, .. } => *sell_price,
            TradableStatus::Holding => position.current_price,
        };
        Valuation::new(
            position.invested_value(),
            position.quantity.saturating_mul(price),
            None,
        )
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// The four calculators configured from engine settings.
#[derive(Debug, Clone, Copy)]
pub struct ValuationEngine {
    pub fixed_term: FixedTermCalculator,
    pub unit_based: UnitBasedCalculator,
    pub installment: InstallmentCalculator,
    pub mark_to_market: MarkToMarketCalculator,
}

impl ValuationEngine {
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            fixed_term: FixedTermCalculator::new(
                settings.fd_interest_mode,
                settings.day_count_basis,
            ),
            unit_based: UnitBasedCalculator,
            installment: InstallmentCalculator::new(
                settings.rd_compounding,
                settings.day_count_basis,
            ),
            mark_to_market: MarkToMarketCalculator,
        }
    }

    pub fn value(&self, record: &InstrumentRecord, as_of: NaiveDate) -> Valuation {
        match record {
            InstrumentRecord::FixedDeposit(fd) => self.fixed_term.value(fd, as_of),
            InstrumentRecord::MutualFund(mf) => self.unit_based.value(mf, as_of),
            InstrumentRecord::RecurringDeposit(rd) => self.installment.value(rd, as_of),
            InstrumentRecord::Tradable(tp) => self.mark_to_market.value(tp, as_of),
        }
    }

    pub fn detail(&self, record: InstrumentRecord, as_of: NaiveDate) -> InstrumentDetail {
        let valuation = self.value(&record, as_of);
        InstrumentDetail::new(record, valuation)
    }
}

impl Default for ValuationEngine {
    fn default() -> Self {
        Self::new(&EngineSettings::default())
    }
}
