//! Lifecycle states and legal transitions for every instrument class.
//!
//! Each class has its own tagged status enum. Terminal variants carry the data
//! recorded at closure, so a closed deposit without a withdrawal amount (or an
//! ongoing one with it) cannot be constructed.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::instruments::InstrumentClass;

/// Mutating operations subject to lifecycle checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleOperation {
    Close,
    Pause,
    Resume,
    Redeem,
    ApplyInstallment,
    MarkInstallmentPaid,
    Sell,
    UpdateNav,
    Edit,
    AmendClosure,
}

impl LifecycleOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleOperation::Close => "close",
            LifecycleOperation::Pause => "pause",
            LifecycleOperation::Resume => "resume",
            LifecycleOperation::Redeem => "redeem",
            LifecycleOperation::ApplyInstallment => "apply an installment to",
            LifecycleOperation::MarkInstallmentPaid => "mark an installment paid on",
            LifecycleOperation::Sell => "sell",
            LifecycleOperation::UpdateNav => "update the NAV of",
            LifecycleOperation::Edit => "edit",
            LifecycleOperation::AmendClosure => "amend the closure of",
        }
    }
}

impl fmt::Display for LifecycleOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when an operation is not legal from the instrument's current state.
/// The instrument is left unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot {operation} a {class} in state {from}")]
pub struct StateTransitionError {
    pub class: InstrumentClass,
    pub from: &'static str,
    pub operation: LifecycleOperation,
}

/// Common behaviour of the per-class status enums.
pub trait LifecycleState {
    /// Instrument class this state machine belongs to.
    const CLASS: InstrumentClass;

    /// Stable upper-case label (also the persisted representation).
    fn label(&self) -> &'static str;

    /// Terminal states reject every value-changing mutation.
    fn is_terminal(&self) -> bool;

    fn reject(&self, operation: LifecycleOperation) -> StateTransitionError {
        let err = StateTransitionError {
            class: Self::CLASS,
            from: self.label(),
            operation,
        };
        log::warn!("Rejected lifecycle operation: {}", err);
        err
    }

    /// Descriptive edits are legal on every non-terminal state.
    fn ensure_editable(&self) -> Result<(), StateTransitionError> {
        if self.is_terminal() {
            return Err(self.reject(LifecycleOperation::Edit));
        }
        Ok(())
    }
}

// ============================================================================
// Fixed deposits: ongoing -> closed
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FixedDepositStatus {
    #[default]
    Ongoing,
    #[serde(rename_all = "camelCase")]
    Closed {
        actual_withdrawal: Decimal,
        closed_date: NaiveDate,
    },
}

impl LifecycleState for FixedDepositStatus {
    const CLASS: InstrumentClass = InstrumentClass::FixedDeposit;

    fn label(&self) -> &'static str {
        match self {
            FixedDepositStatus::Ongoing => "ONGOING",
            FixedDepositStatus::Closed { .. } => "CLOSED",
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self, FixedDepositStatus::Closed { .. })
    }
}

impl FixedDepositStatus {
    pub fn close(
        &self,
        actual_withdrawal: Decimal,
        closed_date: NaiveDate,
    ) -> Result<Self, StateTransitionError> {
        match self {
            FixedDepositStatus::Ongoing => Ok(FixedDepositStatus::Closed {
                actual_withdrawal,
                closed_date,
            }),
            FixedDepositStatus::Closed { .. } => Err(self.reject(LifecycleOperation::Close)),
        }
    }

    /// Corrects the recorded closure of an already-closed deposit.
    pub fn amend_closure(
        &self,
        actual_withdrawal: Decimal,
        closed_date: NaiveDate,
    ) -> Result<Self, StateTransitionError> {
        match self {
            FixedDepositStatus::Closed { .. } => Ok(FixedDepositStatus::Closed {
                actual_withdrawal,
                closed_date,
            }),
            FixedDepositStatus::Ongoing => Err(self.reject(LifecycleOperation::AmendClosure)),
        }
    }

    pub fn actual_withdrawal(&self) -> Option<Decimal> {
        match self {
            FixedDepositStatus::Closed {
                actual_withdrawal, ..
            } => Some(*actual_withdrawal),
            FixedDepositStatus::Ongoing => None,
        }
    }

    pub fn closed_date(&self) -> Option<NaiveDate> {
        match self {
            FixedDepositStatus::Closed { closed_date, .. } => Some(*closed_date),
            FixedDepositStatus::Ongoing => None,
        }
    }
}

// ============================================================================
// Unit-based positions: ongoing <-> paused -> redeemed
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MutualFundStatus {
    #[default]
    Ongoing,
    Paused,
    #[serde(rename_all = "camelCase")]
    Redeemed {
        redeemed_amount: Decimal,
        redeemed_date: NaiveDate,
    },
}

impl LifecycleState for MutualFundStatus {
    const CLASS: InstrumentClass = InstrumentClass::MutualFund;

    fn label(&self) -> &'static str {
        match self {
            MutualFundStatus::Ongoing => "ONGOING",
            MutualFundStatus::Paused => "PAUSED",
            MutualFundStatus::Redeemed { .. } => "REDEEMED",
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self, MutualFundStatus::Redeemed { .. })
    }
}

impl MutualFundStatus {
    pub fn pause(&self) -> Result<Self, StateTransitionError> {
        match self {
            MutualFundStatus::Ongoing => Ok(MutualFundStatus::Paused),
            _ => Err(self.reject(LifecycleOperation::Pause)),
        }
    }

    pub fn resume(&self) -> Result<Self, StateTransitionError> {
        match self {
            MutualFundStatus::Paused => Ok(MutualFundStatus::Ongoing),
            _ => Err(self.reject(LifecycleOperation::Resume)),
        }
    }

    /// Flips between the two non-terminal states.
    pub fn toggle_pause(&self) -> Result<Self, StateTransitionError> {
        match self {
            MutualFundStatus::Ongoing => self.pause(),
            MutualFundStatus::Paused => self.resume(),
            MutualFundStatus::Redeemed { .. } => Err(self.reject(LifecycleOperation::Pause)),
        }
    }

    pub fn redeem(
        &self,
        redeemed_amount: Decimal,
        redeemed_date: NaiveDate,
    ) -> Result<Self, StateTransitionError> {
        match self {
            MutualFundStatus::Ongoing | MutualFundStatus::Paused => {
                Ok(MutualFundStatus::Redeemed {
                    redeemed_amount,
                    redeemed_date,
                })
            }
            MutualFundStatus::Redeemed { .. } => Err(self.reject(LifecycleOperation::Redeem)),
        }
    }

    /// Ongoing positions take any installment; paused ones only lumpsum top-ups.
    pub fn ensure_accepts_installment(&self, recurring: bool) -> Result<(), StateTransitionError> {
        match self {
            MutualFundStatus::Ongoing => Ok(()),
            MutualFundStatus::Paused if !recurring => Ok(()),
            _ => Err(self.reject(LifecycleOperation::ApplyInstallment)),
        }
    }

    pub fn ensure_accepts_nav_update(&self) -> Result<(), StateTransitionError> {
        if self.is_terminal() {
            return Err(self.reject(LifecycleOperation::UpdateNav));
        }
        Ok(())
    }
}

// ============================================================================
// Recurring deposits: ongoing -> completed -> closed, ongoing -> closed
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurringDepositStatus {
    #[default]
    Ongoing,
    Completed,
    #[serde(rename_all = "camelCase")]
    Closed {
        actual_withdrawal: Decimal,
        closed_date: NaiveDate,
    },
}

impl LifecycleState for RecurringDepositStatus {
    const CLASS: InstrumentClass = InstrumentClass::RecurringDeposit;

    fn label(&self) -> &'static str {
        match self {
            RecurringDepositStatus::Ongoing => "ONGOING",
            RecurringDepositStatus::Completed => "COMPLETED",
            RecurringDepositStatus::Closed { .. } => "CLOSED",
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self, RecurringDepositStatus::Closed { .. })
    }
}

impl RecurringDepositStatus {
    /// Records one more paid installment. Returns the new status and paid count;
    /// paying the last installment moves the deposit to `Completed`.
    pub fn mark_installment_paid(
        &self,
        installments_paid: u32,
        total_installments: u32,
    ) -> Result<(Self, u32), StateTransitionError> {
        match self {
            RecurringDepositStatus::Ongoing if installments_paid < total_installments => {
                let paid = installments_paid + 1;
                let next = if paid == total_installments {
                    RecurringDepositStatus::Completed
                } else {
                    RecurringDepositStatus::Ongoing
                };
                Ok((next, paid))
            }
            _ => Err(self.reject(LifecycleOperation::MarkInstallmentPaid)),
        }
    }

    pub fn close(
        &self,
        actual_withdrawal: Decimal,
        closed_date: NaiveDate,
    ) -> Result<Self, StateTransitionError> {
        match self {
            RecurringDepositStatus::Ongoing | RecurringDepositStatus::Completed => {
                Ok(RecurringDepositStatus::Closed {
                    actual_withdrawal,
                    closed_date,
                })
            }
            RecurringDepositStatus::Closed { .. } => Err(self.reject(LifecycleOperation::Close)),
        }
    }

    pub fn actual_withdrawal(&self) -> Option<Decimal> {
        match self {
            RecurringDepositStatus::Closed {
                actual_withdrawal, ..
            } => Some(*actual_withdrawal),
            _ => None,
        }
    }
}

// ============================================================================
// Tradable positions: holding -> sold
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradableStatus {
    #[default]
    Holding,
    #[serde(rename_all = "camelCase")]
    Sold {
        sell_price: Decimal,
        sell_date: NaiveDate,
    },
}

impl LifecycleState for TradableStatus {
    const CLASS: InstrumentClass = InstrumentClass::Tradable;

    fn label(&self) -> &'static str {
        match self {
            TradableStatus::Holding => "HOLDING",
            TradableStatus::Sold { .. } => "SOLD",
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self, TradableStatus::Sold { .. })
    }
}

impl TradableStatus {
    pub fn sell(&self, sell_price: Decimal, sell_date: NaiveDate) -> Result<Self, StateTransitionError> {
        match self {
            TradableStatus::Holding => Ok(TradableStatus::Sold {
                sell_price,
                sell_date,
            }),
            TradableStatus::Sold { .. } => Err(self.reject(LifecycleOperation::Sell)),
        }
    }
}
