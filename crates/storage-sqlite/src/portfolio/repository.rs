use log::debug;
use std::sync::Arc;

use crate::balances::repository::{load_cash_accounts, load_other_assets, load_savings_goals};
use crate::db::{get_connection, read_transaction, DbPool};
use crate::fixed_deposits::repository::{load_fixed_deposit, load_fixed_deposits};
use crate::mutual_funds::repository::{load_mutual_fund, load_mutual_funds};
use crate::recurring_deposits::repository::{load_recurring_deposit, load_recurring_deposits};
use crate::tradables::repository::{load_tradable_position, load_tradable_positions};
use wealthledger_core::errors::Result;
use wealthledger_core::instruments::{InstrumentClass, InstrumentRecord};
use wealthledger_core::portfolio::{PortfolioRepositoryTrait, PortfolioSnapshot};

/// Read-only view over every ledger table. Needs no writer.
pub struct PortfolioRepository {
    pool: Arc<DbPool>,
}

impl PortfolioRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        PortfolioRepository { pool }
    }
}

impl PortfolioRepositoryTrait for PortfolioRepository {
    fn load_snapshot(&self) -> Result<PortfolioSnapshot> {
        let snapshot = read_transaction(&self.pool, |conn| {
            let mut instruments: Vec<InstrumentRecord> = Vec::new();
            instruments.extend(
                load_fixed_deposits(conn)?
                    .into_iter()
                    .map(InstrumentRecord::FixedDeposit),
            );
            instruments.extend(
                load_mutual_funds(conn)?
                    .into_iter()
                    .map(InstrumentRecord::MutualFund),
            );
            instruments.extend(
                load_recurring_deposits(conn)?
                    .into_iter()
                    .map(InstrumentRecord::RecurringDeposit),
            );
            instruments.extend(
                load_tradable_positions(conn)?
                    .into_iter()
                    .map(InstrumentRecord::Tradable),
            );

            Ok(PortfolioSnapshot {
                instruments,
                cash_accounts: load_cash_accounts(conn)?,
                other_assets: load_other_assets(conn)?,
                savings_goals: load_savings_goals(conn)?,
            })
        })?;
        debug!(
            "Loaded portfolio snapshot with {} instruments",
            snapshot.instruments.len()
        );
        Ok(snapshot)
    }

    fn get_instrument(&self, class: InstrumentClass, instrument_id: i64) -> Result<InstrumentRecord> {
        let mut conn = get_connection(&self.pool)?;
        let record = match class {
            InstrumentClass::FixedDeposit => {
                InstrumentRecord::FixedDeposit(load_fixed_deposit(&mut conn, instrument_id)?)
            }
            InstrumentClass::MutualFund => {
                InstrumentRecord::MutualFund(load_mutual_fund(&mut conn, instrument_id)?)
            }
            InstrumentClass::RecurringDeposit => {
                InstrumentRecord::RecurringDeposit(load_recurring_deposit(&mut conn, instrument_id)?)
            }
            InstrumentClass::Tradable => {
                InstrumentRecord::Tradable(load_tradable_position(&mut conn, instrument_id)?)
            }
        };
        Ok(record)
    }
}
