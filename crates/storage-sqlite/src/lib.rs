//! SQLite ledger store for the wealth ledger engine.
//!
//! Implements the repository traits of `wealthledger-core` with Diesel over
//! SQLite:
//! - r2d2 connection pool for reads
//! - one writer actor that runs every write in an immediate transaction
//! - embedded migrations
//! - row models that keep decimals and dates as TEXT
//!
//! ```text
//! core services ──> repository traits ──> this crate ──> SQLite
//! ```

pub mod db;
pub mod errors;
pub mod schema;
mod utils;

// Repository implementations
pub mod balances;
pub mod fixed_deposits;
pub mod mutual_funds;
pub mod portfolio;
pub mod recurring_deposits;
pub mod settings;
pub mod spending;
pub mod tradables;

pub use db::{
    create_pool, get_connection, get_db_path, init, open, read_transaction, run_migrations,
    spawn_writer, DbConnection, DbPool, WriteHandle,
};

pub use errors::{IntoCore, StorageError};

pub use balances::BalancesRepository;
pub use fixed_deposits::FixedDepositRepository;
pub use mutual_funds::MutualFundRepository;
pub use portfolio::PortfolioRepository;
pub use recurring_deposits::RecurringDepositRepository;
pub use settings::SettingsRepository;
pub use spending::ExpenseRepository;
pub use tradables::TradableRepository;

pub use wealthledger_core::errors::{DatabaseError, Error, Result};
