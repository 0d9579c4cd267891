//! SQLite storage for recurring deposits.

mod model;
pub(crate) mod repository;

pub use model::{NewRecurringDepositDB, RecurringDepositDB};
pub use repository::RecurringDepositRepository;
