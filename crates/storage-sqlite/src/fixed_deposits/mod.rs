//! SQLite storage for fixed deposits.

mod model;
pub(crate) mod repository;

pub use model::{FixedDepositDB, NewFixedDepositDB};
pub use repository::FixedDepositRepository;
