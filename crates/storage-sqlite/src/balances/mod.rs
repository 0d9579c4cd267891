//! SQLite storage for cash accounts, other assets and savings goals.

mod model;
pub(crate) mod repository;

pub use model::{
    CashAccountDB, NewCashAccountDB, NewOtherAssetDB, NewSavingsGoalDB, OtherAssetDB,
    SavingsGoalDB,
};
pub use repository::BalancesRepository;
