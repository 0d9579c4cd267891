//! SQLite storage for unit-based positions and their installment ledger.

mod model;
pub(crate) mod repository;

pub use model::{InstallmentDB, MutualFundDB, NewInstallmentDB, NewMutualFundDB};
pub use repository::MutualFundRepository;
