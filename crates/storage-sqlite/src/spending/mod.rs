//! SQLite storage for the expense ledger and its tags.

mod model;
mod repository;

pub use model::{ExpenseDB, ExpenseExclusionTagDB, ExpenseTagDB, NewExpenseDB, NewExpenseTagDB};
pub use repository::ExpenseRepository;
