//! Recurring deposits module.

mod recurring_deposits_model;
mod recurring_deposits_service;
mod recurring_deposits_traits;


pub use recurring_deposits_model::*;
pub use recurring_deposits_service::RecurringDepositService;
pub use recurring_deposits_traits::{RecurringDepositRepositoryTrait, RecurringDepositServiceTrait};
