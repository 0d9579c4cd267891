//! Fixed deposits module - terms, lifecycle operations and service.

mod fixed_deposits_model;
mod fixed_deposits_service;
mod fixed_deposits_traits;


pub use fixed_deposits_model::*;
pub use fixed_deposits_service::FixedDepositService;
pub use fixed_deposits_traits::{FixedDepositRepositoryTrait, FixedDepositServiceTrait};
