//! Mutual funds module - unit-based positions with an append-only installment ledger.

mod mutual_funds_model;
mod mutual_funds_service;
mod mutual_funds_traits;


pub use mutual_funds_model::*;
pub use mutual_funds_service::MutualFundService;
pub use mutual_funds_traits::{MutualFundRepositoryTrait, MutualFundServiceTrait};
