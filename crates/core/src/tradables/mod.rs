//! Tradable positions module - stocks, crypto and custom tiles.

mod tradables_model;
mod tradables_service;
mod tradables_traits;


pub use tradables_model::*;
pub use tradables_service::TradableService;
pub use tradables_traits::{TradableRepositoryTrait, TradableServiceTrait};
