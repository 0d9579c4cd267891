//! Portfolio module - net worth rollup, class tiles and non-instrument balances.

mod balances_model;
mod balances_service;
mod portfolio_service;
mod portfolio_traits;
mod rollup_calculator;
mod rollup_model;

pub use balances_model::*;
pub use balances_service::BalancesService;
pub use portfolio_service::PortfolioService;
pub use portfolio_traits::{
    BalancesRepositoryTrait, BalancesServiceTrait, PortfolioRepositoryTrait,
    PortfolioServiceTrait,
};
pub use rollup_calculator::{rollup, summarize_class};
pub use rollup_model::*;

#[cfg(test)]
mod rollup_tests;
