//! Market data module - price sources and the sequential bulk refresh.

mod price_refresh_service;
mod price_refresh_traits;
mod price_source_model;

pub use price_refresh_service::PriceRefreshService;
pub use price_refresh_traits::{PriceRefreshServiceTrait, PriceResolverTrait};
pub use price_source_model::{PriceSource, RefreshFailure, RefreshSummary};

#[cfg(test)]
mod price_refresh_service_tests;
