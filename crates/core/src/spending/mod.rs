//! Spending module - expense ledger, temporal bucketing and heatmaps.

mod bucket_model;
pub mod bucketing;
mod heatmap;
mod spending_model;
mod spending_service;
mod spending_traits;


pub use bucket_model::*;
pub use bucketing::{bucket_expenses, month_days, thursday_week, weekday_index, weekly_buckets};
pub use heatmap::{heatmap_cells, HeatmapBand, HeatmapCell};
pub use spending_model::*;
pub use spending_service::SpendingService;
pub use spending_traits::{ExpenseRepositoryTrait, SpendingServiceTrait};
