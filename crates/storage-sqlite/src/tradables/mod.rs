//! SQLite storage for tradable positions.

mod model;
pub(crate) mod repository;

pub use model::{NewTradablePositionDB, TradablePositionDB};
pub use repository::TradableRepository;
