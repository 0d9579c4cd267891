//! Consistent cross-class reads for the portfolio rollup.

mod repository;

pub use repository::PortfolioRepository;
