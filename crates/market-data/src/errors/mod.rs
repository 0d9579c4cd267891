//! Error types and retry classification for price lookups.

mod retry;

pub use retry::RetryClass;

use thiserror::Error;
use wealthledger_core::errors::Error as CoreError;

/// Errors that can occur while looking up a price.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The provider does not know the identifier.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// HTTP 429 or an exhausted quota.
    #[error("Rate limited: {provider}")]
    RateLimited { provider: String },

    #[error("Timeout: {provider}")]
    Timeout { provider: String },

    #[error("Provider error: {provider} - {message}")]
    ProviderError { provider: String, message: String },

    /// The provider answered with a price that cannot be used.
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::RateLimited { .. } | Self::Timeout { .. } => RetryClass::WithBackoff,
            Self::SymbolNotFound(_)
            | Self::ProviderError { .. }
            | Self::ValidationFailed { .. }
            | Self::Network(_) => RetryClass::Never,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SymbolNotFound(_))
    }
}

impl From<MarketDataError> for CoreError {
    fn from(err: MarketDataError) -> Self {
        CoreError::ExternalLookup(err.to_string())
    }
}
