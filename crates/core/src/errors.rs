//! Core error types for the FilMarket pipeline.
//!
//! Only failures that should end the process travel as [`Error`]. Per-miner
//! problems are modelled as outcomes in the fetcher, and data-quality problems
//! as [`NormalizeError`](crate::pricing::NormalizeError) and
//! [`AggregationError`](crate::aggregation::AggregationError), which are logged
//! and dropped where they occur.

use filmarket_market_data::MarketDataError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the pipeline.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Registry '{registry}' failed: {source}")]
    Registry {
        registry: String,
        #[source]
        source: MarketDataError,
    },

    #[error("Invalid exchange rate: {0}")]
    InvalidExchangeRate(String),

    #[error("Failed to emit report: {0}")]
    Report(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Report(err.to_string())
    }
}
