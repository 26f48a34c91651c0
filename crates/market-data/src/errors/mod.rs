//! Error types for the market data crate.
//!
//! This module provides [`MarketDataError`], the error enum shared by every
//! remote collaborator (Lotus node, miner registries, exchange-rate source).

use thiserror::Error;

/// Errors that can occur while talking to a remote market data source.
///
/// Callers decide how to react using [`is_timeout`](Self::is_timeout): the
/// batch fetcher treats a timeout on a single miner as a soft skip, while a
/// failing registry aborts the whole cycle.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The request to the provider timed out (connection aborted or deadline hit).
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// A provider-specific error occurred (HTTP status, unreadable body).
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The JSON-RPC endpoint answered with an error object.
    #[error("RPC error {code} from {method}: {message}")]
    Rpc {
        /// JSON-RPC method that failed
        method: String,
        /// Error code reported by the node
        code: i64,
        /// Error message reported by the node
        message: String,
    },

    /// The response could not be decoded into the expected shape.
    #[error("Invalid response from {provider}: {message}")]
    InvalidResponse {
        /// The provider that sent the response
        provider: String,
        /// What went wrong while decoding
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Build an error from a failed `reqwest` send, keeping timeouts distinct.
    pub fn from_request(provider: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                provider: provider.to_string(),
            }
        } else {
            Self::ProviderError {
                provider: provider.to_string(),
                message: format!("Request failed: {}", error),
            }
        }
    }

    /// Whether the failure is a transport timeout.
    ///
    /// Timeouts are expected when a miner's libp2p endpoint is unreachable
    /// and are logged as a skip rather than as a failure.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Network(e) => e.is_timeout(),
            _ => false,
        }
    }
}
