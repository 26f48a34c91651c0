//! CoinMarketCap exchange-rate provider.
//!
//! Uses the `/v1/cryptocurrency/quotes/latest` endpoint to read the FIL price
//! in the reference currency (USD by default).
//! API documentation: https://coinmarketcap.com/api/documentation/v1/

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use serde::Deserialize;

use crate::errors::MarketDataError;
use crate::provider::ExchangeRateProvider;

const BASE_URL: &str = "https://pro-api.coinmarketcap.com";
const PROVIDER_ID: &str = "COINMARKETCAP";
const SYMBOL: &str = "FIL";

// ============================================================================
// API Response Structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct QuotesResponse {
    #[serde(default)]
    data: HashMap<String, AssetEntry>,
}

#[derive(Debug, Deserialize)]
struct AssetEntry {
    #[serde(default)]
    quote: HashMap<String, QuoteEntry>,
}

#[derive(Debug, Deserialize)]
struct QuoteEntry {
    price: Option<f64>,
}

/// Pull `data.<symbol>.quote.<convert>.price` out of a response body.
fn extract_price(text: &str, convert: &str) -> Result<Option<f64>, MarketDataError> {
    let response: QuotesResponse =
        serde_json::from_str(text).map_err(|e| MarketDataError::InvalidResponse {
            provider: PROVIDER_ID.to_string(),
            message: format!("Failed to parse quotes response: {}", e),
        })?;

    Ok(response
        .data
        .get(SYMBOL)
        .and_then(|asset| asset.quote.get(convert))
        .and_then(|quote| quote.price))
}

// ============================================================================
// CoinMarketCapProvider
// ============================================================================

/// CoinMarketCap FIL price source.
pub struct CoinMarketCapProvider {
    client: Client,
    api_key: String,
    base_url: String,
    convert: String,
}

impl CoinMarketCapProvider {
    /// Create a provider quoting FIL in USD.
    pub fn new(api_key: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            base_url: BASE_URL.to_string(),
            convert: "USD".to_string(),
        }
    }

    /// Override the API base URL (sandbox or proxy).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl ExchangeRateProvider for CoinMarketCapProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_fil_price(&self) -> Result<Option<f64>, MarketDataError> {
        let url = format!("{}/v1/cryptocurrency/quotes/latest", self.base_url);

        debug!("CoinMarketCap request: {} -> {}", SYMBOL, self.convert);

        let response = self
            .client
            .get(&url)
            .header("X-CMC_PRO_API_KEY", &self.api_key)
            .query(&[("symbol", SYMBOL), ("convert", self.convert.as_str())])
            .send()
            .await
            .map_err(|e| MarketDataError::from_request(PROVIDER_ID, e))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: "Invalid or missing API key".to_string(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| MarketDataError::from_request(PROVIDER_ID, e))?;

        if !status.is_success() {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {} - {}", status, text),
            });
        }

        let price = extract_price(&text, &self.convert)?;
        match price {
            Some(p) => info!("{} price {} {}", SYMBOL, p, self.convert),
            None => warn!("{} price missing from response: {}", SYMBOL, text),
        }
        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_id() {
        let provider = CoinMarketCapProvider::new("key".to_string(), Duration::from_secs(5));
        assert_eq!(provider.id(), "COINMARKETCAP");
    }

    #[test]
    fn test_extract_price() {
        let text = r#"{"status":{"error_code":0},"data":{"FIL":{"id":2280,"quote":{"USD":{"price":5.4321,"volume_24h":1}}}}}"#;
        assert_eq!(extract_price(text, "USD").unwrap(), Some(5.4321));
    }

    #[test]
    fn test_extract_price_missing_symbol() {
        let text = r#"{"status":{"error_code":400},"data":{}}"#;
        assert_eq!(extract_price(text, "USD").unwrap(), None);
    }

    #[test]
    fn test_extract_price_other_currency() {
        let text = r#"{"data":{"FIL":{"quote":{"EUR":{"price":4.9}}}}}"#;
        assert_eq!(extract_price(text, "USD").unwrap(), None);
        assert_eq!(extract_price(text, "EUR").unwrap(), Some(4.9));
    }

    #[test]
    fn test_extract_price_null() {
        let text = r#"{"data":{"FIL":{"quote":{"USD":{"price":null}}}}}"#;
        assert_eq!(extract_price(text, "USD").unwrap(), None);
    }
}
