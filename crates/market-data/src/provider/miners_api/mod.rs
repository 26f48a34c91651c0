//! Miner registry HTTP clients.
//!
//! Two registries are supported, each with its own record schema:
//! - Filecoin Green: `{ "miner": "f01234", ... }`
//! - Reputation system (filrep): `{ "address": "f01234", "isoCode": "DE", ... }`
//!
//! Both APIs either return a bare JSON array or wrap it as `{ "miners": [...] }`.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::errors::MarketDataError;
use crate::models::RegistryRecord;
use crate::provider::MinerRegistry;

// ============================================================================
// API Response Structures
// ============================================================================

/// Either a bare list or a `{ "miners": [...] }` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MinersEnvelope<T> {
    List(Vec<T>),
    Wrapped { miners: Vec<T> },
}

impl<T> MinersEnvelope<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::List(items) => items,
            Self::Wrapped { miners } => miners,
        }
    }
}

/// Filecoin Green record
#[derive(Debug, Deserialize)]
struct GreenMiner {
    miner: String,
}

/// Reputation system record
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReputationMiner {
    address: String,
    #[serde(default)]
    iso_code: Option<String>,
}

impl From<GreenMiner> for RegistryRecord {
    fn from(m: GreenMiner) -> Self {
        RegistryRecord::new(m.miner)
    }
}

impl From<ReputationMiner> for RegistryRecord {
    fn from(m: ReputationMiner) -> Self {
        RegistryRecord {
            miner: m.address,
            location: m.iso_code.filter(|code| !code.trim().is_empty()),
        }
    }
}

// ============================================================================
// Clients
// ============================================================================

/// Shared GET + decode for both registries.
async fn fetch_records<T>(
    client: &Client,
    provider: &str,
    url: &str,
) -> Result<Vec<RegistryRecord>, MarketDataError>
where
    T: DeserializeOwned + Into<RegistryRecord>,
{
    debug!("{} request: {}", provider, url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| MarketDataError::from_request(provider, e))?;

    let status = response.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(MarketDataError::RateLimited {
            provider: provider.to_string(),
        });
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(MarketDataError::ProviderError {
            provider: provider.to_string(),
            message: format!("HTTP {} - {}", status, body),
        });
    }

    let text = response
        .text()
        .await
        .map_err(|e| MarketDataError::from_request(provider, e))?;

    let records = parse_records::<T>(provider, &text)?;
    info!("{} returned {} miners", provider, records.len());
    Ok(records)
}

fn parse_records<T>(provider: &str, text: &str) -> Result<Vec<RegistryRecord>, MarketDataError>
where
    T: DeserializeOwned + Into<RegistryRecord>,
{
    let envelope: MinersEnvelope<T> =
        serde_json::from_str(text).map_err(|e| MarketDataError::InvalidResponse {
            provider: provider.to_string(),
            message: format!("Failed to parse miners response: {}", e),
        })?;

    Ok(envelope.into_vec().into_iter().map(Into::into).collect())
}

fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Filecoin Green miners registry (identifiers only).
pub struct GreenRegistryClient {
    client: Client,
    url: String,
}

impl GreenRegistryClient {
    const PROVIDER_ID: &'static str = "FILECOIN_GREEN";

    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            url: url.into(),
        }
    }
}

#[async_trait]
impl MinerRegistry for GreenRegistryClient {
    fn id(&self) -> &'static str {
        Self::PROVIDER_ID
    }

    async fn get_miners(&self) -> Result<Vec<RegistryRecord>, MarketDataError> {
        fetch_records::<GreenMiner>(&self.client, Self::PROVIDER_ID, &self.url).await
    }
}

/// Reputation-system miners registry (identifiers with ISO location codes).
pub struct ReputationRegistryClient {
    client: Client,
    url: String,
}

impl ReputationRegistryClient {
    const PROVIDER_ID: &'static str = "FILREP";

    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            url: url.into(),
        }
    }
}

#[async_trait]
impl MinerRegistry for ReputationRegistryClient {
    fn id(&self) -> &'static str {
        Self::PROVIDER_ID
    }

    async fn get_miners(&self) -> Result<Vec<RegistryRecord>, MarketDataError> {
        fetch_records::<ReputationMiner>(&self.client, Self::PROVIDER_ID, &self.url).await
    }
}
