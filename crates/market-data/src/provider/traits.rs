//! Remote collaborator trait definitions.
//!
//! The pipeline in `filmarket-core` only talks to these traits, so tests can
//! swap in mock implementations and production wires the HTTP clients.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{MinerInfo, MinerPower, RegistryRecord, StorageAsk};

/// Chain node access used to price a single miner.
///
/// Every method returns `Ok(None)` when the node answered but had nothing to
/// say (unknown actor, empty result). Transport and RPC failures are errors.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Unique identifier for this client, used in logs.
    fn id(&self) -> &'static str;

    /// Capability lookup: routing information for the miner.
    async fn miner_info(&self, miner: &str) -> Result<Option<MinerInfo>, MarketDataError>;

    /// Capacity lookup: the miner's power claim.
    async fn miner_power(&self, miner: &str) -> Result<Option<MinerPower>, MarketDataError>;

    /// Price-ask lookup, dialing the miner through its peer id.
    async fn query_ask(
        &self,
        peer_id: &str,
        miner: &str,
    ) -> Result<Option<StorageAsk>, MarketDataError>;
}

/// A source of miner identifiers.
#[async_trait]
pub trait MinerRegistry: Send + Sync {
    /// Unique identifier for this registry, used in logs.
    fn id(&self) -> &'static str;

    /// Fetch the full list of miners currently known to the registry.
    async fn get_miners(&self) -> Result<Vec<RegistryRecord>, MarketDataError>;
}

/// Reference-currency exchange rate source.
#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    /// Unique identifier for this provider, used in logs.
    fn id(&self) -> &'static str;

    /// Latest FIL price in the reference currency.
    ///
    /// Returns `Ok(None)` when the response did not carry a price.
    async fn get_fil_price(&self) -> Result<Option<f64>, MarketDataError>;
}
