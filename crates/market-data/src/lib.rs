//! FilMarket Market Data Crate
//!
//! This crate provides the remote collaborators used by the FilMarket price
//! index: miner registries, the Lotus chain node, and the FIL exchange rate.
//!
//! # Overview
//!
//! - Miner discovery from two independently schemaed registries
//! - Lotus JSON-RPC for miner info, power and storage asks
//! - FIL/USD exchange rate from CoinMarketCap
//! - ISO country code to region resolution
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |  MinerRegistry   | --> |  RegistryRecord  |  (miner + location code)
//! +------------------+     +------------------+
//!
//! +------------------+     +------------------+
//! |   ChainClient    | --> | MinerInfo/Power  |  (peer id, QA power)
//! |                  | --> |   StorageAsk     |  (attoFIL / GiB / epoch)
//! +------------------+     +------------------+
//!
//! +----------------------+     +------------+
//! | ExchangeRateProvider | --> |  FIL/USD   |
//! +----------------------+     +------------+
//! ```
//!
//! # Type Aliases
//!
//! - [`MinerId`] - Miner actor address (e.g., "f01234")
//! - [`PeerId`] - libp2p peer id
//! - [`LocationCode`] - ISO 3166-1 alpha-2 country code

pub mod errors;
pub mod models;
pub mod provider;
pub mod resolver;

// Re-export all public types from models
pub use models::{
    AskTerms, LocationCode, MinerId, MinerInfo, MinerPower, PeerId, PowerClaim, RegistryRecord,
    StorageAsk,
};

// Re-export provider types
pub use provider::coinmarketcap::CoinMarketCapProvider;
pub use provider::lotus::LotusClient;
pub use provider::miners_api::{GreenRegistryClient, ReputationRegistryClient};
pub use provider::{ChainClient, ExchangeRateProvider, MinerRegistry};

// Re-export resolver types
pub use resolver::{
    RegionLookup, RegionMap, REGION_ASIA, REGION_EUROPE, REGION_NORTH_AMERICA, REGION_OTHER,
};

pub use errors::MarketDataError;
