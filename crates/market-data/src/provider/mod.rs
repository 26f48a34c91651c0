//! Remote collaborator abstractions and implementations.
//!
//! This module contains:
//! - The [`ChainClient`], [`MinerRegistry`] and [`ExchangeRateProvider`] traits
//! - A Lotus JSON-RPC client
//! - HTTP clients for the Filecoin Green and reputation-system miner registries
//! - A CoinMarketCap exchange-rate client

mod traits;

pub mod coinmarketcap;
pub mod lotus;
pub mod miners_api;

pub use traits::{ChainClient, ExchangeRateProvider, MinerRegistry};
