//! Market data models
//!
//! - `types` - Type aliases for common identifiers (MinerId, PeerId, LocationCode)
//! - `registry` - Records returned by miner registries
//! - `chain` - Lotus state and storage-ask payloads

mod chain;
mod registry;
mod types;

pub use chain::{AskTerms, MinerInfo, MinerPower, PowerClaim, StorageAsk};
pub use registry::RegistryRecord;
pub use types::{LocationCode, MinerId, PeerId};
