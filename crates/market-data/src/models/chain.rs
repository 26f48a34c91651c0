use serde::{Deserialize, Serialize};

use super::types::PeerId;

/// Subset of `Filecoin.StateMinerInfo` used to route storage asks.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MinerInfo {
    /// libp2p peer id of the miner, null when never set on chain
    #[serde(rename = "PeerId", default)]
    pub peer_id: Option<PeerId>,
}

/// Power claim of a single actor.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PowerClaim {
    /// Quality-adjusted power in bytes (decimal string)
    #[serde(rename = "QualityAdjPower", default)]
    pub quality_adj_power: Option<String>,
}

/// Subset of `Filecoin.StateMinerPower`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MinerPower {
    #[serde(rename = "MinerPower", default)]
    pub miner_power: Option<PowerClaim>,
}

impl MinerPower {
    /// Quality-adjusted power, if reported.
    pub fn quality_adj_power(&self) -> Option<&str> {
        self.miner_power
            .as_ref()
            .and_then(|claim| claim.quality_adj_power.as_deref())
    }
}

/// Signed storage ask payload.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AskTerms {
    /// attoFIL per GiB per epoch (decimal string)
    #[serde(rename = "Price", default)]
    pub price: Option<String>,
}

/// Result of `Filecoin.ClientQueryAsk`.
///
/// Older nodes return the ask terms inline, newer ones nest them under
/// `Response`; both are accepted.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StorageAsk {
    #[serde(rename = "Price", default)]
    pub price: Option<String>,

    #[serde(rename = "Response", default, skip_serializing_if = "Option::is_none")]
    pub response: Option<AskTerms>,
}

impl StorageAsk {
    /// Asking price in attoFIL per GiB per epoch.
    pub fn price(&self) -> Option<&str> {
        self.price
            .as_deref()
            .or_else(|| self.response.as_ref().and_then(|r| r.price.as_deref()))
    }
}
