use serde::{Deserialize, Serialize};

use super::types::{LocationCode, MinerId};

/// One entry returned by a miner registry.
///
/// Registries are independently schemaed; each client maps its own wire
/// format onto this record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryRecord {
    /// Miner actor address
    pub miner: MinerId,

    /// Location code, when the registry knows one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationCode>,
}

impl RegistryRecord {
    /// Record without a location
    pub fn new(miner: impl Into<MinerId>) -> Self {
        Self {
            miner: miner.into(),
            location: None,
        }
    }

    /// Record with a location code
    pub fn with_location(miner: impl Into<MinerId>, location: impl Into<LocationCode>) -> Self {
        Self {
            miner: miner.into(),
            location: Some(location.into()),
        }
    }
}
