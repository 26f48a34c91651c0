use std::fmt;

use filmarket_market_data::{REGION_ASIA, REGION_EUROPE, REGION_NORTH_AMERICA, REGION_OTHER};
use serde::{Deserialize, Serialize};

/// Regions with their own bucket in the index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    Asia,
    Europe,
    NorthAmerica,
    Other,
}

impl Region {
    pub const ALL: [Region; 4] = [
        Region::Asia,
        Region::Europe,
        Region::NorthAmerica,
        Region::Other,
    ];

    /// Parse a label produced by a region lookup.
    ///
    /// Returns `None` for labels outside the four built-in regions.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            REGION_ASIA => Some(Region::Asia),
            REGION_EUROPE => Some(Region::Europe),
            REGION_NORTH_AMERICA => Some(Region::NorthAmerica),
            REGION_OTHER => Some(Region::Other),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Region::Asia => REGION_ASIA,
            Region::Europe => REGION_EUROPE,
            Region::NorthAmerica => REGION_NORTH_AMERICA,
            Region::Other => REGION_OTHER,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
