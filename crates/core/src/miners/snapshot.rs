use std::collections::{BTreeSet, HashMap};

use filmarket_market_data::{LocationCode, MinerId, MinerRegistry, RegistryRecord};
use log::{debug, info};

use crate::errors::{Error, Result};

/// Deduplicated view of every registry, built fresh for each cycle.
///
/// Miners iterate in sorted order so wave composition is reproducible.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistrySnapshot {
    miners: BTreeSet<MinerId>,
    locations: HashMap<MinerId, LocationCode>,
}

impl RegistrySnapshot {
    /// Merge registry listings, in order.
    ///
    /// Identifiers are trimmed and empty ones dropped. A non-empty location
    /// code from a later source overwrites one from an earlier source.
    pub fn merge<'a, I>(sources: I) -> Self
    where
        I: IntoIterator<Item = &'a [RegistryRecord]>,
    {
        let mut snapshot = Self::default();

        for records in sources {
            for record in records {
                let miner = record.miner.trim();
                if miner.is_empty() {
                    continue;
                }

                if let Some(code) = record
                    .location
                    .as_deref()
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                {
                    snapshot
                        .locations
                        .insert(miner.to_string(), code.to_string());
                }

                snapshot.miners.insert(miner.to_string());
            }
        }

        snapshot
    }

    /// Merge exactly two registries; `second` wins location conflicts.
    pub fn from_sources(first: &[RegistryRecord], second: &[RegistryRecord]) -> Self {
        Self::merge([first, second])
    }

    pub fn miners(&self) -> impl Iterator<Item = &str> {
        self.miners.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.miners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.miners.is_empty()
    }

    pub fn contains(&self, miner: &str) -> bool {
        self.miners.contains(miner)
    }

    /// Location code recorded for `miner`, if any.
    pub fn location(&self, miner: &str) -> Option<&str> {
        self.locations.get(miner).map(String::as_str)
    }

    /// Number of miners with a known location.
    pub fn located_count(&self) -> usize {
        self.locations.len()
    }
}

/// Pull both registries and merge them into a new snapshot.
///
/// A failing registry is fatal for the cycle: pricing a partial miner set
/// would silently skew the regional averages.
pub async fn refresh_registries(
    first: &dyn MinerRegistry,
    second: &dyn MinerRegistry,
) -> Result<RegistrySnapshot> {
    let (first_result, second_result) = futures::join!(first.get_miners(), second.get_miners());

    let first_records = first_result.map_err(|source| Error::Registry {
        registry: first.id().to_string(),
        source,
    })?;
    let second_records = second_result.map_err(|source| Error::Registry {
        registry: second.id().to_string(),
        source,
    })?;

    debug!(
        "Registry sizes: {}={}, {}={}",
        first.id(),
        first_records.len(),
        second.id(),
        second_records.len()
    );

    let snapshot = RegistrySnapshot::from_sources(&first_records, &second_records);

    info!(
        "Registry snapshot: {} miners ({} with location)",
        snapshot.len(),
        snapshot.located_count()
    );

    Ok(snapshot)
}
