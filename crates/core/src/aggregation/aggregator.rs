use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};
use thiserror::Error;

use super::region::Region;
use crate::constants::AVERAGE_PRECISION;
use crate::pricing::format_average;

/// Why a quote could not be added to the index.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregationError {
    #[error("invalid region '{region}' for miner {miner}")]
    UnknownRegion { miner: String, region: String },

    #[error("sum overflow adding {price} for miner {miner}")]
    Overflow { miner: String, price: Decimal },
}

/// Running sum and count for one bucket.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AggregateBucket {
    pub sum: Decimal,
    pub count: u64,
}

impl AggregateBucket {
    /// Arithmetic mean, `None` for an empty bucket.
    pub fn average(&self) -> Option<Decimal> {
        if self.count == 0 {
            return None;
        }
        self.sum.checked_div(Decimal::from(self.count)).map(|avg| {
            avg.round_dp_with_strategy(AVERAGE_PRECISION, RoundingStrategy::MidpointAwayFromZero)
        })
    }

    pub fn finalize(&self) -> BucketAverage {
        BucketAverage {
            price: self.average(),
            count: self.count,
        }
    }
}

/// Finalized bucket: `price` is `None` when nothing was counted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BucketAverage {
    #[serde(serialize_with = "serialize_average")]
    pub price: Option<Decimal>,
    pub count: u64,
}

fn serialize_average<S: Serializer>(price: &Option<Decimal>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format_average(*price))
}

/// Averages for the global bucket and every region.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegionalAverages {
    #[serde(rename = "Global")]
    pub global: BucketAverage,
    #[serde(rename = "Asia")]
    pub asia: BucketAverage,
    #[serde(rename = "NorthAmerica")]
    pub north_america: BucketAverage,
    #[serde(rename = "Other")]
    pub other: BucketAverage,
    #[serde(rename = "Europe")]
    pub europe: BucketAverage,
}

impl RegionalAverages {
    pub fn region(&self, region: Region) -> &BucketAverage {
        match region {
            Region::Asia => &self.asia,
            Region::Europe => &self.europe,
            Region::NorthAmerica => &self.north_america,
            Region::Other => &self.other,
        }
    }
}

/// Accumulates reference-currency prices per region plus a global bucket.
///
/// Every accepted price lands in exactly one region bucket and in the global
/// bucket; a rejected price touches neither.
#[derive(Clone, Debug, Default)]
pub struct RegionalAggregator {
    global: AggregateBucket,
    regions: BTreeMap<Region, AggregateBucket>,
}

impl RegionalAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one price under `region_label`.
    pub fn add(
        &mut self,
        miner: &str,
        region_label: &str,
        price: Decimal,
    ) -> Result<Region, AggregationError> {
        let region =
            Region::from_label(region_label).ok_or_else(|| AggregationError::UnknownRegion {
                miner: miner.to_string(),
                region: region_label.to_string(),
            })?;

        let overflow = || AggregationError::Overflow {
            miner: miner.to_string(),
            price,
        };

        let bucket = self.regions.get(&region).copied().unwrap_or_default();
        let region_sum = bucket.sum.checked_add(price).ok_or_else(overflow)?;
        let global_sum = self.global.sum.checked_add(price).ok_or_else(overflow)?;

        self.regions.insert(
            region,
            AggregateBucket {
                sum: region_sum,
                count: bucket.count + 1,
            },
        );
        self.global = AggregateBucket {
            sum: global_sum,
            count: self.global.count + 1,
        };

        Ok(region)
    }

    pub fn global(&self) -> AggregateBucket {
        self.global
    }

    pub fn bucket(&self, region: Region) -> AggregateBucket {
        self.regions.get(&region).copied().unwrap_or_default()
    }

    pub fn finalize(&self) -> RegionalAverages {
        RegionalAverages {
            global: self.global.finalize(),
            asia: self.bucket(Region::Asia).finalize(),
            north_america: self.bucket(Region::NorthAmerica).finalize(),
            other: self.bucket(Region::Other).finalize(),
            europe: self.bucket(Region::Europe).finalize(),
        }
    }
}
