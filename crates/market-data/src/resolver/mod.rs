//! Location resolution for miners.
//!
//! Registries report an ISO 3166-1 alpha-2 country code per miner; the
//! [`RegionLookup`] trait folds those codes into the coarse regions used by
//! the price index.

mod region_map;

pub use region_map::{
    RegionLookup, RegionMap, REGION_ASIA, REGION_EUROPE, REGION_NORTH_AMERICA, REGION_OTHER,
};
