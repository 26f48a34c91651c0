//! Regional aggregation of normalized prices.

mod aggregator;
mod region;

pub use aggregator::{
    AggregateBucket, AggregationError, BucketAverage, RegionalAggregator, RegionalAverages,
};
pub use region::Region;
