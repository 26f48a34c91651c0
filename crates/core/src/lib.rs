//! FilMarket Core - the pricing pipeline behind the storage price index.
//!
//! This crate turns the raw remote data exposed by `filmarket-market-data`
//! into one report per cycle. It never talks HTTP itself: every collaborator
//! is a trait object, so tests drive it with mocks and the bot binary wires
//! in the real clients.

pub mod aggregation;
pub mod constants;
pub mod cycle;
pub mod errors;
pub mod fetcher;
pub mod miners;
pub mod pricing;

pub use aggregation::{Region, RegionalAggregator, RegionalAverages};
pub use cycle::{
    CyclePolicy, CycleReport, CycleScheduler, CycleStatus, ReportSink, RunSummary,
    SchedulerConfig, StopSignal,
};
pub use fetcher::BatchFetcher;
pub use miners::RegistrySnapshot;
pub use pricing::PriceNormalizer;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
