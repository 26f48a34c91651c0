//! Bounded-concurrency miner pricing against the chain node.

mod batch_fetcher;
mod fetcher_model;

#[cfg(test)]
mod batch_fetcher_tests;

pub use batch_fetcher::BatchFetcher;
pub use fetcher_model::{FetchOutcome, FetchResult, FetchStats, MinerQuote, SkipReason};
