use std::fmt;

use filmarket_market_data::{MarketDataError, MinerId};
use serde::Serialize;

/// A priced miner, as returned by the chain node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MinerQuote {
    pub miner: MinerId,
    /// Quality-adjusted power in bytes (decimal string)
    pub power: String,
    /// attoFIL per GiB per epoch (decimal string)
    pub price: String,
    /// Region label from the region lookup
    pub region: String,
}

/// Expected reasons for a miner to produce no quote.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    MissingPeerId,
    MissingPower,
    NoPrice,
    Timeout,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::MissingPeerId => "no peer id",
            SkipReason::MissingPower => "no power",
            SkipReason::NoPrice => "no price",
            SkipReason::Timeout => "request timed out",
        };
        f.write_str(text)
    }
}

/// Result of pricing one miner.
#[derive(Debug)]
pub enum FetchOutcome {
    Quoted(MinerQuote),
    Skipped(SkipReason),
    Failed(MarketDataError),
}

/// Per-batch counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FetchStats {
    /// Miners in the snapshot
    pub requested: usize,
    /// Miners actually dispatched
    pub dispatched: usize,
    pub quoted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub waves: usize,
    /// Whether a stop request cut the batch short
    pub interrupted: bool,
}

impl FetchStats {
    pub fn record(&mut self, outcome: &FetchOutcome) {
        self.dispatched += 1;
        match outcome {
            FetchOutcome::Quoted(_) => self.quoted += 1,
            FetchOutcome::Skipped(_) => self.skipped += 1,
            FetchOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Quotes gathered by one batch, in no particular order.
#[derive(Debug, Default)]
pub struct FetchResult {
    pub quotes: Vec<MinerQuote>,
    pub stats: FetchStats,
}
