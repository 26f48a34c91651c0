//! Wave-based miner pricing.
//!
//! Miners are queried in waves of `wave_size`. Every miner in a wave is
//! dispatched at once and the wave must fully settle before the next one
//! starts. Each miner issues its requests one at a time, which bounds in-flight
//! requests against the Lotus node to `wave_size`. A stop request is honored between waves only.

use std::sync::Arc;

use filmarket_market_data::{ChainClient, MarketDataError, RegionLookup, REGION_OTHER};
use futures::future::join_all;
use log::{debug, info};

use super::fetcher_model::{FetchOutcome, FetchResult, FetchStats, MinerQuote, SkipReason};
use crate::constants::DEFAULT_WAVE_SIZE;
use crate::cycle::StopSignal;
use crate::miners::RegistrySnapshot;

/// Treat empty strings as missing.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Treat empty strings and zero as missing; a zero-power miner stores nothing.
fn non_zero(value: Option<&str>) -> Option<&str> {
    present(value).filter(|v| *v != "0")
}

/// Transport timeouts are expected for offline miners and only skip them.
fn classify_error(error: MarketDataError) -> FetchOutcome {
    if error.is_timeout() {
        FetchOutcome::Skipped(SkipReason::Timeout)
    } else {
        FetchOutcome::Failed(error)
    }
}

pub struct BatchFetcher {
    chain: Arc<dyn ChainClient>,
    regions: Arc<dyn RegionLookup>,
    wave_size: usize,
}

impl BatchFetcher {
    pub fn new(chain: Arc<dyn ChainClient>, regions: Arc<dyn RegionLookup>) -> Self {
        Self {
            chain,
            regions,
            wave_size: DEFAULT_WAVE_SIZE,
        }
    }

    /// Set the number of miners dispatched per wave (minimum 1).
    pub fn with_wave_size(mut self, wave_size: usize) -> Self {
        self.wave_size = wave_size.max(1);
        self
    }

    pub fn wave_size(&self) -> usize {
        self.wave_size
    }

    /// Price every miner in the snapshot.
    pub async fn fetch(&self, snapshot: &RegistrySnapshot, stop: &StopSignal) -> FetchResult {
        let miners: Vec<&str> = snapshot.miners().collect();
        let mut result = FetchResult {
            quotes: Vec::new(),
            stats: FetchStats {
                requested: miners.len(),
                ..FetchStats::default()
            },
        };

        info!("Pricing {} miners in waves of {}", miners.len(), self.wave_size);

        for wave in miners.chunks(self.wave_size) {
            if stop.is_stopped() {
                info!(
                    "Stop requested, abandoning {} miners",
                    result.stats.requested - result.stats.dispatched
                );
                result.stats.interrupted = true;
                break;
            }

            result.stats.waves += 1;
            debug!("Wave {}: {} miners", result.stats.waves, wave.len());

            let futures: Vec<_> = wave
                .iter()
                .map(|miner| self.fetch_one(miner, snapshot))
                .collect();
            let outcomes = join_all(futures).await;

            for outcome in outcomes {
                result.stats.record(&outcome);
                if let FetchOutcome::Quoted(quote) = outcome {
                    result.quotes.push(quote);
                }
            }
        }

        info!(
            "Fetched {} quotes from {} miners in {} waves ({} skipped, {} failed)",
            result.stats.quoted,
            result.stats.dispatched,
            result.stats.waves,
            result.stats.skipped,
            result.stats.failed
        );

        result
    }

    /// Price a single miner. Never returns an error: every failure becomes
    /// an outcome so one miner cannot take down its wave.
    pub async fn fetch_one(&self, miner: &str, snapshot: &RegistrySnapshot) -> FetchOutcome {
        let outcome = self.quote(miner, snapshot).await;

        match &outcome {
            FetchOutcome::Quoted(quote) => info!(
                "Miner {} quoted: power {}, price {}",
                miner, quote.power, quote.price
            ),
            FetchOutcome::Skipped(reason) => info!("Miner {} skipped: {}", miner, reason),
            FetchOutcome::Failed(e) => info!("Miner {} failed: {}", miner, e),
        }

        outcome
    }

    /// Requests for one miner are issued one after the other, so a wave never
    /// has more than `wave_size` requests in flight.
    async fn quote(&self, miner: &str, snapshot: &RegistrySnapshot) -> FetchOutcome {
        let info = match self.chain.miner_info(miner).await {
            Ok(info) => info,
            Err(e) => return classify_error(e),
        };
        let power = match self.chain.miner_power(miner).await {
            Ok(power) => power,
            Err(e) => return classify_error(e),
        };

        let peer_id = present(info.as_ref().and_then(|i| i.peer_id.as_deref()));
        let power = non_zero(power.as_ref().and_then(|p| p.quality_adj_power()));

        match (peer_id, power) {
            (None, _) => FetchOutcome::Skipped(SkipReason::MissingPeerId),
            (_, None) => FetchOutcome::Skipped(SkipReason::MissingPower),
            (Some(peer_id), Some(power)) => self.query_price(miner, peer_id, power, snapshot).await,
        }
    }

    async fn query_price(
        &self,
        miner: &str,
        peer_id: &str,
        power: &str,
        snapshot: &RegistrySnapshot,
    ) -> FetchOutcome {
        let ask = match self.chain.query_ask(peer_id, miner).await {
            Ok(ask) => ask,
            Err(e) => return classify_error(e),
        };

        let Some(price) = present(ask.as_ref().and_then(|a| a.price())) else {
            return FetchOutcome::Skipped(SkipReason::NoPrice);
        };

        let region = snapshot
            .location(miner)
            .map(|code| self.regions.region_for(code).into_owned())
            .unwrap_or_else(|| REGION_OTHER.to_string());

        FetchOutcome::Quoted(MinerQuote {
            miner: miner.to_string(),
            power: power.to_string(),
            price: price.to_string(),
            region,
        })
    }
}
