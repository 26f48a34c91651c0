//! The pricing loop: refresh registries, fetch the exchange rate, price every
//! miner, aggregate, report, cool down.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use filmarket_market_data::{ExchangeRateProvider, MinerRegistry};
use log::{debug, error, info};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::report::{CycleReport, CycleStats, MinerPriceRecord};
use super::stop::StopSignal;
use crate::aggregation::{AggregationError, RegionalAggregator};
use crate::constants::DEFAULT_COOLDOWN_SECS;
use crate::errors::{Error, Result};
use crate::fetcher::{BatchFetcher, FetchResult, FetchStats};
use crate::miners::refresh_registries;
use crate::pricing::{exchange_rate_from_f64, format_exchange_rate, PriceNormalizer};

/// Scheduler states, logged on every transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    RefreshingRegistries,
    Fetching,
    Aggregating,
    Reporting,
    CoolingDown,
    Stopped,
}

/// Whether the scheduler loops after the first cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CyclePolicy {
    /// Run a single cycle, then stop.
    #[default]
    Once,
    /// Keep cycling until a stop is requested.
    Repeat,
}

impl FromStr for CyclePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "once" => Ok(CyclePolicy::Once),
            "repeat" => Ok(CyclePolicy::Repeat),
            other => Err(Error::InvalidConfigValue(format!(
                "unknown cycle policy '{}', expected 'once' or 'repeat'",
                other
            ))),
        }
    }
}

impl fmt::Display for CyclePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CyclePolicy::Once => f.write_str("once"),
            CyclePolicy::Repeat => f.write_str("repeat"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    pub cooldown: Duration,
    pub policy: CyclePolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_secs(DEFAULT_COOLDOWN_SECS),
            policy: CyclePolicy::Once,
        }
    }
}

/// Destination for finished reports.
pub trait ReportSink: Send + Sync {
    fn emit(&self, report: &CycleReport) -> Result<()>;
}

/// What `run` did before it returned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Cycles that produced a report, aborted ones included
    pub cycles: usize,
    pub aborted: usize,
    pub cooldowns: usize,
}

pub struct CycleScheduler {
    primary_registry: Arc<dyn MinerRegistry>,
    secondary_registry: Arc<dyn MinerRegistry>,
    rates: Arc<dyn ExchangeRateProvider>,
    fetcher: BatchFetcher,
    normalizer: PriceNormalizer,
    sink: Arc<dyn ReportSink>,
    config: SchedulerConfig,
}

impl CycleScheduler {
    pub fn new(
        primary_registry: Arc<dyn MinerRegistry>,
        secondary_registry: Arc<dyn MinerRegistry>,
        rates: Arc<dyn ExchangeRateProvider>,
        fetcher: BatchFetcher,
        sink: Arc<dyn ReportSink>,
    ) -> Self {
        Self {
            primary_registry,
            secondary_registry,
            rates,
            fetcher,
            normalizer: PriceNormalizer::new(),
            sink,
            config: SchedulerConfig::default(),
        }
    }

    pub fn with_normalizer(mut self, normalizer: PriceNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    fn enter(&self, phase: CyclePhase) {
        debug!("Scheduler phase: {:?}", phase);
    }

    /// Run cycles until stopped or a fatal error occurs.
    ///
    /// With [`CyclePolicy::Once`] the stop signal is raised after the first
    /// report, which also cuts the cooldown short.
    pub async fn run(&self, stop: &StopSignal) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        self.enter(CyclePhase::Idle);

        while !stop.is_stopped() {
            let report = self.run_cycle(stop).await?;

            self.enter(CyclePhase::Reporting);
            self.sink.emit(&report)?;
            summary.cycles += 1;
            if report.is_aborted() {
                summary.aborted += 1;
            }

            if self.config.policy == CyclePolicy::Once {
                debug!("Single-cycle policy, requesting stop");
                stop.stop();
            }

            self.enter(CyclePhase::CoolingDown);
            summary.cooldowns += 1;
            self.cool_down(stop).await;
        }

        self.enter(CyclePhase::Stopped);
        info!(
            "Scheduler stopped after {} cycles ({} aborted)",
            summary.cycles, summary.aborted
        );
        Ok(summary)
    }

    async fn cool_down(&self, stop: &StopSignal) {
        info!("Pause for {} seconds", self.config.cooldown.as_secs());
        tokio::select! {
            _ = tokio::time::sleep(self.config.cooldown) => {}
            _ = stop.stopped() => debug!("Cooldown cut short by stop request"),
        }
    }

    /// Run one full cycle and build its report without emitting it.
    ///
    /// Registry failures are fatal. A missing or unusable exchange rate
    /// yields an aborted report instead.
    pub async fn run_cycle(&self, stop: &StopSignal) -> Result<CycleReport> {
        self.enter(CyclePhase::RefreshingRegistries);
        let snapshot = refresh_registries(
            self.primary_registry.as_ref(),
            self.secondary_registry.as_ref(),
        )
        .await?;

        let exchange_rate = match self.exchange_rate().await {
            Ok(rate) => rate,
            Err(e) => {
                error!("Cycle aborted, no usable FIL price: {}", e);
                return Ok(CycleReport::aborted(CycleStats {
                    fetch: FetchStats {
                        requested: snapshot.len(),
                        ..FetchStats::default()
                    },
                    ..CycleStats::default()
                }));
            }
        };
        info!("FIL price: {} USD", format_exchange_rate(exchange_rate));

        self.enter(CyclePhase::Fetching);
        let fetched = self.fetcher.fetch(&snapshot, stop).await;

        self.enter(CyclePhase::Aggregating);
        Ok(self.aggregate(fetched, exchange_rate))
    }

    async fn exchange_rate(&self) -> Result<Decimal> {
        let price = self.rates.get_fil_price().await?.ok_or_else(|| {
            Error::InvalidExchangeRate(format!("{} returned no price", self.rates.id()))
        })?;
        exchange_rate_from_f64(price)
    }

    /// Normalize and bucket every quote. Data-quality problems are logged
    /// and the offending quote is left out of the averages.
    fn aggregate(&self, fetched: FetchResult, exchange_rate: Decimal) -> CycleReport {
        let mut aggregator = RegionalAggregator::new();
        let mut miners = Vec::with_capacity(fetched.quotes.len());
        let mut stats = CycleStats {
            fetch: fetched.stats,
            ..CycleStats::default()
        };

        for quote in &fetched.quotes {
            let price = match self.normalizer.normalize(&quote.price, exchange_rate) {
                Ok(price) => price,
                Err(e) => {
                    error!("Miner {} rejected: {}", quote.miner, e);
                    stats.rejected += 1;
                    continue;
                }
            };

            match aggregator.add(&quote.miner, &quote.region, price.reference) {
                Ok(_) => {}
                Err(e @ AggregationError::UnknownRegion { .. }) => {
                    error!("{}", e);
                    stats.unassigned += 1;
                }
                Err(e @ AggregationError::Overflow { .. }) => {
                    error!("Miner {} rejected: {}", quote.miner, e);
                    stats.rejected += 1;
                    continue;
                }
            }

            miners.push(MinerPriceRecord::from_quote(quote, &price));
        }

        let averages = aggregator.finalize();
        info!(
            "Cycle priced {} miners ({} rejected, {} unassigned)",
            averages.global.count, stats.rejected, stats.unassigned
        );

        CycleReport::completed(exchange_rate, averages, miners, stats)
    }
}
