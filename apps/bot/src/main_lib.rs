use std::sync::Arc;

use filmarket_core::{BatchFetcher, CycleScheduler, PriceNormalizer, ReportSink, SchedulerConfig};
use filmarket_market_data::{
    CoinMarketCapProvider, GreenRegistryClient, LotusClient, RegionMap, ReputationRegistryClient,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

pub fn init_tracing() {
    let log_format = std::env::var("FILMARKET_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Wire the HTTP clients into a scheduler.
pub fn build_scheduler(config: &Config, sink: Arc<dyn ReportSink>) -> CycleScheduler {
    let lotus = LotusClient::new(
        config.lotus_api.clone(),
        config.lotus_token.clone(),
        config.request_timeout,
    );
    let green = GreenRegistryClient::new(config.miners_api_fg.clone(), config.request_timeout);
    let reputation =
        ReputationRegistryClient::new(config.miners_api_rs.clone(), config.request_timeout);
    let rates = CoinMarketCapProvider::new(config.cmc_api_key.clone(), config.request_timeout);

    tracing::info!(
        "Lotus at {} ({} miners per wave), cycle policy: {}",
        config.lotus_api,
        config.lotus_rps,
        config.cycle_policy
    );

    let fetcher = BatchFetcher::new(Arc::new(lotus), Arc::new(RegionMap::new()))
        .with_wave_size(config.lotus_rps);

    CycleScheduler::new(
        Arc::new(green),
        Arc::new(reputation),
        Arc::new(rates),
        fetcher,
        sink,
    )
    .with_normalizer(PriceNormalizer::with_max_native_price(config.max_price_fil))
    .with_config(SchedulerConfig {
        cooldown: config.cooldown,
        policy: config.cycle_policy,
    })
}
