use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context};
use filmarket_core::constants::{
    DEFAULT_COOLDOWN_SECS, DEFAULT_MAX_NATIVE_PRICE, DEFAULT_WAVE_SIZE,
};
use filmarket_core::CyclePolicy;
use rust_decimal::Decimal;

pub struct Config {
    pub lotus_api: String,
    pub lotus_token: Option<String>,
    /// Miners per wave against the Lotus node
    pub lotus_rps: usize,
    pub miners_api_fg: String,
    pub miners_api_rs: String,
    pub cmc_api_key: String,
    pub cooldown: Duration,
    pub cycle_policy: CyclePolicy,
    pub request_timeout: Duration,
    pub shutdown_grace: Duration,
    pub max_price_fil: Decimal,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key/value source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &str| get(key).ok_or_else(|| anyhow!("{} must be set", key));

        let lotus_rps: usize = parse_or(&get, "FILMARKET_LOTUS_RPS", DEFAULT_WAVE_SIZE)?;
        if lotus_rps == 0 {
            return Err(anyhow!("FILMARKET_LOTUS_RPS must be at least 1"));
        }

        let max_price_fil: Decimal = parse_or(
            &get,
            "FILMARKET_MAX_PRICE_FIL",
            Decimal::from(DEFAULT_MAX_NATIVE_PRICE),
        )?;
        if max_price_fil <= Decimal::ZERO {
            return Err(anyhow!("FILMARKET_MAX_PRICE_FIL must be positive"));
        }

        let cycle_policy = match get("FILMARKET_CYCLE_POLICY") {
            Some(value) => value
                .parse::<CyclePolicy>()
                .context("Invalid FILMARKET_CYCLE_POLICY")?,
            None => CyclePolicy::default(),
        };

        Ok(Self {
            lotus_api: get("FILMARKET_LOTUS_API")
                .unwrap_or_else(|| "http://127.0.0.1:1234/rpc/v0".into()),
            lotus_token: get("FILMARKET_LOTUS_TOKEN"),
            lotus_rps,
            miners_api_fg: required("FILMARKET_MINERS_API_FG")?,
            miners_api_rs: required("FILMARKET_MINERS_API_RS")?,
            cmc_api_key: required("FILMARKET_CMC_API_KEY")?,
            cooldown: Duration::from_secs(parse_or(
                &get,
                "FILMARKET_COOLDOWN_SECS",
                DEFAULT_COOLDOWN_SECS,
            )?),
            cycle_policy,
            request_timeout: Duration::from_millis(parse_or(
                &get,
                "FILMARKET_REQUEST_TIMEOUT_MS",
                30_000u64,
            )?),
            shutdown_grace: Duration::from_secs(parse_or(
                &get,
                "FILMARKET_SHUTDOWN_GRACE_SECS",
                3u64,
            )?),
            max_price_fil,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(value) => value
            .parse()
            .with_context(|| format!("Invalid {}: '{}'", key, value)),
        None => Ok(default),
    }
}
