use chrono::{DateTime, Utc};
use filmarket_market_data::MinerId;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregation::RegionalAverages;
use crate::fetcher::{FetchStats, MinerQuote};
use crate::pricing::{
    format_exchange_rate, format_price_fil, format_price_usd, format_size, NormalizedPrice,
};

/// How a cycle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CycleStatus {
    Completed,
    /// No usable exchange rate; nothing was priced.
    Aborted,
}

/// One priced miner, as shown in the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MinerPriceRecord {
    pub miner: MinerId,
    /// Quality-adjusted power in binary units
    pub power: String,
    #[serde(rename = "priceFIL")]
    pub price_fil: String,
    #[serde(rename = "priceUSD")]
    pub price_usd: String,
    /// Raw ask, attoFIL per GiB per epoch
    #[serde(rename = "priceGiB_attoFIL")]
    pub price_gib_atto_fil: String,
    pub region: String,
}

impl MinerPriceRecord {
    pub fn from_quote(quote: &MinerQuote, price: &NormalizedPrice) -> Self {
        Self {
            miner: quote.miner.clone(),
            power: format_size(&quote.power),
            price_fil: format_price_fil(price.native),
            price_usd: format_price_usd(price.reference),
            price_gib_atto_fil: quote.price.clone(),
            region: quote.region.clone(),
        }
    }
}

/// Counters for one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CycleStats {
    #[serde(flatten)]
    pub fetch: FetchStats,
    /// Quotes dropped by the price validity checks or a bucket overflow
    pub rejected: usize,
    /// Valid quotes whose region label matched no bucket
    pub unassigned: usize,
}

/// Result of one pricing cycle.
///
/// Serializes as `{FILPrice, Global, Asia, NorthAmerica, Other, Europe,
/// miners, ...}`. An aborted report has no rate, no buckets and no miners.
#[derive(Clone, Debug, Serialize)]
pub struct CycleReport {
    #[serde(rename = "FILPrice", skip_serializing_if = "Option::is_none")]
    pub fil_price: Option<String>,

    #[serde(flatten)]
    pub averages: Option<RegionalAverages>,

    pub miners: Vec<MinerPriceRecord>,

    pub generated_at: DateTime<Utc>,

    pub status: CycleStatus,

    pub stats: CycleStats,
}

impl CycleReport {
    pub fn completed(
        exchange_rate: Decimal,
        averages: RegionalAverages,
        miners: Vec<MinerPriceRecord>,
        stats: CycleStats,
    ) -> Self {
        Self {
            fil_price: Some(format_exchange_rate(exchange_rate)),
            averages: Some(averages),
            miners,
            generated_at: Utc::now(),
            status: CycleStatus::Completed,
            stats,
        }
    }

    pub fn aborted(stats: CycleStats) -> Self {
        Self {
            fil_price: None,
            averages: None,
            miners: Vec::new(),
            generated_at: Utc::now(),
            status: CycleStatus::Aborted,
            stats,
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.status == CycleStatus::Aborted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::RegionalAggregator;
    use rust_decimal_macros::dec;

    fn quote() -> MinerQuote {
        MinerQuote {
            miner: "f01234".to_string(),
            power: "1649267441664".to_string(),
            price: "500000000".to_string(),
            region: "Asia".to_string(),
        }
    }

    #[test]
    fn test_miner_record_formatting() {
        let price = NormalizedPrice {
            native: dec!(0.0442368),
            reference: dec!(0.221184),
        };
        let record = MinerPriceRecord::from_quote(&quote(), &price);

        assert_eq!(record.power, "1.50 TiB");
        assert_eq!(record.price_fil, "0.0442 FIL");
        assert_eq!(record.price_usd, "0.22118400 USD");
        assert_eq!(record.price_gib_atto_fil, "500000000");

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["priceFIL"], "0.0442 FIL");
        assert_eq!(value["priceUSD"], "0.22118400 USD");
        assert_eq!(value["priceGiB_attoFIL"], "500000000");
        assert_eq!(value["region"], "Asia");
    }

    #[test]
    fn test_completed_report_shape() {
        let mut agg = RegionalAggregator::new();
        agg.add("f01234", "Asia", dec!(0.221184)).unwrap();

        let report = CycleReport::completed(
            dec!(5.004),
            agg.finalize(),
            Vec::new(),
            CycleStats::default(),
        );
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["FILPrice"], "5");
        assert_eq!(value["Global"]["price"], "0.221184");
        assert_eq!(value["Asia"]["count"], 1);
        assert_eq!(value["Europe"]["price"], "NaN");
        assert_eq!(value["status"], "Completed");
        assert!(value["miners"].as_array().unwrap().is_empty());
        assert_eq!(value["stats"]["rejected"], 0);
        assert_eq!(value["stats"]["waves"], 0);
    }

    #[test]
    fn test_aborted_report_has_no_buckets() {
        let report = CycleReport::aborted(CycleStats::default());
        assert!(report.is_aborted());

        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("FILPrice").is_none());
        assert!(value.get("Global").is_none());
        assert_eq!(value["status"], "Aborted");
        assert!(value["miners"].as_array().unwrap().is_empty());
    }
}
