use rust_decimal::Decimal;
use thiserror::Error;

use crate::constants::{ATTO_FIL_PER_FIL, DEFAULT_MAX_NATIVE_PRICE, TIB_MONTH_MULTIPLIER};
use crate::errors::{Error, Result};

/// Why a raw ask could not be turned into a price.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("price '{0}' is not an integer")]
    NotNumeric(String),

    #[error("price '{0}' is not positive")]
    NonPositive(String),

    #[error("price '{price}' is {native} FIL/TiB/month, above the {max} limit")]
    OutOfRange {
        price: String,
        native: Decimal,
        max: Decimal,
    },

    #[error("price '{0}' overflows decimal arithmetic")]
    NonFinite(String),
}

/// A raw ask expressed per TiB per month.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NormalizedPrice {
    /// FIL per TiB per month
    pub native: Decimal,
    /// Reference currency per TiB per month
    pub reference: Decimal,
}

/// Converts attoFIL/GiB/epoch asks into FIL and reference-currency figures.
///
/// Stateless: the same input always yields the same output.
#[derive(Clone, Debug)]
pub struct PriceNormalizer {
    max_native_price: Decimal,
}

impl Default for PriceNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceNormalizer {
    pub fn new() -> Self {
        Self {
            max_native_price: Decimal::from(DEFAULT_MAX_NATIVE_PRICE),
        }
    }

    /// Use a custom plausibility bound (FIL per TiB per month).
    pub fn with_max_native_price(max_native_price: Decimal) -> Self {
        Self { max_native_price }
    }

    pub fn max_native_price(&self) -> Decimal {
        self.max_native_price
    }

    /// Parse a raw ask (attoFIL per GiB per epoch) into a decimal.
    pub fn parse_raw(raw_price: &str) -> std::result::Result<Decimal, NormalizeError> {
        let trimmed = raw_price.trim();
        let value: i128 = trimmed
            .parse()
            .map_err(|_| NormalizeError::NotNumeric(raw_price.to_string()))?;

        if value <= 0 {
            return Err(NormalizeError::NonPositive(raw_price.to_string()));
        }

        Decimal::try_from_i128_with_scale(value, 0)
            .map_err(|_| NormalizeError::NonFinite(raw_price.to_string()))
    }

    /// FIL per TiB per month for a raw ask, without the plausibility check.
    pub fn native_per_tib_month(raw: Decimal) -> Option<Decimal> {
        raw.checked_mul(Decimal::from(TIB_MONTH_MULTIPLIER))?
            .checked_div(Decimal::from(ATTO_FIL_PER_FIL))
    }

    /// Normalize a raw ask with the given FIL → reference exchange rate.
    pub fn normalize(
        &self,
        raw_price: &str,
        exchange_rate: Decimal,
    ) -> std::result::Result<NormalizedPrice, NormalizeError> {
        let raw = Self::parse_raw(raw_price)?;

        let native = Self::native_per_tib_month(raw)
            .ok_or_else(|| NormalizeError::NonFinite(raw_price.to_string()))?;

        if native > self.max_native_price {
            return Err(NormalizeError::OutOfRange {
                price: raw_price.to_string(),
                native,
                max: self.max_native_price,
            });
        }

        let reference = native
            .checked_mul(exchange_rate)
            .ok_or_else(|| NormalizeError::NonFinite(raw_price.to_string()))?;

        Ok(NormalizedPrice { native, reference })
    }
}

/// Validate an exchange rate reported as a float.
///
/// Rejects NaN, infinities and non-positive values before anything is
/// converted to `Decimal`.
pub fn exchange_rate_from_f64(rate: f64) -> Result<Decimal> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(Error::InvalidExchangeRate(rate.to_string()));
    }
    Decimal::try_from(rate).map_err(|e| Error::InvalidExchangeRate(format!("{}: {}", rate, e)))
}
