//! Price normalization - attoFIL/GiB/epoch asks to FIL and USD per TiB/month.

mod format;
mod normalizer;

pub use format::{
    format_average, format_exchange_rate, format_price_fil, format_price_usd, format_size,
    format_trimmed,
};
pub use normalizer::{exchange_rate_from_f64, NormalizeError, NormalizedPrice, PriceNormalizer};
