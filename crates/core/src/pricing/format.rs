//! Display helpers for report values.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::{
    AVERAGE_PRECISION, EXCHANGE_RATE_PRECISION, NAN_LABEL, NATIVE_PRICE_PRECISION,
    REFERENCE_PRICE_PRECISION, SIZE_PRECISION,
};

const SIZE_UNITS: [&str; 7] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

fn round(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Round and drop trailing zeros, e.g. `5.4321 -> "5.43"`, `5.001 -> "5"`.
pub fn format_trimmed(value: Decimal, dp: u32) -> String {
    round(value, dp).normalize().to_string()
}

/// FIL per TiB per month, fixed 4 decimals.
pub fn format_price_fil(value: Decimal) -> String {
    format!(
        "{:.prec$} FIL",
        round(value, NATIVE_PRICE_PRECISION),
        prec = NATIVE_PRICE_PRECISION as usize
    )
}

/// USD per TiB per month, fixed 8 decimals.
pub fn format_price_usd(value: Decimal) -> String {
    format!(
        "{:.prec$} USD",
        round(value, REFERENCE_PRICE_PRECISION),
        prec = REFERENCE_PRICE_PRECISION as usize
    )
}

/// Exchange rate at 2 decimals, trailing zeros trimmed.
pub fn format_exchange_rate(value: Decimal) -> String {
    format_trimmed(value, EXCHANGE_RATE_PRECISION)
}

/// Bucket average at 8 decimals, or `NaN` when the bucket is empty.
pub fn format_average(value: Option<Decimal>) -> String {
    match value {
        Some(v) => format_trimmed(v, AVERAGE_PRECISION),
        None => NAN_LABEL.to_string(),
    }
}

/// Human-scaled binary size for a byte count given as a decimal string.
///
/// Unparseable input is echoed back unchanged.
pub fn format_size(bytes: &str) -> String {
    let Ok(mut value) = bytes.trim().parse::<Decimal>() else {
        return bytes.to_string();
    };

    let step = Decimal::from(1024);
    let mut unit = 0;
    while value.abs() >= step && unit < SIZE_UNITS.len() - 1 {
        value /= step;
        unit += 1;
    }

    format!(
        "{:.prec$} {}",
        round(value, SIZE_PRECISION),
        SIZE_UNITS[unit],
        prec = SIZE_PRECISION as usize
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_trimmed() {
        assert_eq!(format_trimmed(dec!(5.4321), 2), "5.43");
        assert_eq!(format_trimmed(dec!(5.005), 2), "5.01");
        assert_eq!(format_trimmed(dec!(5.0000), 2), "5");
    }

    #[test]
    fn test_format_price_fil() {
        assert_eq!(format_price_fil(dec!(0.0442368)), "0.0442 FIL");
        assert_eq!(format_price_fil(dec!(2)), "2.0000 FIL");
    }

    #[test]
    fn test_format_price_usd() {
        assert_eq!(format_price_usd(dec!(0.221184)), "0.22118400 USD");
        assert_eq!(format_price_usd(dec!(0.000000005)), "0.00000001 USD");
    }

    #[test]
    fn test_format_average() {
        assert_eq!(format_average(Some(dec!(0.123456789))), "0.12345679");
        assert_eq!(format_average(None), "NaN");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size("512"), "512.00 B");
        assert_eq!(format_size("1024"), "1.00 KiB");
        assert_eq!(format_size("1649267441664"), "1.50 TiB");
        assert_eq!(format_size("34359738368000"), "31.25 TiB");
        assert_eq!(format_size("not-a-number"), "not-a-number");
    }

    #[test]
    fn test_format_size_caps_at_largest_unit() {
        // 2048 EiB
        assert_eq!(format_size("2361183241434822606848"), "2048.00 EiB");
    }
}
