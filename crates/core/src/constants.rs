/// attoFIL per FIL
pub const ATTO_FIL_PER_FIL: i64 = 1_000_000_000_000_000_000;

/// Filecoin epochs per day (30 second block time)
pub const EPOCHS_PER_DAY: i64 = 2_880;

/// Epochs in a 30-day month
pub const EPOCHS_PER_MONTH: i64 = EPOCHS_PER_DAY * 30;

/// GiB per TiB
pub const GIB_PER_TIB: i64 = 1_024;

/// Multiplier from "per GiB per epoch" to "per TiB per month"
pub const TIB_MONTH_MULTIPLIER: i64 = GIB_PER_TIB * EPOCHS_PER_MONTH;

/// Decimal places for FIL per TiB/month display
pub const NATIVE_PRICE_PRECISION: u32 = 4;

/// Decimal places for USD per TiB/month display
pub const REFERENCE_PRICE_PRECISION: u32 = 8;

/// Decimal places for bucket averages
pub const AVERAGE_PRECISION: u32 = 8;

/// Decimal places for the FIL/USD rate
pub const EXCHANGE_RATE_PRECISION: u32 = 2;

/// Decimal places for human-readable sizes
pub const SIZE_PRECISION: u32 = 2;

/// Upper bound for a plausible ask, in FIL per TiB per month
pub const DEFAULT_MAX_NATIVE_PRICE: i64 = 1_000;

/// Default number of miners queried per wave
pub const DEFAULT_WAVE_SIZE: usize = 10;

/// Default pause between cycles, in seconds
pub const DEFAULT_COOLDOWN_SECS: u64 = 60;

/// Placeholder for an undefined average
pub const NAN_LABEL: &str = "NaN";
