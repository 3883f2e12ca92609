use chrono::{DateTime, Utc};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The requested pair is not in the instrument table.
    #[error("Unknown instrument: {0}")]
    UnknownInstrument(String),

    /// A base price must be strictly positive.
    #[error("Base price must be positive (got: {0})")]
    NegZeroBasePrice(f64),

    /// The sampling interval must be strictly positive.
    #[error("Sampling interval must be positive (got: {0} minutes)")]
    NegZeroInterval(i64),

    /// The fee charged on every trade must be strictly positive.
    #[error("Fee must be positive (got: {0})")]
    NegZeroFee(f64),

    /// A `(min, max)` pair is unordered, negative or not finite.
    #[error("Invalid range for {name}: [{min}, {max}]")]
    InvalidRange {
        /// Name of the configuration field.
        name: &'static str,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// A magnitude reaches or exceeds its limit.
    #[error("{name} must stay below {limit} (got: {value})")]
    BoundTooLarge {
        /// Name of the configuration field.
        name: &'static str,
        /// Offending value.
        value: f64,
        /// Exclusive upper limit.
        limit: f64,
    },

    /// The calendar window leaves no day to start a trade in.
    #[error("Calendar window of {window_days} days leaves no room after excluding {excluded_days} recent days")]
    InvalidWindow {
        /// Look-back window size in days.
        window_days: u32,
        /// Most recent days excluded from start days.
        excluded_days: u32,
    },

    /// The anchor sits too close to the earliest representable time for the look-back.
    #[error("Anchor {0} leaves no room for the configured look-back")]
    AnchorOutOfRange(DateTime<Utc>),

    /// JSON serialization/deserialization error occurred.
    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
