use chrono::Duration;
use rand::Rng;

use crate::errors::{Error, Result};
use crate::utils::uniform_count;

/// Which dataset shape the generator produces.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// A 15-minute price path with trades reconciled onto it.
    #[default]
    TimeSeries,
    /// Self-contained calendar-day trades with bar metrics, no price path.
    BarChart,
}

/// Longest look-back a configuration may cover, in days (exclusive).
pub const MAX_LOOKBACK_DAYS: u32 = 3_650;

/// Most trades a single generation call may produce (exclusive).
pub const MAX_TRADES: usize = 100_000;

const MAX_LOOKBACK_MINUTES: i64 = MAX_LOOKBACK_DAYS as i64 * 24 * 60;

/// How many trades a generation call produces.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeCount {
    /// Exactly this many trades.
    Fixed(usize),
    /// A uniform count in `[min, max]`.
    Range(usize, usize),
}

impl TradeCount {
    /// Draws the number of trades for one generation call.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        match *self {
            Self::Fixed(n) => n,
            Self::Range(min, max) => uniform_count(rng, min..=max),
        }
    }
}

/// Every tunable constant of the generators.
///
/// Use [`GeneratorConfig::time_series`] or [`GeneratorConfig::bar_chart`] for the stock
/// dashboards, or [`GeneratorConfig::builder`] to adjust individual values with validation.
/// Deserialized configurations are validated too, so every instance is within its domain.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "UncheckedConfig")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    mode: Mode,
    samples: usize,
    interval_minutes: i64,
    volatility: (f64, f64),
    trend_bound: f64,
    volume: (f64, f64),
    trade_count: TradeCount,
    fee: f64,
    funding_bound: f64,
    hold_samples: (usize, usize),
    edge_margin: usize,
    window_days: u32,
    recent_days_excluded: u32,
    hold_days: (u32, u32),
    periods_per_day: u32,
    price_jitter_pct: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::time_series()
    }
}

impl GeneratorConfig {
    /// Defaults for the price-path dashboard: 100 samples of 15 minutes, 3 to 7 trades.
    pub fn time_series() -> Self {
        Self {
            mode: Mode::TimeSeries,
            samples: 100,
            interval_minutes: 15,
            volatility: (0.001, 0.005),
            trend_bound: 0.001,
            volume: (50.0, 500.0),
            trade_count: TradeCount::Range(3, 7),
            fee: 0.1,
            funding_bound: 2.0,
            hold_samples: (5, 25),
            edge_margin: 5,
            window_days: 30,
            recent_days_excluded: 5,
            hold_days: (1, 8),
            periods_per_day: 3,
            price_jitter_pct: 2.0,
        }
    }

    /// Defaults for the bar-chart dashboard: 8 to 15 trades over the last 30 days.
    pub fn bar_chart() -> Self {
        Self {
            mode: Mode::BarChart,
            trade_count: TradeCount::Range(8, 15),
            funding_bound: 5.0,
            ..Self::time_series()
        }
    }

    /// Starts a builder from the defaults of `mode`.
    ///
    /// ### Example
    /// ```rust
    /// use trade_timeline::prelude::*;
    ///
    /// let config = GeneratorConfig::builder(Mode::TimeSeries)
    ///     .samples(48)
    ///     .trade_count(TradeCount::Fixed(2))
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(config.samples(), 48);
    ///
    /// let invalid = GeneratorConfig::builder(Mode::TimeSeries).fee(0.0).build();
    /// assert!(invalid.is_err());
    /// ```
    pub fn builder(mode: Mode) -> GeneratorConfigBuilder {
        let config = match mode {
            Mode::TimeSeries => Self::time_series(),
            Mode::BarChart => Self::bar_chart(),
        };
        GeneratorConfigBuilder { config }
    }

    /// Checks every field against its allowed domain.
    ///
    /// Spans are bounded as well as ranges: the price path and the calendar window must each
    /// stay below [`MAX_LOOKBACK_DAYS`], and the trade count below [`MAX_TRADES`].
    pub fn validate(&self) -> Result<()> {
        if self.interval_minutes <= 0 {
            return Err(Error::NegZeroInterval(self.interval_minutes));
        }
        let limit = MAX_LOOKBACK_MINUTES as f64;
        check_below("interval_minutes", self.interval_minutes as f64, limit)?;
        let span = self.samples.saturating_sub(1) as f64 * self.interval_minutes as f64;
        check_below("path_span_minutes", span, limit)?;
        check_range("volatility", self.volatility)?;
        check_below("volatility", self.volatility.1, 1.0)?;
        check_range("trend_bound", (0.0, self.trend_bound))?;
        check_below("trend_bound", self.trend_bound, 1.0)?;
        check_range("volume", self.volume)?;
        if self.volume.0 <= 0.0 {
            return Err(invalid_range("volume", self.volume));
        }
        let most_trades = match self.trade_count {
            TradeCount::Fixed(n) => n,
            TradeCount::Range(min, max) if min > max => {
                return Err(invalid_range("trade_count", (min as f64, max as f64)));
            }
            TradeCount::Range(_, max) => max,
        };
        check_below("trade_count", most_trades as f64, MAX_TRADES as f64)?;
        if self.fee <= 0.0 || !self.fee.is_finite() {
            return Err(Error::NegZeroFee(self.fee));
        }
        check_range("funding_bound", (0.0, self.funding_bound))?;
        let (min, max) = self.hold_samples;
        if min == 0 || min > max {
            return Err(invalid_range("hold_samples", (min as f64, max as f64)));
        }
        let (min, max) = self.hold_days;
        if min == 0 || min > max {
            return Err(invalid_range("hold_days", (min as f64, max as f64)));
        }
        check_below("hold_days", max as f64, MAX_LOOKBACK_DAYS as f64)?;
        check_below("window_days", self.window_days as f64, MAX_LOOKBACK_DAYS as f64)?;
        if self.window_days <= self.recent_days_excluded {
            return Err(Error::InvalidWindow {
                window_days: self.window_days,
                excluded_days: self.recent_days_excluded,
            });
        }
        if self.periods_per_day == 0 {
            return Err(invalid_range("periods_per_day", (0.0, 0.0)));
        }
        check_range("price_jitter_pct", (0.0, self.price_jitter_pct))?;
        check_below("price_jitter_pct", self.price_jitter_pct, 100.0)
    }

    /// Returns the dataset shape.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the number of price samples.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Returns the spacing between consecutive price samples.
    pub fn interval(&self) -> Duration {
        Duration::minutes(self.interval_minutes)
    }

    /// Returns how far before `now` the generated data may reach: the path span or the calendar
    /// window (plus the day cut off by aligning on midnight), whichever is longer.
    pub fn lookback(&self) -> Duration {
        let path = self.interval() * self.samples.saturating_sub(1) as i32;
        let window = Duration::days(self.window_days as i64 + 1);
        path.max(window)
    }

    /// Returns the per-step volatility bounds, as fractions of the price.
    pub fn volatility(&self) -> (f64, f64) {
        self.volatility
    }

    /// Returns the maximum magnitude of the per-call trend, as a fraction of the price.
    pub fn trend_bound(&self) -> f64 {
        self.trend_bound
    }

    /// Returns the volume bounds.
    pub fn volume(&self) -> (f64, f64) {
        self.volume
    }

    /// Returns the trade count policy.
    pub fn trade_count(&self) -> TradeCount {
        self.trade_count
    }

    /// Returns the fee charged on every trade.
    pub fn fee(&self) -> f64 {
        self.fee
    }

    /// Returns the funding magnitude bound, in percent.
    pub fn funding_bound(&self) -> f64 {
        self.funding_bound
    }

    /// Returns the trade hold bounds, in samples.
    pub fn hold_samples(&self) -> (usize, usize) {
        self.hold_samples
    }

    /// Returns the number of samples kept free at each end of the path when placing trades.
    pub fn edge_margin(&self) -> usize {
        self.edge_margin
    }

    /// Returns the calendar look-back window, in days.
    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    /// Returns how many of the most recent days never start a trade.
    pub fn recent_days_excluded(&self) -> u32 {
        self.recent_days_excluded
    }

    /// Returns the trade hold bounds, in days.
    pub fn hold_days(&self) -> (u32, u32) {
        self.hold_days
    }

    /// Returns how many funding periods a calendar day holds.
    pub fn periods_per_day(&self) -> u32 {
        self.periods_per_day
    }

    /// Returns the price jitter bound of bar-chart trades, in percent.
    pub fn price_jitter_pct(&self) -> f64 {
        self.price_jitter_pct
    }
}

/// Builder for [`GeneratorConfig`]; `build` validates the result.
#[derive(Debug, Clone)]
pub struct GeneratorConfigBuilder {
    config: GeneratorConfig,
}

impl GeneratorConfigBuilder {
    /// Sets the number of price samples.
    pub fn samples(mut self, samples: usize) -> Self {
        self.config.samples = samples;
        self
    }

    /// Sets the sampling interval in minutes.
    pub fn interval_minutes(mut self, minutes: i64) -> Self {
        self.config.interval_minutes = minutes;
        self
    }

    /// Sets the per-step volatility bounds (fractions, e.g. `0.005` for 0.5%).
    pub fn volatility(mut self, min: f64, max: f64) -> Self {
        self.config.volatility = (min, max);
        self
    }

    /// Sets the trend magnitude bound (fraction).
    pub fn trend_bound(mut self, bound: f64) -> Self {
        self.config.trend_bound = bound;
        self
    }

    /// Sets the volume bounds.
    pub fn volume(mut self, min: f64, max: f64) -> Self {
        self.config.volume = (min, max);
        self
    }

    /// Sets the trade count policy.
    pub fn trade_count(mut self, count: TradeCount) -> Self {
        self.config.trade_count = count;
        self
    }

    /// Sets the fee charged on every trade.
    pub fn fee(mut self, fee: f64) -> Self {
        self.config.fee = fee;
        self
    }

    /// Sets the funding magnitude bound (percent).
    pub fn funding_bound(mut self, bound: f64) -> Self {
        self.config.funding_bound = bound;
        self
    }

    /// Sets the hold bounds in samples.
    pub fn hold_samples(mut self, min: usize, max: usize) -> Self {
        self.config.hold_samples = (min, max);
        self
    }

    /// Sets the edge margin in samples.
    pub fn edge_margin(mut self, margin: usize) -> Self {
        self.config.edge_margin = margin;
        self
    }

    /// Sets the calendar look-back window in days.
    pub fn window_days(mut self, days: u32) -> Self {
        self.config.window_days = days;
        self
    }

    /// Sets how many recent days never start a trade.
    pub fn recent_days_excluded(mut self, days: u32) -> Self {
        self.config.recent_days_excluded = days;
        self
    }

    /// Sets the hold bounds in days.
    pub fn hold_days(mut self, min: u32, max: u32) -> Self {
        self.config.hold_days = (min, max);
        self
    }

    /// Sets the funding periods per day.
    pub fn periods_per_day(mut self, periods: u32) -> Self {
        self.config.periods_per_day = periods;
        self
    }

    /// Sets the bar-chart price jitter bound (percent).
    pub fn price_jitter_pct(mut self, pct: f64) -> Self {
        self.config.price_jitter_pct = pct;
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> Result<GeneratorConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Fields of a [`GeneratorConfig`] as read, before validation.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct UncheckedConfig {
    mode: Mode,
    samples: usize,
    interval_minutes: i64,
    volatility: (f64, f64),
    trend_bound: f64,
    volume: (f64, f64),
    trade_count: TradeCount,
    fee: f64,
    funding_bound: f64,
    hold_samples: (usize, usize),
    edge_margin: usize,
    window_days: u32,
    recent_days_excluded: u32,
    hold_days: (u32, u32),
    periods_per_day: u32,
    price_jitter_pct: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<UncheckedConfig> for GeneratorConfig {
    type Error = Error;

    fn try_from(raw: UncheckedConfig) -> Result<Self> {
        let config = Self {
            mode: raw.mode,
            samples: raw.samples,
            interval_minutes: raw.interval_minutes,
            volatility: raw.volatility,
            trend_bound: raw.trend_bound,
            volume: raw.volume,
            trade_count: raw.trade_count,
            fee: raw.fee,
            funding_bound: raw.funding_bound,
            hold_samples: raw.hold_samples,
            edge_margin: raw.edge_margin,
            window_days: raw.window_days,
            recent_days_excluded: raw.recent_days_excluded,
            hold_days: raw.hold_days,
            periods_per_day: raw.periods_per_day,
            price_jitter_pct: raw.price_jitter_pct,
        };
        config.validate()?;
        Ok(config)
    }
}

fn invalid_range(name: &'static str, (min, max): (f64, f64)) -> Error {
    Error::InvalidRange { name, min, max }
}

fn check_range(name: &'static str, (min, max): (f64, f64)) -> Result<()> {
    if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
        return Err(invalid_range(name, (min, max)));
    }
    Ok(())
}

fn check_below(name: &'static str, value: f64, limit: f64) -> Result<()> {
    if value >= limit {
        return Err(Error::BoundTooLarge { name, value, limit });
    }
    Ok(())
}
