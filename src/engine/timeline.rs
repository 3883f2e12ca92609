use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::debug;

use crate::engine::*;
use crate::errors::{Error, Result};
use crate::metrics::Metrics;

/// The finished dataset of one pair, ready to hand to a renderer.
///
/// In [`Mode::TimeSeries`] it holds the price path with trades reconciled onto it; in
/// [`Mode::BarChart`] the path is empty and every trade carries its [`BarMetrics`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    symbol: String,
    mode: Mode,
    generated_at: DateTime<Utc>,
    points: Vec<PricePoint>,
    trades: Vec<TradeEvent>,
    metrics: Metrics,
}

impl Timeline {
    /// Generates the timeline of a pair from the instrument table.
    ///
    /// ### Arguments
    /// * `instrument` - Pair and base price.
    /// * `config` - Generator settings; validated before anything is drawn.
    /// * `rng` - Random source; the same seed, config and `now` give the same timeline.
    /// * `now` - Anchor of every timestamp.
    ///
    /// ### Returns
    /// The timeline, or a configuration error. An anchor whose look-back would precede the
    /// earliest representable time is rejected with [`Error::AnchorOutOfRange`].
    ///
    /// ### Example
    /// ```rust
    /// use trade_timeline::prelude::*;
    /// use chrono::Utc;
    /// use rand::{SeedableRng, rngs::StdRng};
    ///
    /// let btc = Instrument::lookup("BTC/USDT").unwrap();
    /// let mut rng = StdRng::seed_from_u64(42);
    /// let timeline = Timeline::generate(&btc, &GeneratorConfig::time_series(), &mut rng, Utc::now()).unwrap();
    ///
    /// assert_eq!(timeline.points().len(), 100);
    /// println!("{}", timeline.metrics());
    /// ```
    pub fn generate<R: Rng + ?Sized>(
        instrument: &Instrument,
        config: &GeneratorConfig,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        Self::from_base_price(instrument.symbol(), instrument.base_price(), config, rng, now)
    }

    /// Generates a timeline for any label and base price, outside the instrument table.
    pub fn from_base_price<R: Rng + ?Sized>(
        symbol: impl Into<String>,
        base_price: f64,
        config: &GeneratorConfig,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        if base_price <= 0.0 || !base_price.is_finite() {
            return Err(Error::NegZeroBasePrice(base_price));
        }
        config.validate()?;
        if now.checked_sub_signed(config.lookback()).is_none() {
            return Err(Error::AnchorOutOfRange(now));
        }

        let symbol = symbol.into();
        let (points, trades) = match config.mode() {
            Mode::TimeSeries => {
                let mut points = simulate_path(rng, base_price, config, now);
                let mut trades = synthesize_trades(rng, base_price, config, now);
                reconcile(&mut points, &mut trades, config.interval());
                (points, trades)
            }
            Mode::BarChart => (Vec::new(), synthesize_trades(rng, base_price, config, now)),
        };
        let metrics = Metrics::new(&points, &trades);
        debug!(%symbol, mode = ?config.mode(), points = points.len(), trades = trades.len(), "generated timeline");

        Ok(Self {
            symbol,
            mode: config.mode(),
            generated_at: now,
            points,
            trades,
            metrics,
        })
    }

    /// Returns the pair symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the dataset shape.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the anchor every timestamp derives from.
    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Returns the price path; empty in bar-chart mode.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Returns the trades sorted by start time.
    pub fn trades(&self) -> &[TradeEvent] {
        &self.trades
    }

    /// Returns the summary statistics.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Consumes the timeline into its path, trades and metrics.
    pub fn into_parts(self) -> (Vec<PricePoint>, Vec<TradeEvent>, Metrics) {
        (self.points, self.trades, self.metrics)
    }

    /// Serializes the timeline to compact JSON.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Error::from)
    }

    /// Serializes the timeline to indented JSON.
    #[cfg(feature = "serde")]
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::from)
    }
}

/// Looks up `symbol` and generates its timeline anchored at the current time.
pub fn generate<R: Rng + ?Sized>(symbol: &str, config: &GeneratorConfig, rng: &mut R) -> Result<Timeline> {
    generate_at(symbol, config, rng, Utc::now())
}

/// Looks up `symbol` and generates its timeline anchored at `now`.
pub fn generate_at<R: Rng + ?Sized>(
    symbol: &str,
    config: &GeneratorConfig,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<Timeline> {
    let instrument = Instrument::lookup(symbol)?;
    Timeline::generate(&instrument, config, rng, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rand::{SeedableRng, rngs::StdRng};

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp_secs(1_760_000_400).unwrap()
    }

    #[test]
    fn time_series_timeline() {
        let mut rng = StdRng::seed_from_u64(42);
        let timeline = generate_at("SOL/USDT", &GeneratorConfig::time_series(), &mut rng, now()).unwrap();

        assert_eq!(timeline.symbol(), "SOL/USDT");
        assert_eq!(timeline.mode(), Mode::TimeSeries);
        assert_eq!(timeline.generated_at(), now());
        assert_eq!(timeline.points().len(), 100);
        assert!((3..=7).contains(&timeline.trades().len()));

        for trade in timeline.trades() {
            let start = trade.start_price().unwrap();
            let end = trade.end_price().unwrap();
            let open = timeline.points().iter().find(|p| p.timestamp() == trade.start_time()).unwrap();
            let close = timeline.points().iter().find(|p| p.timestamp() == trade.end_time()).unwrap();
            assert_eq!(open.open_marker(), Some(start));
            assert_eq!(close.close_marker(), Some(end));
        }

        let metrics = timeline.metrics();
        assert_eq!(metrics, &Metrics::from(&timeline));
        assert_eq!(metrics.current_price(), timeline.points()[99].price());
        assert_eq!(metrics.longs() + metrics.shorts(), timeline.trades().len());
        assert!(metrics.open_markers() >= 1 && metrics.open_markers() <= timeline.trades().len());
    }

    #[test]
    fn flat_timeline_without_trades() {
        let config = GeneratorConfig::builder(Mode::TimeSeries)
            .samples(5)
            .volatility(0.0, 0.0)
            .trend_bound(0.0)
            .trade_count(TradeCount::Fixed(0))
            .build()
            .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let timeline = Timeline::from_base_price("TEST", 100.0, &config, &mut rng, now()).unwrap();

        assert_eq!(timeline.points().len(), 5);
        assert!(timeline.points().iter().all(|p| p.price() == 100.0));
        assert!(timeline.trades().is_empty());
        assert_eq!(timeline.metrics().open_markers(), 0);
        assert_eq!(timeline.metrics().close_markers(), 0);
        assert_eq!(timeline.metrics().change_pct(), 0.0);
        assert_eq!(timeline.metrics().avg_funding(), 0.0);
    }

    #[test]
    fn bar_chart_timeline() {
        let mut rng = StdRng::seed_from_u64(42);
        let timeline = generate_at("ETH/USDT", &GeneratorConfig::bar_chart(), &mut rng, now()).unwrap();

        assert_eq!(timeline.mode(), Mode::BarChart);
        assert!(timeline.points().is_empty());
        assert!((8..=15).contains(&timeline.trades().len()));
        assert!(timeline.trades().iter().all(|t| t.bar().is_some()));
        assert!(timeline.trades().iter().all(|t| t.start_price().is_some() && t.end_price().is_some()));
        assert!(
            timeline
                .trades()
                .iter()
                .all(|t| t.end_time() <= now() && now() - t.start_time() <= Duration::days(31))
        );
        assert_eq!(timeline.metrics().current_price(), 0.0);
        assert!(timeline.metrics().avg_duration_days() >= 1.0);
    }

    #[test]
    fn same_seed_same_timeline() {
        let config = GeneratorConfig::time_series();
        let a = generate_at("BNB/USDT", &config, &mut StdRng::seed_from_u64(3), now()).unwrap();
        let b = generate_at("BNB/USDT", &config, &mut StdRng::seed_from_u64(3), now()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_unknown_pair_and_bad_base_price() {
        let mut rng = StdRng::seed_from_u64(3);
        let config = GeneratorConfig::time_series();
        assert!(matches!(
            generate_at("XYZ/USDT", &config, &mut rng, now()),
            Err(Error::UnknownInstrument(_))
        ));
        assert!(matches!(
            Timeline::from_base_price("X", 0.0, &config, &mut rng, now()),
            Err(Error::NegZeroBasePrice(_))
        ));
        assert!(matches!(
            Timeline::from_base_price("X", f64::NAN, &config, &mut rng, now()),
            Err(Error::NegZeroBasePrice(_))
        ));
    }

    #[test]
    fn rejects_anchor_without_lookback_room() {
        let mut rng = StdRng::seed_from_u64(3);
        for config in [GeneratorConfig::time_series(), GeneratorConfig::bar_chart()] {
            assert!(matches!(
                Timeline::from_base_price("X", 100.0, &config, &mut rng, DateTime::<Utc>::MIN_UTC),
                Err(Error::AnchorOutOfRange(_))
            ));
        }
    }

    #[test]
    fn longest_valid_spans_generate() {
        let config = GeneratorConfig::builder(Mode::BarChart)
            .window_days(3_649)
            .hold_days(1, 3_649)
            .trade_count(TradeCount::Fixed(20))
            .build()
            .unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let timeline = Timeline::from_base_price("X", 100.0, &config, &mut rng, now()).unwrap();
        assert!(timeline.trades().iter().all(|t| t.end_time() <= now()));

        let config = GeneratorConfig::builder(Mode::TimeSeries)
            .samples(2)
            .interval_minutes(5_255_999)
            .build()
            .unwrap();
        let timeline = Timeline::from_base_price("X", 100.0, &config, &mut rng, now()).unwrap();
        assert_eq!(timeline.points()[0].timestamp(), now() - Duration::minutes(5_255_999));
    }

    #[test]
    fn into_parts_hands_over_collections() {
        let mut rng = StdRng::seed_from_u64(9);
        let timeline = generate("LINK/USDT", &GeneratorConfig::time_series(), &mut rng).unwrap();
        let trades = timeline.trades().len();
        let (points, parts_trades, metrics) = timeline.into_parts();
        assert_eq!(points.len(), 100);
        assert_eq!(parts_trades.len(), trades);
        assert_eq!(metrics.trades(), trades);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_roundtrip() {
        let mut rng = StdRng::seed_from_u64(4);
        let timeline = generate_at("AVAX/USDT", &GeneratorConfig::bar_chart(), &mut rng, now()).unwrap();
        let json = timeline.to_json().unwrap();
        assert!(json.contains("\"symbol\":\"AVAX/USDT\""));
        let back: Timeline = serde_json::from_str(&json).unwrap();
        assert_eq!(back.trades().len(), timeline.trades().len());
        assert!(timeline.to_json_pretty().unwrap().contains('\n'));
    }
}
