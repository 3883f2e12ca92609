//! Summary statistics of a generated timeline.
//!
//! This module derives what a dashboard card shows next to its chart:
//! - Current and previous price, and the change between them
//! - Open and close marker counts
//! - Long and short trade counts
//! - Average funding and win rate
//!
//! Every ratio is guarded: an empty path or trade set yields `0.0`, never NaN or infinity.

use std::fmt;

use crate::PercentCalculus;
use crate::engine::{PricePoint, Timeline, TradeEvent, TradeSide};

/// Display statistics derived from a price path and its trades.
///
/// `Metrics` is a pure projection: building it never modifies the collections it reads.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    current_price: f64,
    previous_price: f64,
    change_pct: f64,
    points: usize,
    open_markers: usize,
    close_markers: usize,
    trades: usize,
    longs: usize,
    shorts: usize,
    avg_funding: f64,
    win_rate: f64,
    avg_duration_days: f64,
    total_fees: f64,
}

impl From<&Timeline> for Metrics {
    fn from(value: &Timeline) -> Self {
        Self::new(value.points(), value.trades())
    }
}

impl Metrics {
    /// Computes the metrics of a path and a trade set; either may be empty.
    pub fn new(points: &[PricePoint], trades: &[TradeEvent]) -> Self {
        let price_at = |back: usize| {
            points
                .len()
                .checked_sub(back)
                .and_then(|i| points.get(i))
                .map_or(0.0, |p| p.price())
        };
        let current_price = price_at(1);
        let previous_price = price_at(2);

        let longs = trades.iter().filter(|t| t.side() == TradeSide::Long).count();
        let durations = trades
            .iter()
            .filter_map(|t| t.bar())
            .map(|bar| bar.duration_days as f64)
            .collect::<Vec<_>>();

        Self {
            current_price,
            previous_price,
            change_pct: previous_price.change(current_price),
            points: points.len(),
            open_markers: points.iter().filter(|p| p.open_marker().is_some()).count(),
            close_markers: points.iter().filter(|p| p.close_marker().is_some()).count(),
            trades: trades.len(),
            longs,
            shorts: trades.len() - longs,
            avg_funding: mean(trades.iter().map(|t| t.funding_total()), trades.len()),
            win_rate: mean(
                trades.iter().map(|t| if t.funding_total() > 0.0 { 100.0 } else { 0.0 }),
                trades.len(),
            ),
            avg_duration_days: mean(durations.iter().copied(), durations.len()),
            total_fees: trades.iter().map(|t| t.fee()).sum(),
        }
    }

    /// Returns the last price of the path, `0.0` for an empty path.
    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    /// Returns the second-to-last price of the path, `0.0` when there is none.
    pub fn previous_price(&self) -> f64 {
        self.previous_price
    }

    /// Returns the change from the previous to the current price, in percent.
    ///
    /// `0.0` when the previous price is zero (including paths shorter than two points).
    pub fn change_pct(&self) -> f64 {
        self.change_pct
    }

    /// Returns the number of price points.
    pub fn points(&self) -> usize {
        self.points
    }

    /// Returns the number of points carrying an open marker.
    pub fn open_markers(&self) -> usize {
        self.open_markers
    }

    /// Returns the number of points carrying a close marker.
    pub fn close_markers(&self) -> usize {
        self.close_markers
    }

    /// Returns the number of trades.
    pub fn trades(&self) -> usize {
        self.trades
    }

    /// Returns the number of long trades.
    pub fn longs(&self) -> usize {
        self.longs
    }

    /// Returns the number of short trades.
    pub fn shorts(&self) -> usize {
        self.shorts
    }

    /// Returns the mean funding across all trades, `0.0` for an empty set.
    pub fn avg_funding(&self) -> f64 {
        self.avg_funding
    }

    /// Returns the share of trades with a positive funding result, in percent.
    pub fn win_rate(&self) -> f64 {
        self.win_rate
    }

    /// Returns the mean duration of bar-chart trades in days, `0.0` without any.
    pub fn avg_duration_days(&self) -> f64 {
        self.avg_duration_days
    }

    /// Returns the sum of fees over all trades.
    pub fn total_fees(&self) -> f64 {
        self.total_fees
    }
}

/// Sum of `values` divided by `count`, `0.0` when `count` is zero.
fn mean(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    values.sum::<f64>() / count as f64
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Timeline Metrics ===")?;
        writeln!(f, "Current Price: {:.2}", self.current_price)?;
        writeln!(f, "Change: {:+.2}%", self.change_pct)?;
        writeln!(f, "Markers (open/close): {}/{}", self.open_markers, self.close_markers)?;
        #[allow(clippy::writeln_empty_string)]
        writeln!(f, "")?;
        writeln!(f, "Trades: {} ({} long / {} short)", self.trades, self.longs, self.shorts)?;
        writeln!(f, "Average Funding: {:+.2}%", self.avg_funding)?;
        writeln!(f, "Win Rate: {:.2}%", self.win_rate)?;
        if self.avg_duration_days > 0.0 {
            writeln!(f, "Average Duration: {:.1} days", self.avg_duration_days)?;
        }
        writeln!(f, "Fees paid: {:.2}", self.total_fees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::BarMetrics;
    use chrono::{DateTime, Duration};

    fn point(minutes: i64, price: f64) -> PricePoint {
        let ts = DateTime::from_timestamp_secs(1_760_000_400).unwrap() + Duration::minutes(minutes);
        PricePoint::from((ts, price, 1.0))
    }

    fn trade(side: TradeSide, funding: f64) -> TradeEvent {
        let start = DateTime::from_timestamp_secs(1_760_000_400).unwrap();
        (side, start, start + Duration::minutes(45), funding, 3, 0.1).into()
    }

    #[test]
    fn empty_inputs_are_neutral() {
        let metrics = Metrics::new(&[], &[]);
        assert_eq!(metrics.current_price(), 0.0);
        assert_eq!(metrics.previous_price(), 0.0);
        assert_eq!(metrics.change_pct(), 0.0);
        assert_eq!(metrics.avg_funding(), 0.0);
        assert_eq!(metrics.win_rate(), 0.0);
        assert_eq!(metrics.avg_duration_days(), 0.0);
        assert_eq!(metrics.total_fees(), 0.0);
    }

    #[test]
    fn single_point_has_defined_change() {
        let metrics = Metrics::new(&[point(0, 105.0)], &[]);
        assert_eq!(metrics.current_price(), 105.0);
        assert_eq!(metrics.previous_price(), 0.0);
        assert_eq!(metrics.change_pct(), 0.0);
        assert!(!metrics.change_pct().is_nan());
    }

    #[test]
    fn change_between_last_two_points() {
        let points = [point(0, 90.0), point(15, 100.0), point(30, 110.0)];
        let metrics = Metrics::new(&points, &[]);
        assert_eq!(metrics.current_price(), 110.0);
        assert_eq!(metrics.previous_price(), 100.0);
        assert!((metrics.change_pct() - 10.0).abs() < 1e-9);
        assert_eq!(metrics.points(), 3);
    }

    #[test]
    fn counts_markers() {
        let mut points = [point(0, 90.0), point(15, 100.0), point(30, 110.0)];
        points[0].mark_open();
        points[2].mark_open();
        points[2].mark_close();
        let metrics = Metrics::new(&points, &[]);
        assert_eq!(metrics.open_markers(), 2);
        assert_eq!(metrics.close_markers(), 1);
    }

    #[test]
    fn trade_statistics() {
        let trades = [
            trade(TradeSide::Long, 1.5),
            trade(TradeSide::Short, -0.5),
            trade(TradeSide::Long, 2.0),
            trade(TradeSide::Long, 0.0),
        ];
        let metrics = Metrics::new(&[], &trades);
        assert_eq!(metrics.trades(), 4);
        assert_eq!(metrics.longs(), 3);
        assert_eq!(metrics.shorts(), 1);
        assert_eq!(metrics.avg_funding(), 0.75);
        assert_eq!(metrics.win_rate(), 50.0);
        assert!((metrics.total_fees() - 0.4).abs() < 1e-9);
        assert_eq!(metrics.avg_duration_days(), 0.0);
    }

    #[test]
    fn bar_durations() {
        let mut trades = [trade(TradeSide::Long, 1.0), trade(TradeSide::Short, -1.0)];
        for (trade, days) in trades.iter_mut().zip([2, 5]) {
            trade.set_bar(BarMetrics {
                duration_days: days,
                profit_loss_scale: 1.5,
                start_label: "Oct 01".to_string(),
            });
        }
        let metrics = Metrics::new(&[], &trades);
        assert_eq!(metrics.avg_duration_days(), 3.5);
    }

    #[test]
    fn display_summary() {
        let metrics = Metrics::new(&[point(0, 100.0), point(15, 101.0)], &[trade(TradeSide::Long, 1.0)]);
        let text = metrics.to_string();
        assert!(text.starts_with("=== Timeline Metrics ==="));
        assert!(text.contains("Current Price: 101.00"));
        assert!(text.contains("Change: +1.00%"));
        assert!(text.contains("Trades: 1 (1 long / 0 short)"));
        assert!(!text.contains("Average Duration"));
    }
}
