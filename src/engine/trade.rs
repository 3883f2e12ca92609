use chrono::{DateTime, Utc};

/// Direction of a simulated position.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    /// Profits when the price rises.
    Long,
    /// Profits when the price falls.
    Short,
}

/// Display-only metrics of a bar-chart trade.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct BarMetrics {
    /// Whole days between start and end.
    pub duration_days: i64,
    /// Bar size factor; grows with the funding magnitude and is never a financial quantity.
    pub profit_loss_scale: f64,
    /// Start date label, e.g. `Oct 03`.
    pub start_label: String,
}

/// One simulated position.
///
/// `start_price`/`end_price` stay `None` until a price is known for the boundary: the
/// reconciler fills them from the price path, the bar-chart synthesizer sets them directly.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TradeEvent {
    id: u32,
    side: TradeSide,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    funding_total: f64,
    periods: u32,
    fee: f64,
    start_price: Option<f64>,
    end_price: Option<f64>,
    bar: Option<BarMetrics>,
}

type T1 = (TradeSide, DateTime<Utc>, DateTime<Utc>, f64, u32, f64);
impl From<T1> for TradeEvent {
    fn from((side, start_time, end_time, funding_total, periods, fee): T1) -> Self {
        Self {
            id: 0,
            side,
            start_time,
            end_time,
            funding_total,
            periods,
            fee,
            start_price: None,
            end_price: None,
            bar: None,
        }
    }
}

impl TradeEvent {
    /// Returns the id, unique within one generation call (1-based, in start order).
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn side(&self) -> TradeSide {
        self.side
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    /// Returns the fabricated net funding result, in percent.
    pub fn funding_total(&self) -> f64 {
        self.funding_total
    }

    /// Returns the number of sampling periods the trade spans.
    pub fn periods(&self) -> u32 {
        self.periods
    }

    pub fn fee(&self) -> f64 {
        self.fee
    }

    pub fn start_price(&self) -> Option<f64> {
        self.start_price
    }

    pub fn end_price(&self) -> Option<f64> {
        self.end_price
    }

    /// Returns the bar metrics, present on bar-chart trades only.
    pub fn bar(&self) -> Option<&BarMetrics> {
        self.bar.as_ref()
    }

    pub(crate) fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    pub(crate) fn set_start_price(&mut self, price: Option<f64>) {
        self.start_price = price;
    }

    pub(crate) fn set_end_price(&mut self, price: Option<f64>) {
        self.end_price = price;
    }

    pub(crate) fn set_bar(&mut self, bar: BarMetrics) {
        self.bar = Some(bar);
    }
}

/// Sorts trades by start time and numbers them from 1 in that order.
pub(crate) fn sort_and_number(trades: &mut [TradeEvent]) {
    trades.sort_by_key(|t| t.start_time);
    for (i, trade) in trades.iter_mut().enumerate() {
        trade.set_id(i as u32 + 1);
    }
}
