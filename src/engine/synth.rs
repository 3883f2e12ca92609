use chrono::{DateTime, Duration, NaiveTime, Utc};
use rand::Rng;
use tracing::{debug, trace, warn};

use crate::PercentCalculus;
use super::trade::sort_and_number;
use crate::engine::{BarMetrics, GeneratorConfig, Mode, TradeEvent, TradeSide};
use crate::utils::{round2, uniform, uniform_count};

/// Synthesizes the trades of one generation call, sorted by start time and numbered from 1.
///
/// The timing policy follows `config.mode()`:
/// - [`Mode::TimeSeries`]: trades start and end on sample indices of the price path ending at
///   `now`.
/// - [`Mode::BarChart`]: trades span whole calendar days of the look-back window ending at
///   midnight of `now`.
///
/// A zero count yields an empty set; this function never fails.
pub fn synthesize_trades<R: Rng + ?Sized>(
    rng: &mut R,
    base_price: f64,
    config: &GeneratorConfig,
    now: DateTime<Utc>,
) -> Vec<TradeEvent> {
    let count = config.trade_count().draw(rng);
    let mut trades = match config.mode() {
        Mode::TimeSeries => {
            let Some(layout) = IndexLayout::new(config) else {
                if count > 0 {
                    warn!(samples = config.samples(), count, "price path too short to place trades");
                }
                return Vec::new();
            };
            (0..count).map(|_| window_trade(rng, &layout, config, now)).collect::<Vec<_>>()
        }
        Mode::BarChart => (0..count)
            .map(|_| calendar_trade(rng, base_price, config, now))
            .collect::<Vec<_>>(),
    };

    sort_and_number(&mut trades);
    debug!(mode = ?config.mode(), count = trades.len(), "synthesized trades");
    trades
}

/// Index space a window-relative trade may start in.
struct IndexLayout {
    last: usize,
    first_start: usize,
    last_start: usize,
}

impl IndexLayout {
    fn new(config: &GeneratorConfig) -> Option<Self> {
        let last = config.samples().checked_sub(1)?;
        if last == 0 {
            return None;
        }
        // the margin shrinks on short paths so at least one start index remains
        let margin = config.edge_margin().min((last - 1) / 2);
        Some(Self {
            last,
            first_start: margin,
            last_start: last - 1 - margin,
        })
    }
}

fn draw_side<R: Rng + ?Sized>(rng: &mut R) -> TradeSide {
    if rng.random_bool(0.5) {
        TradeSide::Long
    } else {
        TradeSide::Short
    }
}

fn draw_funding<R: Rng + ?Sized>(rng: &mut R, config: &GeneratorConfig) -> f64 {
    let bound = config.funding_bound();
    round2(uniform(rng, (-bound, bound)))
}

/// Window-relative policy: start on an interior sample, hold for a bounded number of samples,
/// clamp the end to the last sample.
fn window_trade<R: Rng + ?Sized>(
    rng: &mut R,
    layout: &IndexLayout,
    config: &GeneratorConfig,
    now: DateTime<Utc>,
) -> TradeEvent {
    let (min_hold, max_hold) = config.hold_samples();
    let start = uniform_count(rng, layout.first_start..=layout.last_start);
    let hold = uniform_count(rng, min_hold..=max_hold);
    let end = start.saturating_add(hold).min(layout.last);

    let interval = config.interval();
    let first = now - interval * layout.last as i32;
    let start_time = first + interval * start as i32;
    let end_time = first + interval * end as i32;

    let side = draw_side(rng);
    let funding = draw_funding(rng, config);
    let periods = (end - start) as u32;
    trace!(start, end, ?side, funding, "window trade");

    (side, start_time, end_time, funding, periods, config.fee()).into()
}

/// Clamps a calendar trade to its look-back window.
///
/// `start_day` counts days from `window_start` and is capped to the last day of the window; the
/// end never passes `window_start + window_days`. The returned duration is recomputed from the
/// clamped span, so a trade starting on day 28 of a 30-day window with an 8-day hold lasts 2 days.
///
/// ### Returns
/// `(start_time, end_time, duration_days)` with `start_time < end_time` whenever `window_days > 0`.
pub fn calendar_span(
    window_start: DateTime<Utc>,
    window_days: u32,
    start_day: u32,
    hold_days: u32,
) -> (DateTime<Utc>, DateTime<Utc>, i64) {
    let window_end = window_start + Duration::days(window_days as i64);
    let start_day = start_day.min(window_days.saturating_sub(1));
    let start_time = window_start + Duration::days(start_day as i64);
    let end_time = (start_time + Duration::days(hold_days as i64)).min(window_end);
    (start_time, end_time, (end_time - start_time).num_days())
}

/// Start of the calendar look-back window: `window_days` before midnight UTC of `now`.
pub fn window_start(now: DateTime<Utc>, window_days: u32) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc() - Duration::days(window_days as i64)
}

/// Calendar-relative policy: start on a day outside the most recent ones, hold for whole days,
/// derive periods and bar metrics from the clamped span.
fn calendar_trade<R: Rng + ?Sized>(
    rng: &mut R,
    base_price: f64,
    config: &GeneratorConfig,
    now: DateTime<Utc>,
) -> TradeEvent {
    let window_days = config.window_days();
    let open_days = window_days.saturating_sub(config.recent_days_excluded()).max(1) as usize;
    let (min_hold, max_hold) = config.hold_days();

    let start_day = uniform_count(rng, 0..=open_days - 1) as u32;
    let hold = uniform_count(rng, min_hold as usize..=max_hold as usize) as u32;
    let (start_time, end_time, duration_days) =
        calendar_span(window_start(now, window_days), window_days, start_day, hold);

    let side = draw_side(rng);
    let funding = draw_funding(rng, config);
    let periods = (duration_days as u32).saturating_mul(config.periods_per_day());

    let jitter = config.price_jitter_pct();
    let start_price = round2(base_price.addpercent(uniform(rng, (-jitter, jitter))));
    let end_price = round2(base_price.addpercent(uniform(rng, (-jitter, jitter))));
    trace!(start_day, hold, duration_days, ?side, funding, "calendar trade");

    let mut trade: TradeEvent = (side, start_time, end_time, funding, periods, config.fee()).into();
    trade.set_start_price(Some(start_price));
    trade.set_end_price(Some(end_price));
    trade.set_bar(BarMetrics {
        duration_days,
        profit_loss_scale: profit_loss_scale(funding),
        start_label: start_time.format("%b %d").to_string(),
    });
    trade
}

/// Bar size factor for a funding result: `1 + |funding| / 2`, rounded to cents.
pub fn profit_loss_scale(funding: f64) -> f64 {
    round2(1.0 + funding.abs() / 2.0)
}
