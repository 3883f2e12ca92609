use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::debug;

use crate::engine::{GeneratorConfig, PricePoint};
use crate::utils::{round2, uniform};

/// Simulates a biased random walk of `config.samples()` points ending at `now`.
///
/// One trend is drawn per call and applied to every step on top of the per-step noise:
/// `price *= 1 + noise + trend`. The running price keeps full precision and only the stored
/// value is rounded to cents, so rounding never compounds across steps.
///
/// Prices stay positive for any configuration that passes validation (both magnitudes are below
/// 100%), but this is an expectation of the parameter ranges rather than a hard guarantee.
///
/// ### Arguments
/// * `rng` - Random source; pass a seeded generator for reproducible paths.
/// * `base_price` - Price the walk starts from.
/// * `config` - Sample count, interval, volatility, trend and volume bounds.
/// * `now` - Timestamp of the last point.
///
/// ### Returns
/// The points in strictly increasing timestamp order.
pub fn simulate_path<R: Rng + ?Sized>(
    rng: &mut R,
    base_price: f64,
    config: &GeneratorConfig,
    now: DateTime<Utc>,
) -> Vec<PricePoint> {
    let samples = config.samples();
    let interval = config.interval();
    let bound = config.trend_bound();
    let trend = uniform(rng, (-bound, bound));

    let mut price = base_price;
    let points = (0..samples)
        .map(|i| {
            let volatility = uniform(rng, config.volatility());
            let noise = uniform(rng, (-volatility, volatility));
            price *= 1.0 + noise + trend;

            let steps_back = (samples - 1 - i) as i32;
            let timestamp = now - interval * steps_back;
            let volume = round2(uniform(rng, config.volume()));
            PricePoint::from((timestamp, round2(price), volume))
        })
        .collect::<Vec<_>>();

    debug!(samples, base_price, trend, last_price = price, "simulated price path");
    points
}
