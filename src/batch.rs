//! Timelines for every pair of the instrument table.
//!
//! Each pair draws from its own `StdRng` seeded from the master seed and the pair's position in
//! [`Instrument::ALL`], so the output does not depend on scheduling. With the `parallel` feature
//! the pairs are generated on the `rayon` thread pool; the result is identical to the sequential
//! build for the same seed.

use chrono::{DateTime, Utc};
use rand::{SeedableRng, rngs::StdRng};
use tracing::debug;

use crate::engine::{GeneratorConfig, Instrument, Timeline};
use crate::errors::Result;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Seed of the pair at `index` for a master `seed`.
pub fn pair_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

fn generate_pair(
    index: usize,
    instrument: &Instrument,
    config: &GeneratorConfig,
    seed: u64,
    now: DateTime<Utc>,
) -> Result<Timeline> {
    let mut rng = StdRng::seed_from_u64(pair_seed(seed, index));
    Timeline::generate(instrument, config, &mut rng, now)
}

/// Generates one timeline per pair, in table order.
///
/// ### Arguments
/// * `config` - Settings shared by every pair.
/// * `seed` - Master seed.
/// * `now` - Anchor shared by every pair.
///
/// ### Returns
/// The timelines, or the configuration error.
pub fn generate_all(config: &GeneratorConfig, seed: u64, now: DateTime<Utc>) -> Result<Vec<Timeline>> {
    config.validate()?;

    #[cfg(feature = "parallel")]
    let timelines = Instrument::ALL
        .par_iter()
        .enumerate()
        .map(|(index, instrument)| generate_pair(index, instrument, config, seed, now))
        .collect::<Result<Vec<_>>>()?;

    #[cfg(not(feature = "parallel"))]
    let timelines = Instrument::ALL
        .iter()
        .enumerate()
        .map(|(index, instrument)| generate_pair(index, instrument, config, seed, now))
        .collect::<Result<Vec<_>>>()?;

    debug!(pairs = timelines.len(), seed, "generated all timelines");
    Ok(timelines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Mode;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp_secs(1_760_000_400).unwrap()
    }

    #[test]
    fn one_timeline_per_pair_in_order() {
        let timelines = generate_all(&GeneratorConfig::time_series(), 42, now()).unwrap();
        assert_eq!(timelines.len(), Instrument::ALL.len());
        for (timeline, instrument) in timelines.iter().zip(Instrument::ALL.iter()) {
            assert_eq!(timeline.symbol(), instrument.symbol());
            assert_eq!(timeline.points().len(), 100);
        }
    }

    #[test]
    fn pairs_match_their_own_seed() {
        let config = GeneratorConfig::bar_chart();
        let timelines = generate_all(&config, 7, now()).unwrap();
        let mut rng = StdRng::seed_from_u64(pair_seed(7, 2));
        let sol = Timeline::generate(&Instrument::ALL[2], &config, &mut rng, now()).unwrap();
        assert_eq!(timelines[2], sol);
        assert_eq!(timelines[2].mode(), Mode::BarChart);
    }

    #[test]
    fn repeatable_and_seed_sensitive() {
        let config = GeneratorConfig::time_series();
        let a = generate_all(&config, 1, now()).unwrap();
        let b = generate_all(&config, 1, now()).unwrap();
        let c = generate_all(&config, 2, now()).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn distinct_seeds_per_pair() {
        let seeds = (0..Instrument::ALL.len()).map(|i| pair_seed(0, i)).collect::<Vec<_>>();
        for (i, a) in seeds.iter().enumerate() {
            assert!(seeds[i + 1..].iter().all(|b| a != b));
        }
    }
}
