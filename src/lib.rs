//! # Trade Timeline: synthetic price paths and trades for dashboards
//!
//! **Trade Timeline** fabricates plausible, internally consistent trading data for a fixed set of
//! pairs: a price path, the trades placed on it, and the statistics a dashboard card shows.
//! Timestamps, prices and derived metrics always agree with each other, and every call takes an
//! explicit random source so a seed reproduces the whole dataset.
//!
//! Rendering is left to the caller: the crate hands over typed collections (or JSON with the
//! `serde` feature) and never draws anything.
//!
//! ## Core Components
//! | Component             | Description                                                                    |
//! |-----------------------|--------------------------------------------------------------------------------|
//! | **`Instrument`**      | The pair table and the base price of each pair.                               |
//! | **`GeneratorConfig`** | Sample count, interval, volatility, trade policy; validated by its builder.   |
//! | **`simulate_path`**   | Biased random walk of 15-minute `PricePoint`s ending at "now".                |
//! | **`synthesize_trades`** | `TradeEvent`s on path samples or on calendar days, sorted by start.         |
//! | **`reconcile`**       | Matches trade boundaries to the nearest sample and sets open/close markers.   |
//! | **`Metrics`**         | Current price, change, marker counts, long/short counts, average funding.    |
//! | **`Timeline`**        | Runs the pipeline for one pair and holds the finished dataset.                |
//!
//! ## Dataset Modes
//! | Mode             | Output                                                                            |
//! |------------------|-----------------------------------------------------------------------------------|
//! | **TimeSeries**   | 100 price points every 15 minutes, trades reconciled onto them.                   |
//! | **BarChart**     | Calendar-day trades over the last 30 days with duration and bar scale, no path.   |
//!
//! ## Getting Started
//! ```rust
//! use trade_timeline::prelude::*;
//! use chrono::Utc;
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let config = GeneratorConfig::time_series();
//! let timeline = generate_at("BTC/USDT", &config, &mut rng, Utc::now()).unwrap();
//!
//! for trade in timeline.trades() {
//!     println!(
//!         "#{} {:?} {} -> {} funding {:+.2}%",
//!         trade.id(),
//!         trade.side(),
//!         trade.start_time(),
//!         trade.end_time(),
//!         trade.funding_total()
//!     );
//! }
//! println!("{}", timeline.metrics());
//! ```
//!
//! ### Output:
//! ```bash
//! === Timeline Metrics ===
//! Current Price: 67412.87
//! Change: +0.21%
//! Markers (open/close): 5/5
//!
//! Trades: 5 (3 long / 2 short)
//! Average Funding: +0.34%
//! Win Rate: 60.00%
//! Fees paid: 0.50
//! ```
//!
//! ## Features
//! | Feature      | Description                                                                  |
//! |--------------|------------------------------------------------------------------------------|
//! | `serde`      | Serialize/deserialize every type, `Timeline::to_json`.                       |
//! | `parallel`   | Generate all pairs on the [`rayon`](https://crates.io/crates/rayon) pool.   |
//! | `wasm`       | Browser builds through `getrandom/wasm_js`.                                  |
//!
//! ## Logging
//! Generators emit [`tracing`](https://crates.io/crates/tracing) events (`debug` per stage,
//! `trace` per trade, `warn` for trades without a matching price sample). Install any subscriber
//! to see them.
//!
//! ## License
//! MIT
#![warn(missing_docs)]

/// Generator components: instruments, configuration, price path, trades, reconciliation.
pub mod engine;

/// Error types for the library.
pub mod errors;

/// Summary statistics of a timeline.
pub mod metrics;

/// Timelines for every pair of the instrument table.
pub mod batch;

/// Utility functions and helpers.
mod utils;

/// Re-exports of commonly used types and traits for convenience.
pub mod prelude {
    pub use super::*;
    pub use crate::batch::*;
    pub use crate::engine::*;
    pub use crate::errors::*;
    pub use crate::metrics::*;
}

use std::ops::{Add, Div, Mul, Sub};

/// Trait for performing percentage-based calculations.
///
/// This trait provides methods to move a value by a percentage and to measure the percentage
/// change between two values.
pub trait PercentCalculus<Rhs = Self> {
    /// Adds a percentage to the value.
    ///
    /// ### Arguments
    /// * `rhs` - The percentage to add (e.g., 10.0 for 10%, -2.0 for -2%).
    ///
    /// ### Returns
    /// The value moved by the given percentage.
    fn addpercent(self, rhs: Rhs) -> Self;

    /// Calculates the percentage change between two values.
    ///
    /// ### Arguments
    /// * `new` - The new value to compare with.
    ///
    /// ### Returns
    /// The percentage change from the original value to the new value, or `0.0` when the
    /// original value is zero.
    fn change(self, new: Self) -> Self;
}

impl PercentCalculus for f64 {
    fn addpercent(self, percent: Self) -> Self {
        self.add(self.mul(percent.div(100.0)))
    }

    fn change(self, new: Self) -> Self {
        let change = new.sub(self).div(self).mul(100.0);
        if change.is_finite() { change } else { 0.0 }
    }
}
