//! Core generator components.
//!
//! This module provides the building blocks of a timeline:
//! - `Instrument`: the pair table and base prices.
//! - `GeneratorConfig`: every tunable constant and the dataset `Mode`.
//! - `simulate_path`: a biased random walk of `PricePoint`s.
//! - `synthesize_trades`: `TradeEvent`s placed on the path's sample indices or on calendar days.
//! - `reconcile`: aligns trade boundaries with the path and sets the markers.
//! - `Timeline`: runs the pipeline and holds the finished dataset.

mod config;
mod instrument;
mod path;
mod point;
mod reconcile;
mod synth;
mod timeline;
mod trade;

pub use config::*;
pub use instrument::*;
pub use path::*;
pub use point::*;
pub use reconcile::*;
pub use synth::*;
pub use timeline::*;
pub use trade::*;
