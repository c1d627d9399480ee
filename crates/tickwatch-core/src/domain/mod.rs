//! Domain types for the viewer pipeline.
//!
//! All types validate their invariants at construction. A [`PriceSeries`]
//! either carries complete OHLC bars in ascending date order or does not
//! exist; there is no partially shaped middle ground.

mod models;
mod symbol;
mod timestamp;

pub use models::{Bar, LookbackWindow, PriceSeries};
pub use symbol::{Symbol, SymbolNormalizer};
pub use timestamp::UtcDateTime;
