//! cadj-factor
//!
//! The adjustment core: from a daily price series and its corporate-action
//! history to
//! - a fully back-adjusted OHLCV series (event-resolution path), and
//! - a reusable per-event factor table applicable to any other price series
//!   of the same symbol by calendar-aligned merge (factor-resolution path).
//!
//! The two paths stay distinct on purpose: the first rescales every OHLCV
//! column, the second only attaches factor columns and leaves prices to the
//! caller. Pure deterministic logic: no IO, no clock, no shared state;
//! "today" is always an explicit `as_of` argument.

mod adjust;
mod derive;
mod merge;
mod policy;
mod table;

pub use adjust::{adjust, AdjustError};
pub use derive::{derive_factors, FactorError};
pub use merge::{adjust_with_factor, FactoredBar};
pub use policy::AdjustPolicy;
pub use table::{FactorRow, FactorTable};
