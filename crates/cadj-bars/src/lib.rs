//! cadj-bars
//!
//! Price-bar data model for the corporate-action adjustment workspace.
//!
//! This crate owns the bar records and the validated daily-series container.
//! It does **not**:
//! - read vendor file formats (callers supply bars)
//! - derive adjustment factors (that is `cadj-factor`)
//! - know anything about corporate actions (that is `cadj-events`)

mod bar;
mod display;
mod series;

pub use bar::{AdjustedBar, DailyBar, TimedBar};
pub use display::DisplayBar;
pub use series::{AdjustedSeries, DailySeries, SeriesError};
