//! cadj-events
//!
//! Corporate-action records and their normalization.
//!
//! - raw wire shape as supplied by the upstream feed
//! - fail-fast validation into [`CorporateAction`]
//! - derived per-record quantities (net cash out, share multiplier)
//! - the single-event adjusted-close transform
//! - [`sort_events`]: unordered batch → validated chronological sequence
//!
//! This crate does **not** derive factor tables or rescale OHLCV columns;
//! that is `cadj-factor`.

mod ordering;
mod record;

pub use ordering::sort_events;
pub use record::{CorporateAction, EventError, RawCorporateAction};
