//! Full-history OHLCV adjustment (the event-resolution path).
//!
//! Applies corporate actions one by one to a working adjusted-close column,
//! then rescales every price column by the realized ratio and volume by its
//! inverse. Returns a new series; the caller's data is never mutated.

use std::fmt;

use chrono::NaiveDate;

use cadj_bars::{AdjustedBar, AdjustedSeries, DailySeries};
use cadj_events::{sort_events, EventError, RawCorporateAction};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that abort a full-history adjustment.
#[derive(Debug, Clone, PartialEq)]
pub enum AdjustError {
    /// A record in the corporate-action batch failed validation.
    Event(EventError),
    /// A raw close of zero makes the realized factor undefined.
    ZeroClose { date: NaiveDate },
}

impl From<EventError> for AdjustError {
    fn from(e: EventError) -> Self {
        AdjustError::Event(e)
    }
}

impl fmt::Display for AdjustError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdjustError::Event(e) => write!(f, "invalid corporate action: {e}"),
            AdjustError::ZeroClose { date } => {
                write!(f, "raw close is zero on {date}; factor undefined")
            }
        }
    }
}

impl std::error::Error for AdjustError {}

// ---------------------------------------------------------------------------
// Adjustment
// ---------------------------------------------------------------------------

/// Fully back-adjust a daily series against its corporate-action history.
///
/// `as_of` is the "today" boundary: events with a later ex-date are ignored
/// as not yet mature. Events are applied in the deterministic order of
/// [`sort_events`]; applying the same record twice would double-adjust, so
/// callers must pass each record exactly once.
pub fn adjust(
    series: &DailySeries,
    records: &[RawCorporateAction],
    as_of: NaiveDate,
) -> Result<AdjustedSeries, AdjustError> {
    let dates: Vec<NaiveDate> = series.dates().collect();
    let mut adjclose: Vec<f64> = series.closes().collect();

    let events = sort_events(records)?;
    for ev in &events {
        ev.apply_adjclose(&dates, &mut adjclose, as_of);
    }

    let mut out = Vec::with_capacity(series.bars().len());
    for (bar, adj) in series.bars().iter().zip(adjclose) {
        if bar.close == 0.0 {
            return Err(AdjustError::ZeroClose { date: bar.date });
        }
        let factor = adj / bar.close;
        out.push(AdjustedBar {
            date: bar.date,
            open: bar.open * factor,
            high: bar.high * factor,
            low: bar.low * factor,
            close: bar.close * factor,
            volume: bar.volume * (1.0 / factor),
            amount: bar.amount,
            adjclose: adj,
        });
    }

    tracing::debug!(bars = out.len(), events = events.len(), "adjusted series");
    Ok(AdjustedSeries::new(out))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
