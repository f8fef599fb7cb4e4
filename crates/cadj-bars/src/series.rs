//! Validated series containers.
//!
//! Every adjustment algorithm in this workspace walks bars oldest→newest and
//! pairs events with the previous trading day; both are meaningless on an
//! unordered series. Ordering is therefore enforced once, at construction,
//! with a descriptive error instead of silently wrong fill results.

use std::fmt;

use chrono::NaiveDate;

use crate::bar::{AdjustedBar, DailyBar};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors produced when constructing a [`DailySeries`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesError {
    /// The series has no bars; there is no first date to anchor against.
    Empty,
    /// Two consecutive bars are not strictly ascending by date.
    OutOfOrder { prev: NaiveDate, next: NaiveDate },
}

impl fmt::Display for SeriesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesError::Empty => write!(f, "series has no bars"),
            SeriesError::OutOfOrder { prev, next } => {
                write!(
                    f,
                    "series is not strictly ascending by date: {next} follows {prev}"
                )
            }
        }
    }
}

impl std::error::Error for SeriesError {}

// ---------------------------------------------------------------------------
// DailySeries
// ---------------------------------------------------------------------------

/// A non-empty daily OHLCV series with strictly ascending dates.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    bars: Vec<DailyBar>,
}

impl DailySeries {
    /// Validate and wrap a bar sequence.
    ///
    /// Fails with [`SeriesError::Empty`] on an empty input and
    /// [`SeriesError::OutOfOrder`] on the first date pair that is not
    /// strictly ascending (duplicates included).
    pub fn new(bars: Vec<DailyBar>) -> Result<Self, SeriesError> {
        if bars.is_empty() {
            return Err(SeriesError::Empty);
        }
        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(SeriesError::OutOfOrder {
                    prev: pair[0].date,
                    next: pair[1].date,
                });
            }
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[DailyBar] {
        &self.bars
    }

    /// Date of the earliest bar. The series is never empty.
    pub fn first_date(&self) -> NaiveDate {
        self.bars[0].date
    }

    /// Date of the latest bar.
    pub fn last_date(&self) -> NaiveDate {
        self.bars[self.bars.len() - 1].date
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.bars.iter().map(|b| b.date)
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.bars.iter().map(|b| b.close)
    }

    /// Close on an exact trading day, `None` when the day is not in the
    /// series (suspension or non-trading day).
    pub fn close_on(&self, date: NaiveDate) -> Option<f64> {
        self.bars
            .binary_search_by_key(&date, |b| b.date)
            .ok()
            .map(|i| self.bars[i].close)
    }
}

// ---------------------------------------------------------------------------
// AdjustedSeries
// ---------------------------------------------------------------------------

/// The output of a full-history adjustment, ordered like its source series.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustedSeries {
    bars: Vec<AdjustedBar>,
}

impl AdjustedSeries {
    pub fn new(bars: Vec<AdjustedBar>) -> Self {
        Self { bars }
    }

    pub fn bars(&self) -> &[AdjustedBar] {
        &self.bars
    }

    pub fn into_bars(self) -> Vec<AdjustedBar> {
        self.bars
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
