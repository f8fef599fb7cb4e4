//! Corporate-action record types and the single-event transform.

use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Wire shape
// ---------------------------------------------------------------------------

/// One corporate-action record as supplied by the upstream feed.
///
/// `split` and `purchase` are fractional additional shares per existing
/// share; `purchase_price` is the price paid per allotted share; `dividend`
/// is cash per share. All may be zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawCorporateAction {
    /// Event ex-date as UTC epoch seconds.
    pub time: i64,
    pub split: f64,
    pub purchase: f64,
    pub purchase_price: f64,
    pub dividend: f64,
}

impl RawCorporateAction {
    /// A record whose effect fields sum to zero adjusts nothing and is
    /// skipped by [`sort_events`](crate::sort_events).
    pub fn is_noop(&self) -> bool {
        self.split + self.purchase + self.dividend == 0.0
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors produced when validating a raw record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    /// The record's timestamp is zero, negative, or unrepresentable.
    NonPositiveTime(i64),
    /// All of split, purchase, and dividend are zero.
    NoEffect { time: i64 },
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventError::NonPositiveTime(t) => {
                write!(f, "corporate action has non-positive timestamp {t}")
            }
            EventError::NoEffect { time } => {
                write!(
                    f,
                    "corporate action at timestamp {time} has no split, purchase, or dividend"
                )
            }
        }
    }
}

impl std::error::Error for EventError {}

// ---------------------------------------------------------------------------
// Validated event
// ---------------------------------------------------------------------------

/// A validated corporate action keyed by its ex-date (UTC calendar day of the
/// raw timestamp).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorporateAction {
    pub ex_date: NaiveDate,
    pub split: f64,
    pub purchase: f64,
    pub purchase_price: f64,
    pub dividend: f64,
}

impl CorporateAction {
    /// Validate a raw record.
    ///
    /// Fails fast on a non-positive timestamp or a record with all three
    /// effect fields zero; a malformed record aborts the whole batch rather
    /// than producing a partially adjusted result.
    pub fn from_raw(raw: &RawCorporateAction) -> Result<Self, EventError> {
        if raw.time <= 0 {
            return Err(EventError::NonPositiveTime(raw.time));
        }
        if raw.split == 0.0 && raw.purchase == 0.0 && raw.dividend == 0.0 {
            return Err(EventError::NoEffect { time: raw.time });
        }
        let ex_date = DateTime::from_timestamp(raw.time, 0)
            .ok_or(EventError::NonPositiveTime(raw.time))?
            .date_naive();
        Ok(Self {
            ex_date,
            split: raw.split,
            purchase: raw.purchase,
            purchase_price: raw.purchase_price,
            dividend: raw.dividend,
        })
    }

    /// Net cash value removed per pre-event share.
    ///
    /// A rights allotment is cash paid *in*, so it offsets the dividend.
    pub fn cash_afterward(&self) -> f64 {
        self.dividend - self.purchase * self.purchase_price
    }

    /// Post-event share count per pre-event share.
    pub fn share_afterward(&self) -> f64 {
        1.0 + self.purchase + self.split
    }

    /// `true` when the event changes no share count (pure cash event).
    pub fn is_pure_cash(&self) -> bool {
        self.share_afterward() == 1.0
    }

    /// Apply this event to a working adjusted-close column.
    ///
    /// `dates` and `adjclose` are parallel columns of the same daily series
    /// and must be strictly ascending by date (enforced upstream by
    /// `DailySeries`). Events dated on or before the first bar, or after
    /// `as_of`, are no-ops: only events strictly inside the covered window
    /// and already past apply.
    ///
    /// Bars strictly before the ex-date have the net cash subtracted and are
    /// then divided by the share multiplier; bars on or after the ex-date are
    /// untouched. The cash pass always runs before the share pass; the two
    /// do not commute.
    pub fn apply_adjclose(&self, dates: &[NaiveDate], adjclose: &mut [f64], as_of: NaiveDate) {
        debug_assert_eq!(dates.len(), adjclose.len());
        let first = match dates.first() {
            Some(d) => *d,
            None => return,
        };
        if self.ex_date <= first || self.ex_date > as_of {
            return;
        }

        let cash = self.cash_afterward();
        if cash != 0.0 {
            for (date, adj) in dates.iter().zip(adjclose.iter_mut()) {
                if *date < self.ex_date {
                    *adj -= cash;
                }
            }
        }

        let share = self.share_afterward();
        if share != 1.0 {
            for (date, adj) in dates.iter().zip(adjclose.iter_mut()) {
                if *date < self.ex_date {
                    *adj /= share;
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
