//! The factor-table artifact.
//!
//! Produced once per symbol by [`derive_factors`](crate::derive_factors) and
//! consumed later by [`adjust_with_factor`](crate::adjust_with_factor)
//! against any price series of the same symbol. Persistence of the table is
//! the caller's concern; rows serialize with serde.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// FactorRow
// ---------------------------------------------------------------------------

/// One factor row, keyed by ex-date, plus one synthetic anchor row seeding
/// cumulative products before the first real event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorRow {
    /// Ex-date for real events; the policy epoch for the anchor row.
    pub time: NaiveDate,
    /// Observed trading day immediately preceding the ex-date. `None` when
    /// the preceding merged row was itself a non-trading row (event inside a
    /// suspension gap) or for the anchor row.
    pub pre_day: Option<NaiveDate>,
    /// Close paired with the event; may have been carried across a
    /// suspension gap within the policy fill limit.
    pub pre_close: Option<f64>,
    pub split: f64,
    pub purchase: f64,
    pub purchase_price: f64,
    pub dividend: f64,
    /// Theoretical ex-dividend reference close, rounded per policy.
    pub dr_pre_close: Option<f64>,
    /// Single-event multiplicative factor.
    pub dr_factor: f64,
    /// Cumulative product of `dr_factor`, oldest→newest.
    pub backward_factor: f64,
    /// `backward_factor` normalized so the latest row is exactly 1.
    pub forward_factor: f64,
}

impl FactorRow {
    /// The synthetic anchor row: factor 1, no event fields.
    pub fn anchor(time: NaiveDate) -> Self {
        Self {
            time,
            pre_day: None,
            pre_close: None,
            split: 0.0,
            purchase: 0.0,
            purchase_price: 0.0,
            dividend: 0.0,
            dr_pre_close: None,
            dr_factor: 1.0,
            backward_factor: 1.0,
            forward_factor: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// FactorTable
// ---------------------------------------------------------------------------

/// Per-symbol factor table, ordered ascending by `time`.
///
/// New events append over time; cumulative products depend on every earlier
/// row, so the table re-sorts and re-derives them on construction rather
/// than trusting incoming rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorTable {
    rows: Vec<FactorRow>,
}

impl FactorTable {
    /// Build from rows in any order: sorts ascending by `time` (stable, so
    /// same-day rows keep their relative order) and recomputes the
    /// cumulative columns.
    pub fn new(mut rows: Vec<FactorRow>) -> Self {
        rows.sort_by_key(|r| r.time);
        let mut table = Self { rows };
        table.recompute_cumulative();
        table
    }

    pub fn rows(&self) -> &[FactorRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Re-derive `backward_factor` and `forward_factor` from `dr_factor`.
    ///
    /// Backward is the running product oldest→newest. Forward divides by the
    /// final backward value, which lands the latest row exactly on 1.0.
    /// Plain left-to-right `f64` accumulation: event counts per symbol are
    /// tens, and the accumulated error sits far below the rounding precision
    /// of `dr_pre_close`.
    pub fn recompute_cumulative(&mut self) {
        let mut acc = 1.0;
        for row in &mut self.rows {
            acc *= row.dr_factor;
            row.backward_factor = acc;
        }
        let last = match self.rows.last() {
            Some(row) => row.backward_factor,
            None => return,
        };
        for row in &mut self.rows {
            row.forward_factor = row.backward_factor / last;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
