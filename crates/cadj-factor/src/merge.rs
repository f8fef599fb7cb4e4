//! Factor-resolution adjustment: attach a precomputed factor table to an
//! arbitrary price series by calendar-aligned merge.
//!
//! Daily factor rows and (say) minute bars never share timestamps, so the
//! merge walks the sorted union and lets every price row inherit the most
//! recent prior factor pair. Prices are NOT rescaled here; this path only
//! aligns and fills, and callers multiply or divide as their resolution needs.

use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;

use cadj_bars::TimedBar;

use crate::table::FactorTable;

/// A price bar with its merged adjustment factors attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactoredBar {
    pub bar: TimedBar,
    pub backward_factor: f64,
    pub forward_factor: f64,
}

/// Merge `table` onto `bars`, aligned by timestamp.
///
/// A synthetic `dr_factor = 1` anchor is inserted at `start` unless a factor
/// row already sits exactly there (duplicate insertion is a benign no-op);
/// cumulative factors are then recomputed over the extended set, so the
/// forward column still ends at exactly 1.
///
/// Output is sorted ascending by timestamp. Price rows earlier than every
/// factor row are dropped silently; callers needing visibility compare the
/// output length against the input.
pub fn adjust_with_factor(
    bars: &[TimedBar],
    table: &FactorTable,
    start: NaiveDateTime,
) -> Vec<FactoredBar> {
    // Factor rows sit at midnight of their ex-date.
    let mut factors: Vec<(NaiveDateTime, f64)> = table
        .rows()
        .iter()
        .map(|r| (r.time.and_time(NaiveTime::MIN), r.dr_factor))
        .collect();
    if !factors.iter().any(|(ts, _)| *ts == start) {
        factors.push((start, 1.0));
    }
    factors.sort_by_key(|(ts, _)| *ts);

    // Cumulative backward product, then the final value for normalization.
    let mut cumulative: Vec<(NaiveDateTime, f64)> = Vec::with_capacity(factors.len());
    let mut acc = 1.0;
    for (ts, dr) in factors {
        acc *= dr;
        cumulative.push((ts, acc));
    }
    let last = match cumulative.last() {
        Some((_, v)) => *v,
        None => return Vec::new(),
    };

    let mut sorted_bars: Vec<&TimedBar> = bars.iter().collect();
    sorted_bars.sort_by_key(|b| b.ts);

    // Sorted-union walk: each bar inherits the latest factor at or before
    // its timestamp; bars before the first factor have nothing to inherit.
    let mut out = Vec::with_capacity(sorted_bars.len());
    let mut next_factor = 0usize;
    let mut current: Option<f64> = None;
    for bar in sorted_bars {
        while next_factor < cumulative.len() && cumulative[next_factor].0 <= bar.ts {
            current = Some(cumulative[next_factor].1);
            next_factor += 1;
        }
        let backward = match current {
            Some(v) => v,
            None => continue,
        };
        out.push(FactoredBar {
            bar: bar.clone(),
            backward_factor: backward,
            forward_factor: backward / last,
        });
    }

    tracing::debug!(
        input = bars.len(),
        output = out.len(),
        "merged factor table onto series"
    );
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
