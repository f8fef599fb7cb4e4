//! Factor derivation: daily series + corporate-action history → factor table.
//!
//! Ex-dates and trading days frequently do not coincide (trading
//! suspensions), so the derivation walks the merged ascending axis of both
//! date sets, carries the close across non-trading rows up to the policy
//! fill limit, and pairs every event with the close of the immediately
//! preceding merged row.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;

use cadj_bars::DailySeries;
use cadj_events::CorporateAction;

use crate::policy::{round_to, AdjustPolicy};
use crate::table::{FactorRow, FactorTable};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that abort a factor derivation.
///
/// Per the fail-fast policy, one bad event aborts the whole table; a
/// partially derived table would silently corrupt every later cumulative
/// product.
#[derive(Debug, Clone, PartialEq)]
pub enum FactorError {
    /// No close observable for the row preceding this ex-date within the
    /// configured fill limit: the suspension gap is too long, or the event
    /// predates the series entirely.
    MissingPreClose { ex_date: NaiveDate },
    /// The theoretical ex-dividend close rounded to a non-positive value,
    /// so the event factor would be meaningless.
    NonPositiveDrPreClose { ex_date: NaiveDate, value: f64 },
}

impl fmt::Display for FactorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactorError::MissingPreClose { ex_date } => {
                write!(f, "no pre-event close observable for ex-date {ex_date}")
            }
            FactorError::NonPositiveDrPreClose { ex_date, value } => {
                write!(
                    f,
                    "ex-dividend reference close for ex-date {ex_date} rounded to {value}"
                )
            }
        }
    }
}

impl std::error::Error for FactorError {}

// ---------------------------------------------------------------------------
// Merged axis
// ---------------------------------------------------------------------------

/// One row of the merged date axis.
struct AxisRow {
    date: NaiveDate,
    /// Close after the bounded forward fill, when observable.
    close: Option<f64>,
    /// `true` when the date is an actual trading day.
    traded: bool,
}

/// Union of trading dates and ex-dates, ascending, with closes carried
/// across non-trading rows up to `fill_limit` consecutive rows.
fn build_axis(daily: &DailySeries, events: &[CorporateAction], fill_limit: usize) -> Vec<AxisRow> {
    let mut merged: BTreeMap<NaiveDate, Option<f64>> = BTreeMap::new();
    for ev in events {
        merged.insert(ev.ex_date, None);
    }
    for bar in daily.bars() {
        merged.insert(bar.date, Some(bar.close));
    }

    let mut axis = Vec::with_capacity(merged.len());
    let mut carried: Option<f64> = None;
    let mut carried_age = 0usize;
    for (date, close) in merged {
        let row = match close {
            Some(c) => {
                carried = Some(c);
                carried_age = 0;
                AxisRow {
                    date,
                    close: Some(c),
                    traded: true,
                }
            }
            None => {
                carried_age += 1;
                let filled = if carried_age <= fill_limit { carried } else { None };
                AxisRow {
                    date,
                    close: filled,
                    traded: false,
                }
            }
        };
        axis.push(row);
    }
    axis
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Derive the per-symbol factor table.
///
/// `events` must already be validated and sorted (the output of
/// [`cadj_events::sort_events`]). For every event: pair it with the previous
/// row's close, compute the theoretical ex-dividend close
///
/// ```text
/// dr_pre_close = round((pre_close - dividend + purchase * purchase_price)
///                      / (1 + split + purchase), policy.round_decimals)
/// ```
///
/// and the single-event factor `dr_factor = pre_close / dr_pre_close`. The
/// rounding is load-bearing: factors are observed in the wild at two
/// decimals, and skipping it produces tables that do not reconcile.
///
/// The returned table carries the synthetic anchor row at `policy.epoch` and
/// fully recomputed cumulative columns.
pub fn derive_factors(
    daily: &DailySeries,
    events: &[CorporateAction],
    policy: &AdjustPolicy,
) -> Result<FactorTable, FactorError> {
    let axis = build_axis(daily, events, policy.close_fill_limit);

    let mut rows = Vec::with_capacity(events.len() + 1);
    rows.push(FactorRow::anchor(policy.epoch));

    for ev in events {
        let idx = match axis.binary_search_by_key(&ev.ex_date, |r| r.date) {
            Ok(i) => i,
            Err(_) => return Err(FactorError::MissingPreClose { ex_date: ev.ex_date }),
        };
        if idx == 0 {
            return Err(FactorError::MissingPreClose { ex_date: ev.ex_date });
        }
        let prev = &axis[idx - 1];
        let pre_close = prev
            .close
            .ok_or(FactorError::MissingPreClose { ex_date: ev.ex_date })?;
        let pre_day = if prev.traded { Some(prev.date) } else { None };

        let dr_pre_close = round_to(
            (pre_close - ev.dividend + ev.purchase * ev.purchase_price)
                / (1.0 + ev.split + ev.purchase),
            policy.round_decimals,
        );
        if dr_pre_close <= 0.0 {
            return Err(FactorError::NonPositiveDrPreClose {
                ex_date: ev.ex_date,
                value: dr_pre_close,
            });
        }

        rows.push(FactorRow {
            time: ev.ex_date,
            pre_day,
            pre_close: Some(pre_close),
            split: ev.split,
            purchase: ev.purchase,
            purchase_price: ev.purchase_price,
            dividend: ev.dividend,
            dr_pre_close: Some(dr_pre_close),
            dr_factor: pre_close / dr_pre_close,
            backward_factor: 1.0,
            forward_factor: 1.0,
        });
    }

    let table = FactorTable::new(rows);
    tracing::debug!(
        events = events.len(),
        rows = table.len(),
        "derived factor table"
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use cadj_bars::DailyBar;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn series(points: &[(NaiveDate, f64)]) -> DailySeries {
        let bars = points
            .iter()
            .map(|(date, close)| DailyBar::new(*date, *close, *close, *close, *close, 1_000.0))
            .collect();
        DailySeries::new(bars).unwrap()
    }

    fn dividend(ex_date: NaiveDate, dividend: f64) -> CorporateAction {
        CorporateAction {
            ex_date,
            split: 0.0,
            purchase: 0.0,
            purchase_price: 0.0,
            dividend,
        }
    }

    fn split(ex_date: NaiveDate, split: f64) -> CorporateAction {
        CorporateAction {
            ex_date,
            split,
            purchase: 0.0,
            purchase_price: 0.0,
            dividend: 0.0,
        }
    }

    #[test]
    fn no_events_yields_only_the_anchor_row() {
        let daily = series(&[(d(2024, 1, 2), 10.0), (d(2024, 1, 3), 10.5)]);
        let table = derive_factors(&daily, &[], &AdjustPolicy::default()).unwrap();
        assert_eq!(table.len(), 1);
        let anchor = &table.rows()[0];
        assert_eq!(anchor.time, d(1900, 1, 1));
        assert_eq!(anchor.dr_factor, 1.0);
        assert_eq!(anchor.forward_factor, 1.0);
    }

    #[test]
    fn dividend_on_a_trading_day_pairs_with_the_previous_close() {
        let daily = series(&[(d(2024, 1, 2), 10.0), (d(2024, 1, 3), 9.5)]);
        let table = derive_factors(
            &daily,
            &[dividend(d(2024, 1, 3), 0.5)],
            &AdjustPolicy::default(),
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        let row = &table.rows()[1];
        assert_eq!(row.time, d(2024, 1, 3));
        assert_eq!(row.pre_day, Some(d(2024, 1, 2)));
        assert_eq!(row.pre_close, Some(10.0));
        // (10.0 - 0.5) / 1 = 9.50
        assert_eq!(row.dr_pre_close, Some(9.5));
        assert!((row.dr_factor - 10.0 / 9.5).abs() < 1e-12);
    }

    #[test]
    fn ex_date_inside_a_one_row_suspension_gap_is_covered_by_the_fill() {
        // 2024-01-03 suspended; the event row carries no printed close but
        // pairs with the close carried from 2024-01-02.
        let daily = series(&[(d(2024, 1, 2), 10.0), (d(2024, 1, 4), 9.0)]);
        let table = derive_factors(
            &daily,
            &[dividend(d(2024, 1, 3), 0.5)],
            &AdjustPolicy::default(),
        )
        .unwrap();
        let row = &table.rows()[1];
        assert_eq!(row.pre_close, Some(10.0));
        assert_eq!(row.pre_day, Some(d(2024, 1, 2)));
    }

    #[test]
    fn second_consecutive_event_row_pairs_with_the_carried_close() {
        // Two event-only rows in the gap: the second one's previous row is
        // the first event row, whose close was carried within the limit.
        let daily = series(&[(d(2024, 1, 2), 10.0), (d(2024, 1, 10), 9.0)]);
        let events = [dividend(d(2024, 1, 4), 0.2), dividend(d(2024, 1, 5), 0.3)];
        let table = derive_factors(&daily, &events, &AdjustPolicy::default()).unwrap();
        let second = &table.rows()[2];
        assert_eq!(second.time, d(2024, 1, 5));
        assert_eq!(second.pre_close, Some(10.0));
        // The previous merged row was itself a non-trading row.
        assert_eq!(second.pre_day, None);
    }

    #[test]
    fn gap_longer_than_the_fill_limit_fails() {
        // Previous rows to the 01-06 event: 01-04 and 01-05 event rows, both
        // non-trading; the carried close ages out at limit 1.
        let daily = series(&[(d(2024, 1, 2), 10.0), (d(2024, 1, 10), 9.0)]);
        let events = [
            dividend(d(2024, 1, 4), 0.2),
            dividend(d(2024, 1, 5), 0.3),
            dividend(d(2024, 1, 6), 0.4),
        ];
        let err = derive_factors(&daily, &events, &AdjustPolicy::default()).unwrap_err();
        assert_eq!(
            err,
            FactorError::MissingPreClose {
                ex_date: d(2024, 1, 6)
            }
        );
    }

    #[test]
    fn larger_fill_limit_covers_longer_gaps() {
        let daily = series(&[(d(2024, 1, 2), 10.0), (d(2024, 1, 10), 9.0)]);
        let events = [
            dividend(d(2024, 1, 4), 0.2),
            dividend(d(2024, 1, 5), 0.3),
            dividend(d(2024, 1, 6), 0.4),
        ];
        let policy = AdjustPolicy {
            close_fill_limit: 3,
            ..AdjustPolicy::default()
        };
        let table = derive_factors(&daily, &events, &policy).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.rows()[3].pre_close, Some(10.0));
    }

    #[test]
    fn event_before_the_series_fails() {
        let daily = series(&[(d(2024, 1, 2), 10.0), (d(2024, 1, 3), 10.5)]);
        let err = derive_factors(
            &daily,
            &[dividend(d(2023, 12, 29), 0.5)],
            &AdjustPolicy::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            FactorError::MissingPreClose {
                ex_date: d(2023, 12, 29)
            }
        );
    }

    #[test]
    fn dr_pre_close_is_rounded_to_policy_decimals() {
        // pre_close 10.333, no event effect on price terms except rounding:
        // a tiny dividend keeps the event valid while the quotient stays
        // close to the raw pre_close.
        let daily = series(&[(d(2024, 1, 2), 10.333), (d(2024, 1, 3), 10.0)]);
        let table = derive_factors(
            &daily,
            &[dividend(d(2024, 1, 3), 0.003)],
            &AdjustPolicy::default(),
        )
        .unwrap();
        let row = &table.rows()[1];
        // (10.333 - 0.003) / 1 = 10.33 exactly at two decimals.
        assert_eq!(row.dr_pre_close, Some(10.33));
    }

    #[test]
    fn split_factor_compounds_into_backward_and_forward_columns() {
        // 10-for-1 basis: a 1-for-1 split (share doubles). pre_close 10.0,
        // dr_pre_close = 10 / 2 = 5.00, dr_factor = 2.
        let daily = series(&[
            (d(2024, 1, 2), 10.0),
            (d(2024, 1, 3), 5.0),
            (d(2024, 2, 2), 6.0),
            (d(2024, 2, 5), 3.0),
        ]);
        let events = [split(d(2024, 1, 3), 1.0), split(d(2024, 2, 5), 1.0)];
        let table = derive_factors(&daily, &events, &AdjustPolicy::default()).unwrap();
        let backward: Vec<_> = table.rows().iter().map(|r| r.backward_factor).collect();
        assert_eq!(backward, vec![1.0, 2.0, 4.0]);
        let forward: Vec<_> = table.rows().iter().map(|r| r.forward_factor).collect();
        assert_eq!(forward, vec![0.25, 0.5, 1.0]);
    }

    #[test]
    fn non_positive_reference_close_fails() {
        // Dividend exceeding the pre-close drives the reference close to or
        // below zero.
        let daily = series(&[(d(2024, 1, 2), 0.5), (d(2024, 1, 3), 0.4)]);
        let err = derive_factors(
            &daily,
            &[dividend(d(2024, 1, 3), 0.5)],
            &AdjustPolicy::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FactorError::NonPositiveDrPreClose { .. }));
    }

    #[test]
    fn error_display() {
        let err = FactorError::MissingPreClose {
            ex_date: d(2024, 1, 6),
        };
        assert_eq!(
            err.to_string(),
            "no pre-event close observable for ex-date 2024-01-06"
        );
    }
}
