//! Bar record types shared by every adjustment path.
//!
//! Prices are `f64`: every transform in this workspace is a multiplicative
//! ratio, and the single load-bearing rounding point (the theoretical
//! ex-dividend close) is explicit and policy-controlled in `cadj-factor`.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A raw daily OHLCV bar for one trading day.
///
/// `amount` is the turnover column some daily feeds attach; it rides along
/// unmodified and is dropped from display output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

impl DailyBar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            amount: None,
        }
    }
}

/// A bar at arbitrary resolution (e.g. intraday minutes), keyed by a full
/// timestamp instead of a calendar day.
///
/// Consumed by the factor-merge path, which aligns these bars with a daily
/// factor table by timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedBar {
    pub ts: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl TimedBar {
    pub fn new(ts: NaiveDateTime, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            ts,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// A daily bar after full-history adjustment.
///
/// OHLC are rescaled onto the adjusted basis, volume is rescaled by the
/// inverse factor, and `adjclose` carries the continuously adjusted close the
/// rescale was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustedBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    pub adjclose: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn daily_bar_new_leaves_amount_empty() {
        let bar = DailyBar::new(d(2024, 1, 2), 10.0, 11.0, 9.5, 10.5, 1_000.0);
        assert_eq!(bar.amount, None);
        assert_eq!(bar.close, 10.5);
    }

    #[test]
    fn daily_bar_serde_omits_missing_amount() {
        let bar = DailyBar::new(d(2024, 1, 2), 10.0, 11.0, 9.5, 10.5, 1_000.0);
        let json = serde_json::to_string(&bar).unwrap();
        assert!(!json.contains("amount"));

        let with_amount = DailyBar {
            amount: Some(12_345.0),
            ..bar
        };
        let json = serde_json::to_string(&with_amount).unwrap();
        assert!(json.contains("\"amount\":12345.0"));
    }

    #[test]
    fn daily_bar_deserializes_without_amount() {
        let json = r#"{"date":"2024-01-02","open":10.0,"high":11.0,"low":9.5,"close":10.5,"volume":1000.0}"#;
        let bar: DailyBar = serde_json::from_str(json).unwrap();
        assert_eq!(bar.date, d(2024, 1, 2));
        assert_eq!(bar.amount, None);
    }

    #[test]
    fn timed_bar_roundtrips_through_json() {
        let ts = d(2024, 1, 2).and_hms_opt(9, 31, 0).unwrap();
        let bar = TimedBar::new(ts, 10.0, 10.2, 9.9, 10.1, 500.0);
        let json = serde_json::to_string(&bar).unwrap();
        let back: TimedBar = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bar);
    }
}
