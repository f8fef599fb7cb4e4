//! Capitalized display projection of adjusted output.
//!
//! Chart-facing consumers expect capitalized column names with the adjusted
//! close exposed as `Adjusted` and the vendor `amount` column dropped.

use chrono::NaiveDate;
use serde::Serialize;

use crate::bar::AdjustedBar;
use crate::series::AdjustedSeries;

/// One adjusted bar renamed for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DisplayBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub adjusted: f64,
}

impl From<&AdjustedBar> for DisplayBar {
    fn from(bar: &AdjustedBar) -> Self {
        Self {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            adjusted: bar.adjclose,
        }
    }
}

impl AdjustedSeries {
    /// Project every bar into its capitalized display form.
    pub fn display_rows(&self) -> Vec<DisplayBar> {
        self.bars().iter().map(DisplayBar::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adjusted(date: NaiveDate) -> AdjustedBar {
        AdjustedBar {
            date,
            open: 9.5,
            high: 10.45,
            low: 9.025,
            close: 9.5,
            volume: 1_052.63,
            amount: Some(10_000.0),
            adjclose: 9.5,
        }
    }

    #[test]
    fn display_rows_capitalize_and_drop_amount() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let series = AdjustedSeries::new(vec![adjusted(date)]);
        let rows = series.display_rows();
        assert_eq!(rows.len(), 1);

        let json = serde_json::to_value(&rows[0]).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(
            keys,
            ["Adjusted", "Close", "Date", "High", "Low", "Open", "Volume"]
        );
        assert!(json.get("Amount").is_none());
        assert_eq!(json["Adjusted"], 9.5);
    }
}
