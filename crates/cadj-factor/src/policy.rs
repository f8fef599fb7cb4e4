//! Adjustment policy knobs.
//!
//! The upstream data ecosystem observes adjustment factors at two decimal
//! places and tolerates a one-row suspension gap when pairing an ex-date with
//! its previous close. Both are calibration knobs here rather than hard-coded
//! constants, so derived factors can be reconciled against reference vendors
//! that round differently.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Tunable policy for factor derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustPolicy {
    /// Decimal places kept when rounding the theoretical ex-dividend close.
    pub round_decimals: u32,
    /// Maximum consecutive non-trading rows a close may be carried across
    /// when pairing an ex-date with its previous close.
    pub close_fill_limit: usize,
    /// Date of the synthetic factor row seeding cumulative products before
    /// the first real event. Listing dates are unknown, so this sits at the
    /// earliest date any series could start.
    pub epoch: NaiveDate,
}

impl Default for AdjustPolicy {
    fn default() -> Self {
        Self {
            round_decimals: 2,
            close_fill_limit: 1,
            epoch: NaiveDate::from_ymd_opt(1900, 1, 1).expect("1900-01-01 is a valid date"),
        }
    }
}

impl AdjustPolicy {
    /// Parse a policy from YAML. Missing keys fall back to defaults.
    pub fn from_yaml_str(s: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(s)
    }
}

/// Round half away from zero at `decimals` places.
pub(crate) fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}
