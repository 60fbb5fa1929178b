//! Time handling for forecast data.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Represents a valid time for forecast data.
///
/// Combines reference time (model run time) and forecast offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidTime {
    /// Model run/reference time
    pub reference_time: DateTime<Utc>,
    /// Forecast hour offset from reference time
    pub forecast_hour: u32,
}

impl ValidTime {
    pub fn new(reference_time: DateTime<Utc>, forecast_hour: u32) -> Self {
        Self {
            reference_time,
            forecast_hour,
        }
    }

    /// Create from analysis time (forecast_hour = 0)
    pub fn analysis(reference_time: DateTime<Utc>) -> Self {
        Self {
            reference_time,
            forecast_hour: 0,
        }
    }

    /// Calculate the actual valid time (reference + forecast offset)
    pub fn valid_datetime(&self) -> DateTime<Utc> {
        self.reference_time + Duration::hours(self.forecast_hour as i64)
    }

    /// Run date as the provider formats it (YYYYMMDD).
    pub fn cycle_date(&self) -> String {
        self.reference_time.format("%Y%m%d").to_string()
    }

    /// Run hour as the provider formats it (2-digit UTC).
    pub fn cycle_hour(&self) -> String {
        self.reference_time.format("%H").to_string()
    }
}

impl std::fmt::Display for ValidTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}z +{:03} (valid {})",
            self.reference_time.format("%Y-%m-%d %H"),
            self.forecast_hour,
            self.valid_datetime().format("%Y-%m-%d %H:%MZ")
        )
    }
}
