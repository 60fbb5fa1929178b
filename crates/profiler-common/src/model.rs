//! Static model specifications for supported NWP models.
//!
//! Per-model differences (coverage, cadence, forecast-hour legality,
//! longitude convention, artifact naming) are data here, not branches in
//! the resolver. Paths are rendered from templates with `{date}`,
//! `{cycle}` and `{fh}` placeholders.

use serde::{Deserialize, Serialize};

use crate::bbox::BoundingBox;
use crate::time::ValidTime;

/// Longitude convention used by a model's coordinate arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LonConvention {
    /// Signed degrees, -180..180
    Signed,
    /// Unsigned degrees, 0..360
    Unsigned,
}

impl LonConvention {
    /// Normalize a signed input longitude to this convention.
    pub fn normalize(&self, lon: f64) -> f64 {
        match self {
            LonConvention::Signed => {
                if lon > 180.0 {
                    lon - 360.0
                } else {
                    lon
                }
            }
            LonConvention::Unsigned => {
                if lon < 0.0 {
                    lon + 360.0
                } else {
                    lon
                }
            }
        }
    }
}

/// Which forecast hours a model publishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HourRule {
    /// Every hour from 0 to `max` inclusive.
    Dense { max: u32 },
    /// Piecewise steps: ordered `(upper_bound, step)` segments.
    ///
    /// The first segment starts at hour 0; each later segment starts one
    /// step past the previous upper bound. GFS is `[(120, 3), (384, 6)]`:
    /// 0,3,..,120 then 126,132,..,384.
    Stepped { segments: Vec<(u32, u32)> },
}

impl HourRule {
    /// Whether `hour` is a forecast hour this model ever publishes.
    pub fn is_legal(&self, hour: u32) -> bool {
        match self {
            HourRule::Dense { max } => hour <= *max,
            HourRule::Stepped { segments } => {
                for (upper, step) in segments {
                    if hour <= *upper {
                        return hour % step == 0;
                    }
                }
                false
            }
        }
    }

    /// All legal hours in ascending order.
    pub fn hours(&self) -> Vec<u32> {
        match self {
            HourRule::Dense { max } => (0..=*max).collect(),
            HourRule::Stepped { segments } => {
                let mut hours = Vec::new();
                let mut next = 0u32;
                for (upper, step) in segments {
                    let mut h = next;
                    // Align the segment start to its own step size.
                    if h % step != 0 {
                        h += step - h % step;
                    }
                    while h <= *upper {
                        hours.push(h);
                        h += step;
                    }
                    next = upper + 1;
                }
                hours
            }
        }
    }

    /// The furthest-out hour this model publishes.
    pub fn max_hour(&self) -> u32 {
        match self {
            HourRule::Dense { max } => *max,
            HourRule::Stepped { segments } => segments.last().map(|(u, _)| *u).unwrap_or(0),
        }
    }
}

/// Static description of one supported model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Short identifier ("hrrr", "rap", "gfs")
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Spatial coverage; requests outside it are rejected for this model
    pub coverage: BoundingBox,
    /// Hours between run cycles
    pub cycle_interval_hours: u32,
    /// How many cycles back the availability scan may look
    pub lookback_cycles: u32,
    /// Forecast-hour legality rule
    pub hour_rule: HourRule,
    /// Longitude convention of the model's coordinate arrays
    pub lon_convention: LonConvention,
    /// Whether forecast hours appear strictly in order within a cycle.
    /// In-order models let the "latest" scan stop at the first gap.
    pub publishes_in_order: bool,
    /// Probe budget for the "latest" scan when publication is out of
    /// order; None scans every legal hour.
    pub latest_scan_limit: Option<usize>,
    /// Remote directory template ({date}, {cycle} placeholders)
    pub prefix_template: String,
    /// File name template ({cycle}, {fh} placeholders)
    pub file_pattern: String,
    /// Zero-padding width for {fh}
    pub fh_width: usize,
}

impl ModelSpec {
    /// Remote file name for a run (template with placeholders filled).
    pub fn file_name(&self, run: &ValidTime) -> String {
        render(
            &self.file_pattern,
            &run.cycle_date(),
            &run.cycle_hour(),
            run.forecast_hour,
            self.fh_width,
        )
    }

    /// Full remote path for a run, relative to the provider base URL.
    pub fn remote_path(&self, run: &ValidTime) -> String {
        let prefix = render(
            &self.prefix_template,
            &run.cycle_date(),
            &run.cycle_hour(),
            run.forecast_hour,
            self.fh_width,
        );
        format!("{}{}", prefix, self.file_name(run))
    }

    /// Whether `hour` is a forecast hour this model ever publishes.
    pub fn is_legal_hour(&self, hour: u32) -> bool {
        self.hour_rule.is_legal(hour)
    }
}

fn render(template: &str, date: &str, cycle: &str, fh: u32, fh_width: usize) -> String {
    template
        .replace("{date}", date)
        .replace("{cycle}", cycle)
        .replace("{fh}", &format!("{:0width$}", fh, width = fh_width))
}

/// The supported model catalog.
pub mod catalog {
    use super::*;

    /// HRRR: 3 km CONUS model, hourly cycles, dense hours 0-18.
    pub fn hrrr() -> ModelSpec {
        ModelSpec {
            id: "hrrr".to_string(),
            name: "High-Resolution Rapid Refresh".to_string(),
            coverage: BoundingBox::new(-140.0, 20.0, -50.0, 60.0),
            cycle_interval_hours: 1,
            lookback_cycles: 6,
            hour_rule: HourRule::Dense { max: 18 },
            lon_convention: LonConvention::Unsigned,
            publishes_in_order: true,
            latest_scan_limit: None,
            prefix_template: "hrrr/prod/hrrr.{date}/conus/".to_string(),
            file_pattern: "hrrr.t{cycle}z.wrfsfcf{fh}.grib2".to_string(),
            fh_width: 2,
        }
    }

    /// RAP: 13 km North America model, hourly cycles, dense hours 0-21.
    pub fn rap() -> ModelSpec {
        ModelSpec {
            id: "rap".to_string(),
            name: "Rapid Refresh".to_string(),
            coverage: BoundingBox::new(-140.0, 16.0, -50.0, 60.0),
            cycle_interval_hours: 1,
            lookback_cycles: 6,
            hour_rule: HourRule::Dense { max: 21 },
            lon_convention: LonConvention::Unsigned,
            publishes_in_order: true,
            latest_scan_limit: None,
            prefix_template: "rap/prod/rap.{date}/".to_string(),
            file_pattern: "rap.t{cycle}z.awp130pgrbf{fh}.grib2".to_string(),
            fh_width: 2,
        }
    }

    /// GFS: 0.25 degree global model, 6-hourly cycles, 3-hour steps to
    /// +120 then 6-hour steps to +384. Hours may publish out of order.
    pub fn gfs() -> ModelSpec {
        ModelSpec {
            id: "gfs".to_string(),
            name: "Global Forecast System".to_string(),
            coverage: BoundingBox::default(),
            cycle_interval_hours: 6,
            lookback_cycles: 8,
            hour_rule: HourRule::Stepped {
                segments: vec![(120, 3), (384, 6)],
            },
            lon_convention: LonConvention::Unsigned,
            publishes_in_order: false,
            latest_scan_limit: Some(20),
            prefix_template: "gfs/prod/gfs.{date}/{cycle}/atmos/".to_string(),
            file_pattern: "gfs.t{cycle}z.pgrb2.0p25.f{fh}".to_string(),
            fh_width: 3,
        }
    }

    /// Models in auto-selection priority order.
    pub fn auto_priority() -> Vec<ModelSpec> {
        vec![hrrr(), rap(), gfs()]
    }

    /// Look up a model by its short identifier.
    pub fn by_id(id: &str) -> Option<ModelSpec> {
        match id.to_ascii_lowercase().as_str() {
            "hrrr" => Some(hrrr()),
            "rap" => Some(rap()),
            "gfs" => Some(gfs()),
            _ => None,
        }
    }
}
