//! Profile assembly from per-level wind fields at a resolved cell.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use grid_sampler::{GridCell, WindFields};
use profiler_common::{ProfileError, ProfileResult};

use crate::altitude::pressure_to_alt;
use crate::interp::interp_extrapolate;

pub const MPS_TO_KNOTS: f64 = 1.94384;

/// Output altitude step in feet.
pub const PROFILE_STEP_FT: u32 = 1000;

pub const MIN_CEILING_FT: u32 = 1000;
pub const MAX_CEILING_FT: u32 = 50000;

/// Altitude reference frame for profile rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AltitudeReference {
    /// Mean sea level
    Msl,
    /// Above ground level
    Agl,
}

impl std::fmt::Display for AltitudeReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AltitudeReference::Msl => write!(f, "MSL"),
            AltitudeReference::Agl => write!(f, "AGL"),
        }
    }
}

/// Wind at one pressure level of the resolved cell.
#[derive(Debug, Clone, Serialize)]
pub struct LevelSample {
    pub pressure_hpa: f64,
    /// ISA altitude of the level, ft MSL
    pub altitude_ft: f64,
    pub speed_mps: f64,
    pub direction_deg: f64,
}

/// One output row. Speed is in knots, direction in meteorological
/// degrees (0 = from north, 90 = from east).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileRow {
    pub altitude_ft: f64,
    pub speed_kts: f64,
    pub direction_deg: f64,
}

/// The terminal artifact: rows ordered by ascending altitude, plus the
/// metadata any exporter needs.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub rows: Vec<ProfileRow>,
    pub reference: AltitudeReference,
    pub ground_elevation_ft: Option<f64>,
    pub valid_time: Option<DateTime<Utc>>,
}

/// What the caller wants built.
#[derive(Debug, Clone, Copy)]
pub struct ProfileRequest {
    /// Top of the output axis, ft (in the requested reference frame)
    pub ceiling_ft: u32,
    pub reference: AltitudeReference,
    /// Required for AGL when no terrain archive answered
    pub ground_elevation_ft: Option<f64>,
}

/// Speed (m/s) and meteorological direction (deg) from u/v components.
///
/// Direction is `(270 - atan2(v, u) in degrees) mod 360`: the bearing
/// the wind blows *from*, 0 = north, 90 = east.
pub fn wind_speed_dir(u: f64, v: f64) -> (f64, f64) {
    let speed = (u * u + v * v).sqrt();
    let direction = (270.0 - v.atan2(u).to_degrees()).rem_euclid(360.0);
    (speed, direction)
}

/// Per-level samples at a cell, ordered by ascending altitude.
///
/// Validates the invariant interpolation depends on: within the level
/// list, altitude increases monotonically as pressure decreases.
pub fn level_samples(fields: &WindFields, cell: &GridCell) -> ProfileResult<Vec<LevelSample>> {
    let mut samples = Vec::with_capacity(fields.levels_hpa.len());
    for (idx, &pressure_hpa) in fields.levels_hpa.iter().enumerate() {
        let (u, v) = fields.wind_at(idx, cell)?;
        let (speed_mps, direction_deg) = wind_speed_dir(u, v);
        samples.push(LevelSample {
            pressure_hpa,
            altitude_ft: pressure_to_alt(pressure_hpa),
            speed_mps,
            direction_deg,
        });
    }

    samples.sort_by(|a, b| a.altitude_ft.total_cmp(&b.altitude_ft));

    for pair in samples.windows(2) {
        if pair[1].pressure_hpa >= pair[0].pressure_hpa {
            return Err(ProfileError::DecodeFailure(format!(
                "level list not monotonic: {} hPa above {} hPa",
                pair[1].pressure_hpa, pair[0].pressure_hpa
            )));
        }
    }

    Ok(samples)
}

/// Build a fixed-step profile from wind fields at a resolved cell.
///
/// The output axis runs 0..=ceiling in 1000 ft steps. In AGL mode each
/// step is shifted by the ground elevation to its MSL height before
/// interpolation; the row keeps its AGL label. Direction is interpolated
/// as a plain linear quantity, not circularly: a profile spanning the
/// 0/360 discontinuity shows an artifact there, which is intended
/// behavior rather than something to smooth over.
pub fn build_profile(
    fields: &WindFields,
    cell: &GridCell,
    request: &ProfileRequest,
    valid_time: Option<DateTime<Utc>>,
) -> ProfileResult<Profile> {
    if !(MIN_CEILING_FT..=MAX_CEILING_FT).contains(&request.ceiling_ft) {
        return Err(ProfileError::invalid_input(
            "ceiling_ft",
            format!(
                "{} outside {}..{}",
                request.ceiling_ft, MIN_CEILING_FT, MAX_CEILING_FT
            ),
        ));
    }

    let ground_ft = match (request.reference, request.ground_elevation_ft) {
        (AltitudeReference::Agl, Some(g)) => g,
        (AltitudeReference::Agl, None) => {
            return Err(ProfileError::invalid_input(
                "ground_elevation_ft",
                "required for AGL profiles",
            ));
        }
        (AltitudeReference::Msl, _) => 0.0,
    };

    let samples = level_samples(fields, cell)?;
    if samples.is_empty() {
        return Err(ProfileError::DecodeFailure(
            "no levels to interpolate".to_string(),
        ));
    }

    let speed_points: Vec<(f64, f64)> = samples
        .iter()
        .map(|s| (s.altitude_ft, s.speed_mps))
        .collect();
    let dir_points: Vec<(f64, f64)> = samples
        .iter()
        .map(|s| (s.altitude_ft, s.direction_deg))
        .collect();

    let mut rows = Vec::new();
    for step in (0..=request.ceiling_ft).step_by(PROFILE_STEP_FT as usize) {
        let label_ft = step as f64;
        let query_ft = label_ft + ground_ft;
        let speed_mps = interp_extrapolate(&speed_points, query_ft);
        let direction_deg = interp_extrapolate(&dir_points, query_ft);
        rows.push(ProfileRow {
            altitude_ft: label_ft,
            speed_kts: speed_mps * MPS_TO_KNOTS,
            direction_deg,
        });
    }

    debug!(
        rows = rows.len(),
        reference = %request.reference,
        ground_ft,
        "Profile built"
    );

    Ok(Profile {
        rows,
        reference: request.reference,
        ground_elevation_ft: match request.reference {
            AltitudeReference::Agl => Some(ground_ft),
            AltitudeReference::Msl => request.ground_elevation_ft,
        },
        valid_time,
    })
}
