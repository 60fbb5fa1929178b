//! Pre-defined fixtures for documented scenarios.

use grid_sampler::WindFields;

use crate::generators::regular_fields;

/// The synthetic three-level global dataset used by the end-to-end
/// scenario: a coarse regular grid around (32.22, -110.94) in unsigned
/// longitude convention, with
/// 1000 hPa: u=0, v=10; 500 hPa: u=10, v=0; 200 hPa: u=0, v=-20.
pub fn three_level_global_fields() -> WindFields {
    regular_fields(
        vec![34.0, 33.0, 32.0, 31.0],
        vec![247.0, 248.0, 249.0, 250.0, 251.0],
        &[
            (1000.0, 0.0, 10.0),
            (500.0, 10.0, 0.0),
            (200.0, 0.0, -20.0),
        ],
    )
}

/// Target coordinate for the end-to-end scenario (Tucson, AZ).
pub const SCENARIO_LAT: f64 = 32.22;
pub const SCENARIO_LON: f64 = -110.94;
