//! Pressure to altitude conversion (International Standard Atmosphere).

/// Standard sea-level pressure in hPa.
pub const ISA_SEA_LEVEL_HPA: f64 = 1013.25;

const FEET_PER_METER: f64 = 3.28084;

/// Convert pressure in hPa to altitude in feet using the ISA model:
/// `h_ft = 44330 * (1 - (p / 1013.25)^(1/5.255)) * 3.28084`.
///
/// Strictly decreasing in pressure; `pressure_to_alt(1013.25)` is 0.
pub fn pressure_to_alt(p_hpa: f64) -> f64 {
    44330.0 * (1.0 - (p_hpa / ISA_SEA_LEVEL_HPA).powf(1.0 / 5.255)) * FEET_PER_METER
}
