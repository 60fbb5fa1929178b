//! Vertical wind profile construction.
//!
//! Converts per-pressure-level wind components at one grid cell into a
//! continuous profile at fixed 1000 ft altitude steps, in MSL or AGL
//! reference, using the International Standard Atmosphere for
//! pressure-to-altitude conversion and piecewise-linear interpolation
//! with boundary extrapolation.

pub mod altitude;
pub mod builder;
pub mod interp;

pub use altitude::{pressure_to_alt, ISA_SEA_LEVEL_HPA};
pub use builder::{
    build_profile, level_samples, wind_speed_dir, AltitudeReference, LevelSample, Profile,
    ProfileRequest, ProfileRow, MPS_TO_KNOTS,
};
pub use interp::interp_extrapolate;
