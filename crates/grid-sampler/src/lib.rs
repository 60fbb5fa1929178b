//! Gridded forecast access: decoded dataset model, nearest-cell location,
//! per-level wind sampling.
//!
//! Decoding a forecast artifact is a capability ([`ForecastDecode`]): any
//! decoder that produces [`WindFields`] — rank-1 or rank-2 coordinate
//! arrays, a pressure-level axis, per-level wind component arrays — is
//! substitutable. [`Grib2Decoder`] is the production implementation.

pub mod dataset;
pub mod decode;
pub mod locate;

pub use dataset::{CoordField, ForecastDecode, WindFields};
pub use decode::Grib2Decoder;
pub use locate::{nearest_cell, GridCell};
