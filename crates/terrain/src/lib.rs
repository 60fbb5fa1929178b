//! Ground elevation lookup over tiled elevation archives.
//!
//! One tile covers a 1°×1° cell and is named from the integer floor of
//! latitude/longitude with hemisphere prefixes (`N32W111.hgt`). Within a
//! tile, elevation is bilinearly interpolated from the four samples
//! around the fractional position, then converted meters to feet. This
//! lookup is independent of forecast data; a manually supplied ground
//! elevation is treated identically downstream.

pub mod lookup;
pub mod tile;

pub use lookup::{TerrainArchive, METERS_TO_FEET};
pub use tile::{tile_name, Tile, TileFormat};
