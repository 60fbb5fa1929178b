//! Archive-level elevation lookup.

use std::path::PathBuf;

use tracing::debug;

use profiler_common::{ProfileError, ProfileResult};

use crate::tile::{tile_name, Tile, TileFormat};

pub const METERS_TO_FEET: f64 = 3.28084;

/// A directory of elevation tiles sharing one layout.
pub struct TerrainArchive {
    dir: PathBuf,
    format: TileFormat,
}

impl TerrainArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            format: TileFormat::default(),
        }
    }

    pub fn with_format(dir: impl Into<PathBuf>, format: TileFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
        }
    }

    /// Ground elevation in feet at a coordinate.
    ///
    /// Returns `TerrainNotFound` if the covering tile is absent; callers
    /// may fall back to a manually supplied ground elevation.
    pub fn elevation_ft(&self, lat: f64, lon: f64) -> ProfileResult<f64> {
        let name = tile_name(lat, lon);
        let path = self.dir.join(&name);

        let data = std::fs::read(&path).map_err(|_| ProfileError::TerrainNotFound {
            lat,
            lon,
            tile: name.clone(),
        })?;
        let tile = Tile::from_bytes(data, self.format)?;

        // Fractional position inside the tile; row 0 is the north edge,
        // so the row axis runs opposite to latitude.
        let row_span = (self.format.rows - 1) as f64;
        let col_span = (self.format.cols - 1) as f64;
        let row_f = (1.0 - (lat - lat.floor())) * row_span;
        let col_f = (lon - lon.floor()) * col_span;

        // Clamp the base index so all four bilinear corners stay in bounds.
        let row0 = (row_f.floor() as usize).min(self.format.rows - 2);
        let col0 = (col_f.floor() as usize).min(self.format.cols - 2);
        let dr = row_f - row0 as f64;
        let dc = col_f - col0 as f64;

        let e00 = tile.sample_meters(row0, col0);
        let e01 = tile.sample_meters(row0, col0 + 1);
        let e10 = tile.sample_meters(row0 + 1, col0);
        let e11 = tile.sample_meters(row0 + 1, col0 + 1);

        let north = e00 * (1.0 - dc) + e01 * dc;
        let south = e10 * (1.0 - dc) + e11 * dc;
        let elevation_m = north * (1.0 - dr) + south * dr;

        debug!(
            tile = %name,
            row0,
            col0,
            elevation_m,
            "Interpolated ground elevation"
        );
        Ok(elevation_m * METERS_TO_FEET)
    }
}
