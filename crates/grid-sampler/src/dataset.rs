//! Decoded dataset shape shared by all decoders.

use std::path::Path;

use profiler_common::{ProfileError, ProfileResult};

use crate::locate::GridCell;

/// A latitude or longitude coordinate array.
///
/// Regular grids carry one value per axis position (rank 1); curvilinear
/// grids carry one value per cell (rank 2), because grid rows/columns do
/// not align with constant-latitude/longitude lines.
#[derive(Debug, Clone)]
pub enum CoordField {
    Rank1(Vec<f64>),
    Rank2 {
        /// Row-major per-cell values, `rows * cols` long.
        values: Vec<f64>,
        rows: usize,
        cols: usize,
    },
}

impl CoordField {
    pub fn rank(&self) -> usize {
        match self {
            CoordField::Rank1(_) => 1,
            CoordField::Rank2 { .. } => 2,
        }
    }
}

/// Wind data decoded from one forecast artifact at one valid time.
///
/// The core only reads this; it is owned by the request and released once
/// the profile is built.
#[derive(Debug, Clone)]
pub struct WindFields {
    pub latitudes: CoordField,
    pub longitudes: CoordField,
    /// Pressure-level axis in hPa, ordered by decreasing pressure.
    pub levels_hpa: Vec<f64>,
    /// Per-level eastward wind component (m/s), each row-major over the grid.
    pub u: Vec<Vec<f64>>,
    /// Per-level northward wind component (m/s), each row-major over the grid.
    pub v: Vec<Vec<f64>>,
    /// Grid shape as (rows, cols).
    pub shape: (usize, usize),
}

impl WindFields {
    /// Check internal consistency; a violation means the decoder produced
    /// a malformed dataset.
    pub fn validate(&self) -> ProfileResult<()> {
        let (rows, cols) = self.shape;
        let cells = rows * cols;

        if self.levels_hpa.len() != self.u.len() || self.levels_hpa.len() != self.v.len() {
            return Err(ProfileError::DecodeFailure(format!(
                "level axis has {} entries but {} u / {} v component arrays",
                self.levels_hpa.len(),
                self.u.len(),
                self.v.len()
            )));
        }
        for (i, (u, v)) in self.u.iter().zip(&self.v).enumerate() {
            if u.len() != cells || v.len() != cells {
                return Err(ProfileError::DecodeFailure(format!(
                    "level {} has {} u / {} v values for a {}x{} grid",
                    self.levels_hpa[i],
                    u.len(),
                    v.len(),
                    rows,
                    cols
                )));
            }
        }

        match (&self.latitudes, &self.longitudes) {
            (CoordField::Rank1(lats), CoordField::Rank1(lons)) => {
                if lats.len() != rows || lons.len() != cols {
                    return Err(ProfileError::DecodeFailure(format!(
                        "coordinate axes {}x{} do not match grid shape {}x{}",
                        lats.len(),
                        lons.len(),
                        rows,
                        cols
                    )));
                }
            }
            (
                CoordField::Rank2 {
                    values: lats,
                    rows: lr,
                    cols: lc,
                },
                CoordField::Rank2 {
                    values: lons,
                    rows: or,
                    cols: oc,
                },
            ) => {
                if (*lr, *lc) != self.shape
                    || (*or, *oc) != self.shape
                    || lats.len() != cells
                    || lons.len() != cells
                {
                    return Err(ProfileError::DecodeFailure(
                        "rank-2 coordinate arrays do not match grid shape".to_string(),
                    ));
                }
            }
            _ => {
                return Err(ProfileError::DecodeFailure(
                    "latitude and longitude arrays have different ranks".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Wind components (u, v) in m/s at one pressure level and cell.
    pub fn wind_at(&self, level: usize, cell: &GridCell) -> ProfileResult<(f64, f64)> {
        let (rows, cols) = self.shape;
        if cell.row >= rows || cell.col >= cols {
            return Err(ProfileError::BoundsError {
                row: cell.row,
                col: cell.col,
                rows,
                cols,
            });
        }
        let flat = cell.row * cols + cell.col;
        let u = self.u.get(level).and_then(|l| l.get(flat));
        let v = self.v.get(level).and_then(|l| l.get(flat));
        match (u, v) {
            (Some(u), Some(v)) => Ok((*u, *v)),
            _ => Err(ProfileError::DecodeFailure(format!(
                "no wind components at level index {}",
                level
            ))),
        }
    }
}

/// Decode capability: artifact file in, [`WindFields`] out.
///
/// Any conforming decoder is substitutable; tests build `WindFields`
/// directly.
pub trait ForecastDecode {
    fn decode(&self, path: &Path) -> ProfileResult<WindFields>;
}
