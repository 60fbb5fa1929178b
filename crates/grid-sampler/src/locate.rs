//! Nearest-cell search over regular and curvilinear coordinate arrays.

use tracing::debug;

use profiler_common::{LonConvention, ProfileError, ProfileResult};

use crate::dataset::{CoordField, WindFields};

/// A resolved grid cell with the coordinates it actually sits at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
    /// Latitude of the grid point, from the dataset
    pub lat: f64,
    /// Longitude of the grid point, in the dataset's convention
    pub lon: f64,
}

/// Find the grid cell nearest to a target coordinate.
///
/// The target longitude is first normalized to the dataset's declared
/// convention. Rank-1 arrays are searched per axis by absolute
/// difference; rank-2 arrays use a joint search minimizing
/// |Δlat| + |Δlon| over the flattened grid (an L1 approximation, not
/// geodesic distance). Ties resolve to the first minimum in row-major
/// order.
pub fn nearest_cell(
    fields: &WindFields,
    lat: f64,
    lon: f64,
    convention: LonConvention,
) -> ProfileResult<GridCell> {
    let lon_adj = convention.normalize(lon);
    if (lon_adj - lon).abs() > f64::EPSILON {
        debug!(lon, lon_adj, "Normalized longitude to dataset convention");
    }

    let cell = match (&fields.latitudes, &fields.longitudes) {
        (CoordField::Rank1(lats), CoordField::Rank1(lons)) => {
            let row = nearest_index(lats, lat);
            let col = nearest_index(lons, lon_adj);
            GridCell {
                row,
                col,
                lat: lats[row],
                lon: lons[col],
            }
        }
        (
            CoordField::Rank2 {
                values: lats, cols, ..
            },
            CoordField::Rank2 { values: lons, .. },
        ) => {
            let mut best = 0usize;
            let mut best_diff = f64::INFINITY;
            for (i, (cell_lat, cell_lon)) in lats.iter().zip(lons.iter()).enumerate() {
                let diff = (cell_lat - lat).abs() + (cell_lon - lon_adj).abs();
                if diff < best_diff {
                    best_diff = diff;
                    best = i;
                }
            }
            GridCell {
                row: best / cols,
                col: best % cols,
                lat: lats[best],
                lon: lons[best],
            }
        }
        _ => {
            return Err(ProfileError::DecodeFailure(
                "latitude and longitude arrays have different ranks".to_string(),
            ));
        }
    };

    // The search is confined to the arrays it searches, so an index
    // outside the grid shape means the dataset itself is malformed.
    let (rows, cols) = fields.shape;
    if cell.row >= rows || cell.col >= cols {
        return Err(ProfileError::BoundsError {
            row: cell.row,
            col: cell.col,
            rows,
            cols,
        });
    }

    debug!(
        target_lat = lat,
        target_lon = lon_adj,
        row = cell.row,
        col = cell.col,
        grid_lat = cell.lat,
        grid_lon = cell.lon,
        "Resolved nearest grid cell"
    );
    Ok(cell)
}

/// Index of the value closest to `target` by absolute difference.
/// The first minimum wins on ties.
fn nearest_index(values: &[f64], target: f64) -> usize {
    let mut best = 0usize;
    let mut best_diff = f64::INFINITY;
    for (i, v) in values.iter().enumerate() {
        let diff = (v - target).abs();
        if diff < best_diff {
            best_diff = diff;
            best = i;
        }
    }
    best
}
