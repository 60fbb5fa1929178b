//! Generators for synthetic wind fields and elevation tiles.
//!
//! These produce predictable, verifiable data patterns shared across the
//! test suite.

use grid_sampler::{CoordField, WindFields};

/// Build wind fields on a regular grid with uniform wind per level.
///
/// `levels` is a list of `(pressure_hpa, u, v)`; every cell of a level
/// carries the same components, so interpolation results are exactly
/// predictable.
pub fn regular_fields(lats: Vec<f64>, lons: Vec<f64>, levels: &[(f64, f64, f64)]) -> WindFields {
    let rows = lats.len();
    let cols = lons.len();
    let cells = rows * cols;

    let mut levels_hpa = Vec::with_capacity(levels.len());
    let mut u = Vec::with_capacity(levels.len());
    let mut v = Vec::with_capacity(levels.len());
    for &(p, lu, lv) in levels {
        levels_hpa.push(p);
        u.push(vec![lu; cells]);
        v.push(vec![lv; cells]);
    }

    WindFields {
        latitudes: CoordField::Rank1(lats),
        longitudes: CoordField::Rank1(lons),
        levels_hpa,
        u,
        v,
        shape: (rows, cols),
    }
}

/// Build wind fields on a curvilinear grid from per-cell coordinates.
///
/// `cell_lats`/`cell_lons` are row-major `rows * cols` arrays. Wind is
/// uniform per level, as in [`regular_fields`].
pub fn curvilinear_fields(
    cell_lats: Vec<f64>,
    cell_lons: Vec<f64>,
    rows: usize,
    cols: usize,
    levels: &[(f64, f64, f64)],
) -> WindFields {
    let cells = rows * cols;
    assert_eq!(cell_lats.len(), cells);
    assert_eq!(cell_lons.len(), cells);

    let mut levels_hpa = Vec::with_capacity(levels.len());
    let mut u = Vec::with_capacity(levels.len());
    let mut v = Vec::with_capacity(levels.len());
    for &(p, lu, lv) in levels {
        levels_hpa.push(p);
        u.push(vec![lu; cells]);
        v.push(vec![lv; cells]);
    }

    WindFields {
        latitudes: CoordField::Rank2 {
            values: cell_lats,
            rows,
            cols,
        },
        longitudes: CoordField::Rank2 {
            values: cell_lons,
            rows,
            cols,
        },
        levels_hpa,
        u,
        v,
        shape: (rows, cols),
    }
}

/// Build a tile image: `header_len` filler bytes followed by
/// `rows * cols` big-endian i16 samples from `sample(row, col)`.
pub fn tile_bytes(
    header_len: usize,
    rows: usize,
    cols: usize,
    sample: impl Fn(usize, usize) -> i16,
) -> Vec<u8> {
    let mut data = vec![0u8; header_len];
    for row in 0..rows {
        for col in 0..cols {
            data.extend_from_slice(&sample(row, col).to_be_bytes());
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_fields_shape() {
        let fields = regular_fields(
            vec![33.0, 32.0],
            vec![248.0, 249.0, 250.0],
            &[(1000.0, 0.0, 10.0)],
        );
        assert_eq!(fields.shape, (2, 3));
        assert!(fields.validate().is_ok());
    }

    #[test]
    fn test_tile_bytes_layout() {
        let data = tile_bytes(4, 2, 2, |r, c| (r * 10 + c) as i16);
        assert_eq!(data.len(), 4 + 2 * 2 * 2);
        // First sample follows the header, big endian.
        assert_eq!(&data[4..6], &0i16.to_be_bytes());
        assert_eq!(&data[10..12], &11i16.to_be_bytes());
    }
}
