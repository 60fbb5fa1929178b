//! Nearest-cell location over synthetic grids.

use grid_sampler::{nearest_cell, CoordField, GridCell, WindFields};
use profiler_common::{LonConvention, ProfileError};
use test_utils::{curvilinear_fields, regular_fields};

fn unsigned_regular() -> WindFields {
    regular_fields(
        vec![34.0, 33.0, 32.0, 31.0],
        vec![247.0, 248.0, 249.0, 250.0, 251.0],
        &[(1000.0, 0.0, 10.0)],
    )
}

// ============================================================================
// Regular (rank-1) grids
// ============================================================================

#[test]
fn test_regular_nearest_by_absolute_difference() {
    let fields = unsigned_regular();
    let cell = nearest_cell(&fields, 32.22, -110.94, LonConvention::Unsigned).unwrap();
    // -110.94 normalizes to 249.06: closest latitude 32, longitude 249.
    assert_eq!((cell.row, cell.col), (2, 2));
    assert_eq!(cell.lat, 32.0);
    assert_eq!(cell.lon, 249.0);
}

#[test]
fn test_exact_grid_point_returns_that_index() {
    let fields = unsigned_regular();
    let cell = nearest_cell(&fields, 33.0, 248.0, LonConvention::Unsigned).unwrap();
    assert_eq!((cell.row, cell.col), (1, 1));
}

#[test]
fn test_longitude_normalization_equivalence() {
    // A target given as -110 must resolve identically to 250 against an
    // unsigned-convention dataset.
    let fields = unsigned_regular();
    let west = nearest_cell(&fields, 32.22, -110.0, LonConvention::Unsigned).unwrap();
    let east = nearest_cell(&fields, 32.22, 250.0, LonConvention::Unsigned).unwrap();
    assert_eq!(west, east);
    assert_eq!(west.lon, 250.0);
}

#[test]
fn test_signed_convention_normalizes_the_other_way() {
    let fields = regular_fields(
        vec![33.0, 32.0],
        vec![-112.0, -111.0, -110.0],
        &[(1000.0, 1.0, 1.0)],
    );
    let cell = nearest_cell(&fields, 32.0, 250.0, LonConvention::Signed).unwrap();
    assert_eq!((cell.row, cell.col), (1, 2));
    assert_eq!(cell.lon, -110.0);
}

// ============================================================================
// Curvilinear (rank-2) grids
// ============================================================================

#[test]
fn test_curvilinear_joint_search() {
    // 2x3 grid with slightly rotated rows, as a projected grid produces.
    let fields = curvilinear_fields(
        vec![40.0, 40.1, 40.2, 39.0, 39.1, 39.2],
        vec![250.0, 251.0, 252.0, 250.2, 251.2, 252.2],
        2,
        3,
        &[(1000.0, 2.0, 2.0)],
    );
    let cell = nearest_cell(&fields, 39.15, -108.85, LonConvention::Unsigned).unwrap();
    // 251.15E, 39.15N is closest to cell (1, 1) = (39.1, 251.2) by L1.
    assert_eq!((cell.row, cell.col), (1, 1));
}

#[test]
fn test_curvilinear_tie_takes_first_in_row_major_order() {
    // Two cells equidistant from the target; the first one wins.
    let fields = curvilinear_fields(
        vec![10.0, 20.0, 20.0, 10.0],
        vec![100.0, 100.0, 100.0, 100.0],
        2,
        2,
        &[(1000.0, 0.0, 0.0)],
    );
    let cell = nearest_cell(&fields, 15.0, 100.0, LonConvention::Unsigned).unwrap();
    assert_eq!((cell.row, cell.col), (0, 0));
}

// ============================================================================
// Malformed datasets
// ============================================================================

#[test]
fn test_mixed_coordinate_ranks_rejected() {
    let mut fields = unsigned_regular();
    fields.longitudes = CoordField::Rank2 {
        values: vec![0.0; 20],
        rows: 4,
        cols: 5,
    };
    let err = nearest_cell(&fields, 32.0, 249.0, LonConvention::Unsigned).unwrap_err();
    assert!(matches!(err, ProfileError::DecodeFailure(_)));
}

#[test]
fn test_wind_at_out_of_bounds_cell_is_fatal() {
    let fields = unsigned_regular();
    let bogus = GridCell {
        row: 7,
        col: 0,
        lat: 0.0,
        lon: 0.0,
    };
    let err = fields.wind_at(0, &bogus).unwrap_err();
    assert!(matches!(err, ProfileError::BoundsError { rows: 4, cols: 5, .. }));
}

#[test]
fn test_validate_catches_missized_component_array() {
    let mut fields = unsigned_regular();
    fields.u[0].pop();
    assert!(matches!(
        fields.validate(),
        Err(ProfileError::DecodeFailure(_))
    ));
}
