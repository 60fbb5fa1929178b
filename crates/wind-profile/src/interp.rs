//! Piecewise-linear interpolation with boundary extrapolation.

/// Interpolate `points` (sorted by x, at least one entry) at `x`.
///
/// Inside the data range this is ordinary piecewise-linear
/// interpolation. Outside it, the line through the two nearest boundary
/// points is extended — extrapolated values are lower confidence but
/// never an error.
pub fn interp_extrapolate(points: &[(f64, f64)], x: f64) -> f64 {
    match points {
        [] => 0.0,
        [(_, y)] => *y,
        _ => {
            let segment = if x <= points[0].0 {
                (&points[0], &points[1])
            } else if x >= points[points.len() - 1].0 {
                (&points[points.len() - 2], &points[points.len() - 1])
            } else {
                // Last point at or below x; the guard above makes the
                // bracket well-formed.
                let i = points
                    .iter()
                    .rposition(|(px, _)| *px <= x)
                    .unwrap_or(0)
                    .min(points.len() - 2);
                (&points[i], &points[i + 1])
            };

            let ((x0, y0), (x1, y1)) = (segment.0, segment.1);
            if (x1 - x0).abs() < f64::EPSILON {
                return *y0;
            }
            y0 + (x - x0) * (y1 - y0) / (x1 - x0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINTS: [(f64, f64); 3] = [(0.0, 10.0), (100.0, 30.0), (200.0, 20.0)];

    #[test]
    fn test_exact_nodes_return_raw_values() {
        assert_eq!(interp_extrapolate(&POINTS, 0.0), 10.0);
        assert_eq!(interp_extrapolate(&POINTS, 100.0), 30.0);
        assert_eq!(interp_extrapolate(&POINTS, 200.0), 20.0);
    }

    #[test]
    fn test_midpoint_interpolation() {
        assert_eq!(interp_extrapolate(&POINTS, 50.0), 20.0);
        assert_eq!(interp_extrapolate(&POINTS, 150.0), 25.0);
    }

    #[test]
    fn test_extrapolation_below_range() {
        // Line through (0,10) and (100,30) extended to -50.
        assert_eq!(interp_extrapolate(&POINTS, -50.0), 0.0);
    }

    #[test]
    fn test_extrapolation_above_range() {
        // Line through (100,30) and (200,20) extended to 300.
        assert_eq!(interp_extrapolate(&POINTS, 300.0), 10.0);
    }

    #[test]
    fn test_single_point_is_constant() {
        let points = [(50.0, 7.0)];
        assert_eq!(interp_extrapolate(&points, -100.0), 7.0);
        assert_eq!(interp_extrapolate(&points, 500.0), 7.0);
    }
}
