//! GRIB2 decode adapter built on the `grib` crate.
//!
//! Selects isobaric-level wind component records (discipline 0, category
//! 2, parameters UGRD/VGRD, surface type 100) and exposes them as
//! [`WindFields`]. Everything else in the artifact is ignored.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::{debug, warn};

use profiler_common::{ProfileError, ProfileResult};

use crate::dataset::{CoordField, ForecastDecode, WindFields};

const DISCIPLINE_METEOROLOGICAL: u8 = 0;
const CATEGORY_MOMENTUM: u8 = 2;
const PARAM_UGRD: u8 = 2;
const PARAM_VGRD: u8 = 3;
/// GRIB2 fixed surface type 100: isobaric surface, value in Pa.
const SURFACE_ISOBARIC: u8 = 100;

#[derive(Default)]
struct LevelComponents {
    u: Option<Vec<f64>>,
    v: Option<Vec<f64>>,
}

/// Production decoder for NOMADS GRIB2 artifacts.
pub struct Grib2Decoder;

impl ForecastDecode for Grib2Decoder {
    fn decode(&self, path: &Path) -> ProfileResult<WindFields> {
        let file = File::open(path)?;
        let grib2 = grib::from_reader(BufReader::new(file)).map_err(|e| {
            ProfileError::DecodeFailure(format!("{} is not a readable GRIB2 file: {:?}", path.display(), e))
        })?;

        // Pressure in integer Pa keys the map so levels merge across the
        // U and V records without float-keyed comparisons.
        let mut levels: BTreeMap<u32, LevelComponents> = BTreeMap::new();
        let mut coords: Option<(Vec<f64>, Vec<f64>)> = None;

        for (_index, submessage) in grib2.iter() {
            if submessage.indicator().discipline != DISCIPLINE_METEOROLOGICAL {
                continue;
            }

            let prod_def = submessage.prod_def();
            let (Some(category), Some(number)) =
                (prod_def.parameter_category(), prod_def.parameter_number())
            else {
                continue;
            };
            if category != CATEGORY_MOMENTUM || (number != PARAM_UGRD && number != PARAM_VGRD) {
                continue;
            }

            let Some((surface, _)) = prod_def.fixed_surfaces() else {
                continue;
            };
            if surface.surface_type != SURFACE_ISOBARIC {
                continue;
            }
            let pressure_pa = surface.value();
            if !pressure_pa.is_finite() || pressure_pa <= 0.0 {
                continue;
            }
            let key = pressure_pa.round() as u32;

            // All selected records share one grid; coordinates come from
            // the first and the rest are validated by length below.
            if coords.is_none() {
                let latlons = submessage.latlons().map_err(|e| {
                    ProfileError::DecodeFailure(format!("failed to read grid coordinates: {:?}", e))
                })?;
                coords = Some(latlons.map(|(la, lo)| (la as f64, lo as f64)).unzip());
            }

            let decoder = grib::Grib2SubmessageDecoder::from(submessage).map_err(|e| {
                ProfileError::DecodeFailure(format!("failed to prepare record decoder: {:?}", e))
            })?;
            let values: Vec<f64> = decoder
                .dispatch()
                .map_err(|e| {
                    ProfileError::DecodeFailure(format!("failed to unpack record values: {:?}", e))
                })?
                .map(|x| x as f64)
                .collect();

            let entry = levels.entry(key).or_default();
            let slot = if number == PARAM_UGRD {
                &mut entry.u
            } else {
                &mut entry.v
            };
            if slot.is_some() {
                warn!(pressure_pa = key, "Duplicate wind record, keeping the first");
                continue;
            }
            *slot = Some(values);
        }

        let (lats, lons) = coords.ok_or_else(|| {
            ProfileError::DecodeFailure(
                "no isobaric wind records in artifact; likely a mismatched level-type request"
                    .to_string(),
            )
        })?;
        let (latitudes, longitudes, shape) = split_coords(lats, lons);
        let cells = shape.0 * shape.1;

        let mut levels_hpa = Vec::new();
        let mut u = Vec::new();
        let mut v = Vec::new();
        // Reverse iteration: decreasing pressure, i.e. increasing altitude.
        for (pa, comps) in levels.into_iter().rev() {
            match (comps.u, comps.v) {
                (Some(ul), Some(vl)) if ul.len() == cells && vl.len() == cells => {
                    levels_hpa.push(pa as f64 / 100.0);
                    u.push(ul);
                    v.push(vl);
                }
                _ => {
                    warn!(
                        pressure_pa = pa,
                        "Level missing a wind component or mis-sized, skipping"
                    );
                }
            }
        }

        if levels_hpa.is_empty() {
            return Err(ProfileError::DecodeFailure(
                "no pressure level carried both wind components".to_string(),
            ));
        }

        debug!(
            levels = levels_hpa.len(),
            rows = shape.0,
            cols = shape.1,
            rank = latitudes.rank(),
            "Decoded wind fields"
        );

        let fields = WindFields {
            latitudes,
            longitudes,
            levels_hpa,
            u,
            v,
            shape,
        };
        fields.validate()?;
        Ok(fields)
    }
}

/// Rebuild axis structure from flattened per-cell coordinates.
///
/// A grid that verifies as regular (constant latitude per row, identical
/// longitude sequence every row) becomes rank-1 axes. Anything else is
/// exposed as rank-2 over a single scan line; the joint locator search
/// does not depend on row structure.
fn split_coords(lats: Vec<f64>, lons: Vec<f64>) -> (CoordField, CoordField, (usize, usize)) {
    if let Some((row_lats, col_lons)) = detect_regular(&lats, &lons) {
        let shape = (row_lats.len(), col_lons.len());
        (
            CoordField::Rank1(row_lats),
            CoordField::Rank1(col_lons),
            shape,
        )
    } else {
        let n = lats.len();
        (
            CoordField::Rank2 {
                values: lats,
                rows: 1,
                cols: n,
            },
            CoordField::Rank2 {
                values: lons,
                rows: 1,
                cols: n,
            },
            (1, n),
        )
    }
}

fn detect_regular(lats: &[f64], lons: &[f64]) -> Option<(Vec<f64>, Vec<f64>)> {
    const EPS: f64 = 1e-6;

    let n = lats.len();
    if n == 0 || lons.len() != n {
        return None;
    }

    // Row length is the opening run of constant latitude.
    let cols = lats
        .iter()
        .position(|&l| (l - lats[0]).abs() > EPS)
        .unwrap_or(n);
    if cols == 0 || n % cols != 0 {
        return None;
    }
    let rows = n / cols;
    let first_row_lons = &lons[..cols];

    let mut row_lats = Vec::with_capacity(rows);
    for r in 0..rows {
        let base = r * cols;
        let row_lat = lats[base];
        for c in 0..cols {
            if (lats[base + c] - row_lat).abs() > EPS {
                return None;
            }
            if (lons[base + c] - first_row_lons[c]).abs() > EPS {
                return None;
            }
        }
        row_lats.push(row_lat);
    }

    Some((row_lats, first_row_lons.to_vec()))
}
