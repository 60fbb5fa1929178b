//! Tile layout and raw sample access.

use bytes::Buf;

use profiler_common::{ProfileError, ProfileResult};

/// Physical layout of one elevation tile: a fixed-size header followed by
/// `rows` rows of `cols` big-endian signed 16-bit samples in meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileFormat {
    pub header_len: usize,
    pub rows: usize,
    pub cols: usize,
}

impl TileFormat {
    /// SRTM 3-arc-second layout: 1201×1201 samples, no header.
    pub fn srtm3() -> Self {
        Self {
            header_len: 0,
            rows: 1201,
            cols: 1201,
        }
    }

    /// SRTM 1-arc-second layout: 3601×3601 samples, no header.
    pub fn srtm1() -> Self {
        Self {
            header_len: 0,
            rows: 3601,
            cols: 3601,
        }
    }

    /// Expected file size for this layout.
    pub fn expected_len(&self) -> usize {
        self.header_len + self.rows * self.cols * 2
    }
}

impl Default for TileFormat {
    fn default() -> Self {
        Self::srtm3()
    }
}

/// Tile file name for a coordinate: hemisphere prefix plus the integer
/// floor of latitude (2 digits) and longitude (3 digits).
pub fn tile_name(lat: f64, lon: f64) -> String {
    let lat_floor = lat.floor() as i32;
    let lon_floor = lon.floor() as i32;
    let ns = if lat_floor < 0 { 'S' } else { 'N' };
    let ew = if lon_floor < 0 { 'W' } else { 'E' };
    format!(
        "{}{:02}{}{:03}.hgt",
        ns,
        lat_floor.abs(),
        ew,
        lon_floor.abs()
    )
}

/// Missing-data marker used by SRTM-style archives.
pub const VOID_SAMPLE: i16 = -32768;

/// A loaded elevation tile.
pub struct Tile {
    data: Vec<u8>,
    format: TileFormat,
}

impl Tile {
    pub fn from_bytes(data: Vec<u8>, format: TileFormat) -> ProfileResult<Self> {
        if format.rows < 2 || format.cols < 2 {
            return Err(ProfileError::DecodeFailure(format!(
                "tile format {}x{} too small for bilinear interpolation",
                format.rows, format.cols
            )));
        }
        if data.len() != format.expected_len() {
            return Err(ProfileError::DecodeFailure(format!(
                "tile is {} bytes, expected {} for {}x{} layout",
                data.len(),
                format.expected_len(),
                format.rows,
                format.cols
            )));
        }
        Ok(Self { data, format })
    }

    pub fn format(&self) -> &TileFormat {
        &self.format
    }

    /// Raw sample in meters. Row 0 is the tile's north edge.
    pub fn sample(&self, row: usize, col: usize) -> i16 {
        let offset = self.format.header_len + (row * self.format.cols + col) * 2;
        let mut slice = &self.data[offset..offset + 2];
        slice.get_i16()
    }

    /// Sample in meters with voids clamped to sea level, so a missing
    /// sample cannot drag the bilinear blend tens of thousands of feet
    /// below ground.
    pub fn sample_meters(&self, row: usize, col: usize) -> f64 {
        let raw = self.sample(row, col);
        if raw == VOID_SAMPLE {
            0.0
        } else {
            raw as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_name_hemispheres() {
        assert_eq!(tile_name(32.22, -110.94), "N32W111.hgt");
        assert_eq!(tile_name(-33.9, 18.4), "S34E018.hgt");
        assert_eq!(tile_name(51.5, -0.1), "N51W001.hgt");
        assert_eq!(tile_name(-1.3, 36.8), "S02E036.hgt");
    }

    #[test]
    fn test_from_bytes_rejects_wrong_size() {
        let format = TileFormat {
            header_len: 0,
            rows: 3,
            cols: 3,
        };
        assert!(Tile::from_bytes(vec![0u8; 17], format).is_err());
        assert!(Tile::from_bytes(vec![0u8; 18], format).is_ok());
    }

    #[test]
    fn test_sample_reads_big_endian() {
        let format = TileFormat {
            header_len: 2,
            rows: 2,
            cols: 2,
        };
        // header then samples 100, 200, -1, 300
        let mut data = vec![0xAA, 0xBB];
        for value in [100i16, 200, -1, 300] {
            data.extend_from_slice(&value.to_be_bytes());
        }
        let tile = Tile::from_bytes(data, format).unwrap();
        assert_eq!(tile.sample(0, 0), 100);
        assert_eq!(tile.sample(0, 1), 200);
        assert_eq!(tile.sample(1, 0), -1);
        assert_eq!(tile.sample(1, 1), 300);
    }

    #[test]
    fn test_void_clamped_to_sea_level() {
        let format = TileFormat {
            header_len: 0,
            rows: 2,
            cols: 2,
        };
        let mut data = Vec::new();
        for value in [VOID_SAMPLE, 10, 20, 30] {
            data.extend_from_slice(&value.to_be_bytes());
        }
        let tile = Tile::from_bytes(data, format).unwrap();
        assert_eq!(tile.sample_meters(0, 0), 0.0);
        assert_eq!(tile.sample_meters(0, 1), 10.0);
    }
}
