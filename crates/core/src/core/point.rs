#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A position on the map: `row` is latitude and `col` is longitude, both in
/// decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    row: f64,
    col: f64,
}

impl Point {
    pub fn new(row: f64, col: f64) -> Self {
        Self { row, col }
    }

    /// Builds a point from packed `DDMMSS` integers, e.g. `42_21_29` for
    /// 42°21'29". The sign of the packed value is the sign of the angle.
    pub fn from_dms(lat: i32, lon: i32) -> Self {
        Self::new(dms_to_degrees(lat), dms_to_degrees(lon))
    }

    pub fn row(&self) -> f64 {
        self.row
    }

    pub fn col(&self) -> f64 {
        self.col
    }

    pub fn is_finite(&self) -> bool {
        self.row.is_finite() && self.col.is_finite()
    }

    /// Planar distance in degrees.
    pub fn dist(&self, other: &Point) -> f64 {
        (self.row - other.row).hypot(self.col - other.col)
    }
}

fn dms_to_degrees(packed: i32) -> f64 {
    let sign = if packed < 0 { -1.0 } else { 1.0 };
    let v = packed.unsigned_abs();
    let deg = v / 10_000;
    let min = (v / 100) % 100;
    let sec = v % 100;
    sign * (deg as f64 + min as f64 / 60.0 + sec as f64 / 3600.0)
}
