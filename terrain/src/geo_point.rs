use crate::{
    math::{azimuth, distance::EARTH_RADIUS, haversin},
    TerrainError,
};
use geo::geometry::Point;
use std::{
    f64::consts::{FRAC_PI_2, PI},
    fmt,
};

/// A point on the earth's surface, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Longitude in `[-π, π]`.
    longitude: f64,

    /// Latitude in `[-π/2, π/2]`.
    latitude: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, TerrainError> {
        if !(-PI..=PI).contains(&longitude) {
            return Err(TerrainError::Longitude(longitude));
        }
        if !(-FRAC_PI_2..=FRAC_PI_2).contains(&latitude) {
            return Err(TerrainError::Latitude(latitude));
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    pub fn from_degrees(longitude: f64, latitude: f64) -> Result<Self, TerrainError> {
        Self::new(longitude.to_radians(), latitude.to_radians())
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Great-circle distance to `that`, in meters.
    pub fn distance_to(&self, that: &Self) -> f64 {
        let h = haversin(self.latitude - that.latitude)
            + self.latitude.cos() * that.latitude.cos() * haversin(self.longitude - that.longitude);
        2.0 * h.sqrt().min(1.0).asin() * EARTH_RADIUS
    }

    /// Initial compass bearing of the great circle from `self` to
    /// `that`, in `[0, 2π)`.
    pub fn azimuth_to(&self, that: &Self) -> f64 {
        let d_lon = that.longitude - self.longitude;
        let y = d_lon.sin() * that.latitude.cos();
        let x = self.latitude.cos() * that.latitude.sin()
            - self.latitude.sin() * that.latitude.cos() * d_lon.cos();
        azimuth::canonicalize(y.atan2(x))
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.4},{:.4})",
            self.longitude.to_degrees(),
            self.latitude.to_degrees()
        )
    }
}

/// Converts to a `geo` point in degrees.
impl From<GeoPoint> for Point<f64> {
    fn from(p: GeoPoint) -> Self {
        Point::new(p.longitude.to_degrees(), p.latitude.to_degrees())
    }
}

/// Converts from a `geo` point in degrees.
impl TryFrom<Point<f64>> for GeoPoint {
    type Error = TerrainError;

    fn try_from(p: Point<f64>) -> Result<Self, TerrainError> {
        Self::from_degrees(p.x(), p.y())
    }
}
