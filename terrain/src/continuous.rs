use crate::{
    math::{bilerp, distance, sq},
    GeoPoint, TerrainError,
};
use dem::{sample_index, DiscreteElevationModel, Interval2D, SAMPLES_PER_RADIAN};

/// Width of one sample, in meters along a meridian, used as the step
/// of the slope's finite differences.
const D: f64 = distance::EARTH_RADIUS / SAMPLES_PER_RADIAN;

/// Elevation and slope at arbitrary points, bilinearly interpolated
/// from a [`DiscreteElevationModel`].
///
/// No clamping is performed: querying a point whose surrounding
/// samples are not all loaded is an error.
pub struct ContinuousElevationModel {
    dem: DiscreteElevationModel,
}

impl ContinuousElevationModel {
    pub fn new(dem: DiscreteElevationModel) -> Self {
        Self { dem }
    }

    /// The underlying discrete model.
    pub fn dem(&self) -> &DiscreteElevationModel {
        &self.dem
    }

    pub fn extent(&self) -> Interval2D {
        self.dem.extent()
    }

    /// Elevation at `p`, in meters.
    pub fn elevation_at(&self, p: GeoPoint) -> Result<f64, TerrainError> {
        self.interpolate(p, |x, y| self.elevation_sample(x, y))
    }

    /// Slope at `p`: angle, in radians, between the terrain's normal
    /// and the vertical.
    pub fn slope_at(&self, p: GeoPoint) -> Result<f64, TerrainError> {
        self.interpolate(p, |x, y| self.slope_sample(x, y))
    }
}

/// Private API
impl ContinuousElevationModel {
    fn elevation_sample(&self, x: i32, y: i32) -> Result<f64, TerrainError> {
        Ok(self.dem.elevation_sample(x, y)?)
    }

    /// Slope of the plane through the sample at `(x, y)` and its
    /// east and north neighbours.
    fn slope_sample(&self, x: i32, y: i32) -> Result<f64, TerrainError> {
        let z = self.elevation_sample(x, y)?;
        let za = self.elevation_sample(x + 1, y)? - z;
        let zb = self.elevation_sample(x, y + 1)? - z;
        Ok((D / (sq(za) + sq(zb) + sq(D)).sqrt()).acos())
    }

    fn interpolate<F>(&self, p: GeoPoint, f: F) -> Result<f64, TerrainError>
    where
        F: Fn(i32, i32) -> Result<f64, TerrainError>,
    {
        let fx = sample_index(p.longitude());
        let fy = sample_index(p.latitude());
        let (x0, y0) = (fx.floor(), fy.floor());
        #[allow(clippy::cast_possible_truncation)]
        let (x, y) = (x0 as i32, y0 as i32);
        Ok(bilerp(
            f(x, y)?,
            f(x + 1, y)?,
            f(x, y + 1)?,
            f(x + 1, y + 1)?,
            fx - x0,
            fy - y0,
        ))
    }
}
