use crate::{
    math::{angular_distance, azimuth, distance, lerp, wrap_longitude},
    ContinuousElevationModel, GeoPoint, TerrainError,
};

/// Spacing, in meters, of the exactly computed positions between which
/// [`ElevationProfile::position_at`] interpolates.
pub const POSITION_STEP: f64 = 4096.0;

/// Longest profile, in meters: half a great circle, past which the arc
/// heads back towards its origin.
pub const MAX_PROFILE_LENGTH: f64 = distance::EARTH_PERIMETER / 2.0;

/// Terrain along a great-circle arc leaving `origin` with a given
/// azimuth.
///
/// Positions are computed exactly every [`POSITION_STEP`] meters and
/// linearly interpolated in between, which is accurate to well under
/// a sample over the distances a panorama covers.
#[derive(Clone)]
pub struct ElevationProfile<'a> {
    dem: &'a ContinuousElevationModel,

    origin: GeoPoint,

    /// Canonical compass azimuth of the arc at `origin`.
    azimuth: f64,

    /// Length of the arc, in meters.
    length: f64,

    /// Exact positions at multiples of `POSITION_STEP`, covering at
    /// least `length`.
    positions: Vec<GeoPoint>,
}

impl<'a> ElevationProfile<'a> {
    pub fn new(
        dem: &'a ContinuousElevationModel,
        origin: GeoPoint,
        azimuth: f64,
        length: f64,
    ) -> Result<Self, TerrainError> {
        let math_azimuth = azimuth::to_math(azimuth)?;
        if !length.is_finite() || length <= 0.0 || length > MAX_PROFILE_LENGTH {
            return Err(TerrainError::Length(length));
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let n_steps = (length / POSITION_STEP).ceil() as usize;
        let positions = (0..=n_steps)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let x = i as f64 * POSITION_STEP;
                great_circle_position(origin, math_azimuth, x)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            dem,
            origin,
            azimuth,
            length,
            positions,
        })
    }

    pub fn origin(&self) -> GeoPoint {
        self.origin
    }

    pub fn azimuth(&self) -> f64 {
        self.azimuth
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// Position `x` meters from the origin.
    pub fn position_at(&self, x: f64) -> Result<GeoPoint, TerrainError> {
        if !(0.0..=self.length).contains(&x) {
            return Err(TerrainError::Position {
                x,
                length: self.length,
            });
        }
        let scaled = x / POSITION_STEP;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let i = scaled.floor() as usize;
        let (p0, p1) = match (self.positions.get(i), self.positions.get(i + 1)) {
            (Some(p0), Some(p1)) => (*p0, *p1),
            (Some(p0), None) => return Ok(*p0),
            _ => {
                return Err(TerrainError::Position {
                    x,
                    length: self.length,
                })
            }
        };
        let t = scaled - scaled.floor();
        if t == 0.0 {
            return Ok(p0);
        }
        let longitude = wrap_longitude(
            p0.longitude() + t * angular_distance(p0.longitude(), p1.longitude()),
        );
        let latitude = lerp(p0.latitude(), p1.latitude(), t);
        GeoPoint::new(longitude, latitude)
    }

    /// Terrain elevation `x` meters from the origin.
    pub fn elevation_at(&self, x: f64) -> Result<f64, TerrainError> {
        self.dem.elevation_at(self.position_at(x)?)
    }

    /// Terrain slope `x` meters from the origin.
    pub fn slope_at(&self, x: f64) -> Result<f64, TerrainError> {
        self.dem.slope_at(self.position_at(x)?)
    }
}

/// Exact position `x` meters along the great circle leaving `origin`
/// at mathematical angle `math_azimuth`.
fn great_circle_position(
    origin: GeoPoint,
    math_azimuth: f64,
    x: f64,
) -> Result<GeoPoint, TerrainError> {
    if x == 0.0 {
        return Ok(origin);
    }
    let delta = distance::to_radians(x);
    let (lat0, lon0) = (origin.latitude(), origin.longitude());
    let sin_lat = lat0.sin() * delta.cos() + lat0.cos() * delta.sin() * math_azimuth.cos();
    let latitude = sin_lat.clamp(-1.0, 1.0).asin();
    let sin_d_lon = (math_azimuth.sin() * delta.sin() / latitude.cos()).clamp(-1.0, 1.0);
    let longitude = wrap_longitude(lon0 - sin_d_lon.asin());
    GeoPoint::new(longitude, latitude)
}

#[cfg(test)]
mod tests {
    use super::{ElevationProfile, MAX_PROFILE_LENGTH, POSITION_STEP};
    use crate::{ContinuousElevationModel, GeoPoint, TerrainError};
    use approx::assert_abs_diff_eq;
    use dem::{geo::geometry::Coord, DiscreteElevationModel, HgtTile, SAMPLES_PER_RADIAN, SAMPLES_PER_TILE};

    fn flat(elevation: i16) -> ContinuousElevationModel {
        let tile = HgtTile::in_mem(Coord { x: 6, y: 46 }, vec![elevation; SAMPLES_PER_TILE]).unwrap();
        ContinuousElevationModel::new(DiscreteElevationModel::from(tile))
    }

    fn origin() -> GeoPoint {
        GeoPoint::from_degrees(6.0, 46.0).unwrap()
    }

    #[test]
    fn test_invalid_arguments() {
        let cem = flat(0);
        assert!(matches!(
            ElevationProfile::new(&cem, origin(), -0.1, 1000.0),
            Err(TerrainError::Azimuth(_))
        ));
        assert!(matches!(
            ElevationProfile::new(&cem, origin(), std::f64::consts::TAU, 1000.0),
            Err(TerrainError::Azimuth(_))
        ));
        assert!(matches!(
            ElevationProfile::new(&cem, origin(), 0.0, 0.0),
            Err(TerrainError::Length(_))
        ));
        for length in [f64::NAN, f64::INFINITY, MAX_PROFILE_LENGTH + 1.0, 1e300] {
            assert!(matches!(
                ElevationProfile::new(&cem, origin(), 0.0, length),
                Err(TerrainError::Length(_))
            ));
        }
        assert!(ElevationProfile::new(&cem, origin(), 1.0, MAX_PROFILE_LENGTH).is_ok());
        let profile = ElevationProfile::new(&cem, origin(), 0.0, 1000.0).unwrap();
        assert!(matches!(
            profile.position_at(1000.5),
            Err(TerrainError::Position { .. })
        ));
        assert!(profile.position_at(-0.5).unwrap_err().is_out_of_bounds());
        assert!(profile.position_at(1000.0).is_ok());
    }

    #[test]
    fn test_position_at() {
        let cem = flat(0);
        let profile =
            ElevationProfile::new(&cem, origin(), 45_f64.to_radians(), 110_000.0).unwrap();
        let tolerance = 1.0 / SAMPLES_PER_RADIAN;
        for (x, lon, lat) in [
            (0.0, 6.00000, 46.00000),
            (4096.0, 6.03751, 46.02604),
            (8192.0, 6.07506, 46.05207),
            (10240.0, 6.09385, 46.06508),
            (12288.0, 6.11265, 46.07809),
            (102400.0, 6.94857, 46.64729),
        ] {
            let p = profile.position_at(x).unwrap();
            assert_abs_diff_eq!(p.longitude(), f64::to_radians(lon), epsilon = tolerance);
            assert_abs_diff_eq!(p.latitude(), f64::to_radians(lat), epsilon = tolerance);
        }
    }

    #[test]
    fn test_position_continuity() {
        let cem = flat(0);
        for azimuth in [0.0, 1.0, 2.5, 4.0, 5.9] {
            let profile = ElevationProfile::new(&cem, origin(), azimuth, 50_000.0).unwrap();
            assert_eq!(profile.position_at(0.0).unwrap(), origin());
            assert_abs_diff_eq!(
                profile.position_at(1e-9).unwrap().longitude(),
                origin().longitude(),
                epsilon = 1e-12
            );
            let mut previous = origin();
            let mut x = 0.0;
            while x + 750.0 <= profile.length() {
                x += 750.0;
                let p = profile.position_at(x).unwrap();
                assert_abs_diff_eq!(previous.distance_to(&p), 750.0, epsilon = 2.0);
                assert_abs_diff_eq!(origin().distance_to(&p), x, epsilon = 2.0);
                previous = p;
            }
        }
    }

    #[test]
    fn test_north_and_east() {
        let cem = flat(0);
        let north = ElevationProfile::new(&cem, origin(), 0.0, 20_000.0).unwrap();
        let p = north.position_at(2.0 * POSITION_STEP).unwrap();
        assert_abs_diff_eq!(p.longitude(), origin().longitude(), epsilon = 1e-12);
        assert!(p.latitude() > origin().latitude());

        let east = ElevationProfile::new(&cem, origin(), 90_f64.to_radians(), 20_000.0).unwrap();
        let p = east.position_at(10_000.0).unwrap();
        assert!(p.longitude() > origin().longitude());
        assert_abs_diff_eq!(origin().azimuth_to(&p), 90_f64.to_radians(), epsilon = 1e-3);
    }

    #[test]
    fn test_elevation_and_slope() {
        let cem = flat(1200);
        let profile = ElevationProfile::new(&cem, origin(), 0.5, 20_000.0).unwrap();
        assert_abs_diff_eq!(profile.elevation_at(12_345.0).unwrap(), 1200.0);
        assert_abs_diff_eq!(profile.slope_at(12_345.0).unwrap(), 0.0);
    }
}
