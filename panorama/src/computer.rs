use crate::{Panorama, PanoramaBuilder, PanoramaError, PanoramaParameters};
use log::debug;
use rayon::prelude::*;
use terrain::{
    math::{distance::EARTH_RADIUS, first_interval_containing_root, improve_root, sq},
    ContinuousElevationModel, ElevationProfile, TerrainError,
};

/// Step (meters) of the coarse search for a ray's first intersection
/// with the terrain.
///
/// Terrain features narrower than this along a ray can be missed.
pub const COARSE_STEP: f64 = 64.0;

/// Width (meters) to which an intersection is refined.
pub const ROOT_TOLERANCE: f64 = 4.0;

/// Standard atmospheric refraction coefficient.
pub const REFRACTION_COEFFICIENT: f64 = 0.13;

/// Curvature of the earth net of refraction, as a quadratic term of
/// the distance.
const CURVATURE: f64 = (1.0 - REFRACTION_COEFFICIENT) / (2.0 * EARTH_RADIUS);

/// Computes [`Panorama`]s over a shared elevation model.
pub struct PanoramaComputer<'a> {
    dem: &'a ContinuousElevationModel,
}

/// One pixel's worth of visible terrain.
struct Hit {
    y: usize,
    distance: f64,
    longitude: f64,
    latitude: f64,
    elevation: f64,
    slope: f64,
}

impl<'a> PanoramaComputer<'a> {
    pub fn new(dem: &'a ContinuousElevationModel) -> Self {
        Self { dem }
    }

    pub fn compute_panorama(
        &self,
        parameters: &PanoramaParameters,
    ) -> Result<Panorama, PanoramaError> {
        self.compute_panorama_with_progress(parameters, || {})
    }

    /// Like [`compute_panorama`](Self::compute_panorama), calling
    /// `on_column` from the worker threads after each column.
    ///
    /// Columns run on the current `rayon` pool.
    #[allow(clippy::cast_possible_truncation)]
    pub fn compute_panorama_with_progress<F>(
        &self,
        parameters: &PanoramaParameters,
        on_column: F,
    ) -> Result<Panorama, PanoramaError>
    where
        F: Fn() + Sync,
    {
        let now = std::time::Instant::now();
        let columns = (0..parameters.width())
            .into_par_iter()
            .map(|x| {
                let column = self.compute_column(parameters, x);
                on_column();
                column
            })
            .collect::<Result<Vec<_>, _>>()?;
        let compute_runtime = now.elapsed();

        let mut builder = PanoramaBuilder::new(parameters.clone());
        let mut hits = 0;
        for (x, column) in columns.into_iter().enumerate() {
            hits += column.len();
            for hit in column {
                builder
                    .set_distance_at(x, hit.y, hit.distance as f32)?
                    .set_longitude_at(x, hit.y, hit.longitude as f32)?
                    .set_latitude_at(x, hit.y, hit.latitude as f32)?
                    .set_elevation_at(x, hit.y, hit.elevation as f32)?
                    .set_slope_at(x, hit.y, hit.slope as f32)?;
            }
        }

        debug!(
            "panorama; size: {}x{}, terrain pixels: {}, exec: {:?}, total: {:?}",
            parameters.width(),
            parameters.height(),
            hits,
            compute_runtime,
            now.elapsed()
        );

        builder.build()
    }
}

/// Private API
impl<'a> PanoramaComputer<'a> {
    /// Scans column `x` from the bottom row up, stopping at the first
    /// row that sees no terrain.
    fn compute_column(
        &self,
        parameters: &PanoramaParameters,
        x: usize,
    ) -> Result<Vec<Hit>, PanoramaError> {
        #[allow(clippy::cast_precision_loss)]
        let azimuth = parameters.azimuth_for_x(x as f64)?;
        let max_distance = parameters.max_distance();
        let profile = ElevationProfile::new(
            self.dem,
            parameters.observer_position(),
            azimuth,
            max_distance,
        )?;

        let mut hits = Vec::new();
        let mut last_root = 0.0;
        for y in (0..parameters.height()).rev() {
            #[allow(clippy::cast_precision_loss)]
            let altitude = parameters.altitude_for_y(y as f64)?;
            let ray = Ray::new(&profile, parameters.observer_elevation(), altitude.tan());
            let f = |d| ray.distance_to_ground(d);
            let start = scan_start(&f, last_root)?;
            let Some(lo) = first_interval_containing_root(&f, start, max_distance, COARSE_STEP)?
            else {
                break;
            };
            let hi = (lo + COARSE_STEP).min(max_distance);
            let root = improve_root(&f, lo, hi, ROOT_TOLERANCE)?;
            let position = profile.position_at(root)?;
            hits.push(Hit {
                y,
                distance: root / altitude.cos(),
                longitude: position.longitude(),
                latitude: position.latitude(),
                elevation: profile.elevation_at(root)?,
                slope: profile.slope_at(root)?,
            });
            last_root = root;
        }
        Ok(hits)
    }
}

/// Where to start the coarse scan of a row, given the previous row's
/// root in the same column.
///
/// Rays only rise from one row to the next, so the previous root bounds
/// this one from below. That holds only while the ray starts above the
/// ground and is still above it at `last_root`; otherwise the scan
/// restarts at the observer.
fn scan_start<F>(f: F, last_root: f64) -> Result<f64, TerrainError>
where
    F: Fn(f64) -> Result<f64, TerrainError>,
{
    if last_root <= 0.0 || f(0.0)? < 0.0 || f(last_root)? < 0.0 {
        Ok(0.0)
    } else {
        Ok(last_root)
    }
}

/// A ray leaving the observer along an elevation profile.
///
/// The earth's curvature, net of refraction, is applied to the ray
/// rather than the terrain.
pub struct Ray<'p, 'a> {
    profile: &'p ElevationProfile<'a>,

    /// Elevation (meters) at the observer.
    ray0: f64,

    /// Rise per meter of horizontal distance.
    ray_slope: f64,
}

impl<'p, 'a> Ray<'p, 'a> {
    pub fn new(profile: &'p ElevationProfile<'a>, ray0: f64, ray_slope: f64) -> Self {
        Self {
            profile,
            ray0,
            ray_slope,
        }
    }

    /// Height (meters) of the ray above the terrain `x` meters from
    /// the observer. Negative once the ray is underground.
    pub fn distance_to_ground(&self, x: f64) -> Result<f64, TerrainError> {
        Ok(self.ray0 + x * self.ray_slope - self.profile.elevation_at(x)? + CURVATURE * sq(x))
    }
}

#[cfg(test)]
mod tests {
    use super::{scan_start, PanoramaComputer, Ray, COARSE_STEP, CURVATURE, ROOT_TOLERANCE};
    use crate::PanoramaParameters;
    use approx::assert_abs_diff_eq;
    use dem::{
        geo::geometry::Coord, DiscreteElevationModel, HgtTile, SAMPLES_PER_ROW, SAMPLES_PER_TILE,
    };
    use terrain::{
        math::{first_interval_containing_root, improve_root},
        ContinuousElevationModel, ElevationProfile, GeoPoint, TerrainError,
    };

    fn flat(elevation: i16) -> ContinuousElevationModel {
        let tile = HgtTile::in_mem(Coord { x: 7, y: 46 }, vec![elevation; SAMPLES_PER_TILE]).unwrap();
        ContinuousElevationModel::new(DiscreteElevationModel::from(tile))
    }

    fn observer() -> GeoPoint {
        GeoPoint::from_degrees(7.5, 46.5).unwrap()
    }

    #[test]
    fn test_ray_distance_to_ground() {
        let cem = flat(500);
        let profile = ElevationProfile::new(&cem, observer(), 1.0, 20_000.0).unwrap();
        let ray = Ray::new(&profile, 600.0, -0.01);
        assert_abs_diff_eq!(ray.distance_to_ground(0.0).unwrap(), 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(
            ray.distance_to_ground(10_000.0).unwrap(),
            600.0 - 100.0 - 500.0 + CURVATURE * 1e8,
            epsilon = 1e-6
        );
        assert!(ray.distance_to_ground(20_001.0).is_err());
    }

    /// Over flat ground a ray pointing down at `altitude` meets it at
    /// the root of `h + d·tan(altitude) + k·d²`.
    #[test]
    fn test_flat_ground() {
        let cem = flat(0);
        let parameters = PanoramaParameters::new(observer(), 200.0, 0.3, 0.2, 20_000.0, 5, 41).unwrap();
        let panorama = PanoramaComputer::new(&cem).compute_panorama(&parameters).unwrap();

        for y in 0..parameters.height() {
            #[allow(clippy::cast_precision_loss)]
            let altitude = parameters.altitude_for_y(y as f64).unwrap();
            let (a, b, c) = (CURVATURE, altitude.tan(), 200.0);
            let discriminant = b * b - 4.0 * a * c;
            let root = (-b - discriminant.sqrt()) / (2.0 * a);
            for x in 0..parameters.width() {
                let distance = f64::from(panorama.distance_at(x, y).unwrap());
                if altitude < 0.0 && root <= 20_000.0 - 64.0 {
                    assert!(panorama.is_terrain_at(x, y).unwrap());
                    let expected = root / altitude.cos();
                    assert!((distance - expected).abs() <= 4.0 / altitude.cos() + 1e-2);
                    assert_abs_diff_eq!(panorama.elevation_at(x, y).unwrap(), 0.0);
                    assert_abs_diff_eq!(panorama.slope_at(x, y).unwrap(), 0.0);
                } else if altitude >= 0.0 {
                    assert!(!panorama.is_terrain_at(x, y).unwrap());
                }
            }
        }
    }

    #[test]
    fn test_progress_is_reported_per_column() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let cem = flat(0);
        let parameters = PanoramaParameters::new(observer(), 100.0, 2.0, 0.5, 5_000.0, 17, 5).unwrap();
        let columns = AtomicUsize::new(0);
        PanoramaComputer::new(&cem)
            .compute_panorama_with_progress(&parameters, || {
                columns.fetch_add(1, Ordering::Relaxed);
            })
            .unwrap();
        assert_eq!(columns.into_inner(), 17);
    }

    #[test]
    fn test_out_of_extent_is_an_error() {
        let cem = flat(0);
        // Looks west, out of the loaded tile, and never meets the
        // ground before leaving it.
        let parameters = PanoramaParameters::new(observer(), 100.0, 4.71, 0.1, 60_000.0, 3, 3).unwrap();
        let err = PanoramaComputer::new(&cem)
            .compute_panorama(&parameters)
            .unwrap_err();
        assert!(err.is_out_of_bounds());
    }

    #[test]
    fn test_scan_start() {
        #[allow(clippy::unnecessary_wraps)]
        fn above(x: f64) -> Result<f64, TerrainError> {
            Ok(100.0 - x / 100.0)
        }
        assert_eq!(scan_start(above, 0.0).unwrap(), 0.0);
        assert_eq!(scan_start(above, 5_000.0).unwrap(), 5_000.0);
        // Underground at the cursor.
        assert_eq!(scan_start(above, 15_000.0).unwrap(), 0.0);
        // Underground at the observer.
        let below = |x: f64| Ok(x / 100.0 - 10.0);
        assert_eq!(scan_start(below, 5_000.0).unwrap(), 0.0);
    }

    /// An observer buried in a small hill: every row must be scanned
    /// from the observer, giving the same roots as independent scans.
    #[test]
    fn test_underground_observer_rescans_every_row() {
        let center = SAMPLES_PER_ROW / 2;
        let mut samples = Vec::with_capacity(SAMPLES_PER_TILE);
        for row in 0..SAMPLES_PER_ROW {
            for col in 0..SAMPLES_PER_ROW {
                let in_hill = row.abs_diff(center) <= 30 && col.abs_diff(center) <= 40;
                samples.push(if in_hill { 500 } else { 0 });
            }
        }
        let tile = HgtTile::in_mem(Coord { x: 7, y: 46 }, samples).unwrap();
        let cem = ContinuousElevationModel::new(DiscreteElevationModel::from(tile));

        let (elevation, max_distance) = (400.0, 20_000.0);
        let parameters =
            PanoramaParameters::new(observer(), elevation, 0.3, 0.02, max_distance, 3, 31).unwrap();
        let panorama = PanoramaComputer::new(&cem).compute_panorama(&parameters).unwrap();

        for x in 0..parameters.width() {
            #[allow(clippy::cast_precision_loss)]
            let azimuth = parameters.azimuth_for_x(x as f64).unwrap();
            let profile = ElevationProfile::new(&cem, observer(), azimuth, max_distance).unwrap();
            for y in (0..parameters.height()).rev() {
                #[allow(clippy::cast_precision_loss)]
                let altitude = parameters.altitude_for_y(y as f64).unwrap();
                let ray = Ray::new(&profile, elevation, altitude.tan());
                let f = |d| ray.distance_to_ground(d);
                assert!(f(0.0).unwrap() < 0.0);

                let lo = first_interval_containing_root(&f, 0.0, max_distance, COARSE_STEP)
                    .unwrap()
                    .unwrap();
                let hi = (lo + COARSE_STEP).min(max_distance);
                let root = improve_root(&f, lo, hi, ROOT_TOLERANCE).unwrap();
                #[allow(clippy::cast_possible_truncation)]
                let expected = (root / altitude.cos()) as f32;
                assert_eq!(panorama.distance_at(x, y).unwrap(), expected);
            }
        }
    }
}
