use crate::PanoramaError;
use std::f64::consts::TAU;
use terrain::{
    math::{angular_distance, azimuth},
    GeoPoint, MAX_PROFILE_LENGTH,
};

/// Slack allowed on the field-of-view checks of the inverse
/// projections, so that round trips through the image edges succeed.
const EPSILON: f64 = 1e-9;

/// Where a panorama is seen from and how it is projected onto
/// pixels.
///
/// Pixels are square: both axes share the angular step
/// `horizontal_field_of_view / (width - 1)`. Column 0 is the left
/// edge, row 0 the top edge.
#[derive(Debug, Clone, PartialEq)]
pub struct PanoramaParameters {
    observer_position: GeoPoint,

    /// Observer elevation (meters).
    observer_elevation: f64,

    /// Canonical azimuth of the image's vertical center line.
    center_azimuth: f64,

    /// In `(0, 2π]`.
    horizontal_field_of_view: f64,

    /// Maximum terrain distance (meters).
    max_distance: f64,

    width: usize,

    height: usize,
}

impl PanoramaParameters {
    pub fn new(
        observer_position: GeoPoint,
        observer_elevation: f64,
        center_azimuth: f64,
        horizontal_field_of_view: f64,
        max_distance: f64,
        width: usize,
        height: usize,
    ) -> Result<Self, PanoramaError> {
        let check = |ok: bool, name: &'static str, value: f64| {
            if ok {
                Ok(())
            } else {
                Err(PanoramaError::Argument { name, value })
            }
        };
        check(
            observer_elevation.is_finite(),
            "observer elevation",
            observer_elevation,
        )?;
        check(
            azimuth::is_canonical(center_azimuth),
            "center azimuth",
            center_azimuth,
        )?;
        check(
            horizontal_field_of_view > 0.0 && horizontal_field_of_view <= TAU,
            "horizontal field of view",
            horizontal_field_of_view,
        )?;
        check(
            max_distance > 0.0 && max_distance <= MAX_PROFILE_LENGTH,
            "max distance",
            max_distance,
        )?;
        #[allow(clippy::cast_precision_loss)]
        {
            check(width >= 2, "width", width as f64)?;
            check(height >= 1, "height", height as f64)?;
        }
        Ok(Self {
            observer_position,
            observer_elevation,
            center_azimuth,
            horizontal_field_of_view,
            max_distance,
            width,
            height,
        })
    }

    pub fn builder() -> PanoramaParametersBuilder {
        PanoramaParametersBuilder::default()
    }

    pub fn observer_position(&self) -> GeoPoint {
        self.observer_position
    }

    pub fn observer_elevation(&self) -> f64 {
        self.observer_elevation
    }

    pub fn center_azimuth(&self) -> f64 {
        self.center_azimuth
    }

    pub fn horizontal_field_of_view(&self) -> f64 {
        self.horizontal_field_of_view
    }

    pub fn vertical_field_of_view(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let rows = (self.height - 1) as f64;
        self.delta() * rows
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Azimuth seen through column `x`, in `[0, 2π)`.
    pub fn azimuth_for_x(&self, x: f64) -> Result<f64, PanoramaError> {
        if !(0.0..=self.max_x()).contains(&x) {
            return Err(PanoramaError::Column(x));
        }
        Ok(azimuth::canonicalize(
            self.center_azimuth + (x - self.center_x()) * self.delta(),
        ))
    }

    /// Column through which azimuth `a` is seen.
    ///
    /// With a full circle of view the image's left and right edges
    /// look in the same direction, which maps to column 0.
    pub fn x_for_azimuth(&self, a: f64) -> Result<f64, PanoramaError> {
        if !azimuth::is_canonical(a) {
            return Err(PanoramaError::Argument {
                name: "azimuth",
                value: a,
            });
        }
        let offset = angular_distance(self.center_azimuth, a);
        if 2.0 * offset.abs() > self.horizontal_field_of_view + EPSILON {
            return Err(PanoramaError::OutOfView(a));
        }
        Ok((self.center_x() + offset / self.delta()).clamp(0.0, self.max_x()))
    }

    /// Altitude seen through row `y`: positive above the horizon.
    pub fn altitude_for_y(&self, y: f64) -> Result<f64, PanoramaError> {
        if !(0.0..=self.max_y()).contains(&y) {
            return Err(PanoramaError::Row(y));
        }
        Ok((self.center_y() - y) * self.delta())
    }

    /// Row through which altitude `a` is seen.
    pub fn y_for_altitude(&self, a: f64) -> Result<f64, PanoramaError> {
        if a.is_nan() || 2.0 * a.abs() > self.vertical_field_of_view() + EPSILON {
            return Err(PanoramaError::OutOfView(a));
        }
        Ok((self.center_y() - a / self.delta()).clamp(0.0, self.max_y()))
    }

    pub fn is_valid_sample_index(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Row-major index of pixel `(x, y)`.
    pub fn linear_sample_index(&self, x: usize, y: usize) -> usize {
        x + y * self.width
    }
}

/// Private API
impl PanoramaParameters {
    /// Angle between adjacent pixel centers.
    fn delta(&self) -> f64 {
        self.horizontal_field_of_view / self.max_x()
    }

    #[allow(clippy::cast_precision_loss)]
    fn max_x(&self) -> f64 {
        (self.width - 1) as f64
    }

    #[allow(clippy::cast_precision_loss)]
    fn max_y(&self) -> f64 {
        (self.height - 1) as f64
    }

    fn center_x(&self) -> f64 {
        self.max_x() / 2.0
    }

    fn center_y(&self) -> f64 {
        self.max_y() / 2.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct PanoramaParametersBuilder {
    observer_position: Option<GeoPoint>,

    observer_elevation: Option<f64>,

    center_azimuth: Option<f64>,

    horizontal_field_of_view: Option<f64>,

    max_distance: Option<f64>,

    width: Option<usize>,

    height: Option<usize>,
}

impl PanoramaParametersBuilder {
    pub fn observer_position(mut self, position: GeoPoint) -> Self {
        self.observer_position = Some(position);
        self
    }

    /// Observer elevation (meters).
    pub fn observer_elevation(mut self, meters: f64) -> Self {
        self.observer_elevation = Some(meters);
        self
    }

    pub fn center_azimuth(mut self, radians: f64) -> Self {
        self.center_azimuth = Some(radians);
        self
    }

    pub fn horizontal_field_of_view(mut self, radians: f64) -> Self {
        self.horizontal_field_of_view = Some(radians);
        self
    }

    /// Maximum terrain distance (meters).
    pub fn max_distance(mut self, meters: f64) -> Self {
        self.max_distance = Some(meters);
        self
    }

    pub fn width(mut self, pixels: usize) -> Self {
        self.width = Some(pixels);
        self
    }

    pub fn height(mut self, pixels: usize) -> Self {
        self.height = Some(pixels);
        self
    }

    pub fn build(&self) -> Result<PanoramaParameters, PanoramaError> {
        PanoramaParameters::new(
            self.observer_position
                .ok_or(PanoramaError::Builder("observer_position"))?,
            self.observer_elevation
                .ok_or(PanoramaError::Builder("observer_elevation"))?,
            self.center_azimuth
                .ok_or(PanoramaError::Builder("center_azimuth"))?,
            self.horizontal_field_of_view
                .ok_or(PanoramaError::Builder("horizontal_field_of_view"))?,
            self.max_distance
                .ok_or(PanoramaError::Builder("max_distance"))?,
            self.width.ok_or(PanoramaError::Builder("width"))?,
            self.height.ok_or(PanoramaError::Builder("height"))?,
        )
    }
}
