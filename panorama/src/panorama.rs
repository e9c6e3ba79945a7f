use crate::{PanoramaError, PanoramaParameters};
use std::mem;

/// Per-pixel terrain data of a computed panorama.
///
/// Pixels through which no terrain is visible keep an infinite
/// distance and zero in every other channel.
#[derive(Debug, Clone)]
pub struct Panorama {
    parameters: PanoramaParameters,

    /// Slant distance from the observer (meters).
    distance: Vec<f32>,

    /// Radians.
    longitude: Vec<f32>,

    /// Radians.
    latitude: Vec<f32>,

    /// Meters.
    elevation: Vec<f32>,

    /// Radians from the horizontal.
    slope: Vec<f32>,
}

macro_rules! channel_getters {
    ($($channel:ident, $at:ident, $at_or:ident;)*) => {
        $(
            pub fn $at(&self, x: usize, y: usize) -> Result<f32, PanoramaError> {
                Ok(self.$channel[self.index(x, y)?])
            }

            /// Like the checked getter, but returns `default` outside
            /// the image.
            pub fn $at_or(&self, x: isize, y: isize, default: f32) -> f32 {
                match (usize::try_from(x), usize::try_from(y)) {
                    (Ok(x), Ok(y)) => self.$at(x, y).unwrap_or(default),
                    _ => default,
                }
            }
        )*
    };
}

impl Panorama {
    pub fn parameters(&self) -> &PanoramaParameters {
        &self.parameters
    }

    channel_getters! {
        distance, distance_at, distance_at_or;
        longitude, longitude_at, longitude_at_or;
        latitude, latitude_at, latitude_at_or;
        elevation, elevation_at, elevation_at_or;
        slope, slope_at, slope_at_or;
    }

    /// True if terrain is visible through pixel `(x, y)`.
    pub fn is_terrain_at(&self, x: usize, y: usize) -> Result<bool, PanoramaError> {
        Ok(self.distance_at(x, y)?.is_finite())
    }

    fn index(&self, x: usize, y: usize) -> Result<usize, PanoramaError> {
        if self.parameters.is_valid_sample_index(x, y) {
            Ok(self.parameters.linear_sample_index(x, y))
        } else {
            Err(PanoramaError::Pixel { x, y })
        }
    }
}

/// Write-once builder for a [`Panorama`].
///
/// Every setter and [`build`](Self::build) fail with
/// [`PanoramaError::AlreadyBuilt`] once the panorama has been built.
#[derive(Debug)]
pub struct PanoramaBuilder {
    parameters: PanoramaParameters,
    distance: Vec<f32>,
    longitude: Vec<f32>,
    latitude: Vec<f32>,
    elevation: Vec<f32>,
    slope: Vec<f32>,
    built: bool,
}

macro_rules! channel_setters {
    ($($channel:ident, $set:ident;)*) => {
        $(
            pub fn $set(&mut self, x: usize, y: usize, value: f32) -> Result<&mut Self, PanoramaError> {
                let i = self.index(x, y)?;
                self.$channel[i] = value;
                Ok(self)
            }
        )*
    };
}

impl PanoramaBuilder {
    pub fn new(parameters: PanoramaParameters) -> Self {
        let len = parameters.width() * parameters.height();
        Self {
            parameters,
            distance: vec![f32::INFINITY; len],
            longitude: vec![0.0; len],
            latitude: vec![0.0; len],
            elevation: vec![0.0; len],
            slope: vec![0.0; len],
            built: false,
        }
    }

    channel_setters! {
        distance, set_distance_at;
        longitude, set_longitude_at;
        latitude, set_latitude_at;
        elevation, set_elevation_at;
        slope, set_slope_at;
    }

    pub fn build(&mut self) -> Result<Panorama, PanoramaError> {
        if self.built {
            return Err(PanoramaError::AlreadyBuilt);
        }
        self.built = true;
        Ok(Panorama {
            parameters: self.parameters.clone(),
            distance: mem::take(&mut self.distance),
            longitude: mem::take(&mut self.longitude),
            latitude: mem::take(&mut self.latitude),
            elevation: mem::take(&mut self.elevation),
            slope: mem::take(&mut self.slope),
        })
    }

    fn index(&self, x: usize, y: usize) -> Result<usize, PanoramaError> {
        if self.built {
            return Err(PanoramaError::AlreadyBuilt);
        }
        if self.parameters.is_valid_sample_index(x, y) {
            Ok(self.parameters.linear_sample_index(x, y))
        } else {
            Err(PanoramaError::Pixel { x, y })
        }
    }
}
