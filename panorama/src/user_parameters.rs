//! Panorama parameters as a person enters them: whole numbers in
//! friendly units, silently brought into range.

use crate::{PanoramaError, PanoramaParameters};
use std::{fmt, str::FromStr};
use terrain::GeoPoint;

/// Largest vertical field of view (degrees) a panorama may span.
const MAX_VERTICAL_FIELD_OF_VIEW: i32 = 170;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserParameter {
    /// Ten-thousandths of a degree.
    ObserverLongitude,
    /// Ten-thousandths of a degree.
    ObserverLatitude,
    /// Meters.
    ObserverElevation,
    /// Degrees.
    CenterAzimuth,
    /// Degrees.
    HorizontalFieldOfView,
    /// Kilometers.
    MaxDistance,
    /// Pixels.
    Width,
    /// Pixels.
    Height,
    /// Computed images are `2^n` times larger than displayed ones on
    /// each axis.
    SuperSamplingExponent,
}

impl UserParameter {
    pub const ALL: [Self; 9] = [
        Self::ObserverLongitude,
        Self::ObserverLatitude,
        Self::ObserverElevation,
        Self::CenterAzimuth,
        Self::HorizontalFieldOfView,
        Self::MaxDistance,
        Self::Width,
        Self::Height,
        Self::SuperSamplingExponent,
    ];

    /// Inclusive range of accepted values.
    pub fn range(self) -> (i32, i32) {
        match self {
            Self::ObserverLongitude => (60_000, 120_000),
            Self::ObserverLatitude => (450_000, 480_000),
            Self::ObserverElevation => (300, 10_000),
            Self::CenterAzimuth => (0, 359),
            Self::HorizontalFieldOfView => (1, 360),
            Self::MaxDistance => (10, 600),
            Self::Width => (30, 16_000),
            Self::Height => (10, 4_000),
            Self::SuperSamplingExponent => (0, 2),
        }
    }

    /// Clamps `value` into [`range`](Self::range).
    pub fn sanitize(self, value: i32) -> i32 {
        let (min, max) = self.range();
        value.clamp(min, max)
    }
}

/// A sanitized set of [`UserParameter`] values.
///
/// The height is further capped so the vertical field of view does
/// not exceed 170°.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PanoramaUserParameters {
    values: [i32; 9],
}

impl PanoramaUserParameters {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        observer_longitude: i32,
        observer_latitude: i32,
        observer_elevation: i32,
        center_azimuth: i32,
        horizontal_field_of_view: i32,
        max_distance: i32,
        width: i32,
        height: i32,
        super_sampling_exponent: i32,
    ) -> Self {
        let mut values = [
            observer_longitude,
            observer_latitude,
            observer_elevation,
            center_azimuth,
            horizontal_field_of_view,
            max_distance,
            width,
            height,
            super_sampling_exponent,
        ];
        for (value, parameter) in values.iter_mut().zip(UserParameter::ALL) {
            *value = parameter.sanitize(*value);
        }
        let mut parameters = Self { values };
        let max_height = MAX_VERTICAL_FIELD_OF_VIEW * (parameters.width() - 1)
            / parameters.horizontal_field_of_view()
            + 1;
        parameters.values[UserParameter::Height as usize] = parameters.height().min(max_height);
        parameters
    }

    pub fn get(&self, parameter: UserParameter) -> i32 {
        self.values[parameter as usize]
    }

    /// Copy with `parameter` set to `value`, sanitized again as a
    /// whole.
    #[must_use]
    pub fn with(&self, parameter: UserParameter, value: i32) -> Self {
        let mut values = self.values;
        values[parameter as usize] = value;
        let [a, b, c, d, e, f, g, h, i] = values;
        Self::new(a, b, c, d, e, f, g, h, i)
    }

    pub fn observer_longitude(&self) -> i32 {
        self.get(UserParameter::ObserverLongitude)
    }

    pub fn observer_latitude(&self) -> i32 {
        self.get(UserParameter::ObserverLatitude)
    }

    pub fn observer_elevation(&self) -> i32 {
        self.get(UserParameter::ObserverElevation)
    }

    pub fn center_azimuth(&self) -> i32 {
        self.get(UserParameter::CenterAzimuth)
    }

    pub fn horizontal_field_of_view(&self) -> i32 {
        self.get(UserParameter::HorizontalFieldOfView)
    }

    pub fn max_distance(&self) -> i32 {
        self.get(UserParameter::MaxDistance)
    }

    pub fn width(&self) -> i32 {
        self.get(UserParameter::Width)
    }

    pub fn height(&self) -> i32 {
        self.get(UserParameter::Height)
    }

    pub fn super_sampling_exponent(&self) -> i32 {
        self.get(UserParameter::SuperSamplingExponent)
    }

    pub fn observer_position(&self) -> Result<GeoPoint, PanoramaError> {
        Ok(GeoPoint::from_degrees(
            f64::from(self.observer_longitude()) / 10_000.0,
            f64::from(self.observer_latitude()) / 10_000.0,
        )?)
    }

    /// Parameters of the panorama to compute, super-sampled.
    pub fn panorama_parameters(&self) -> Result<PanoramaParameters, PanoramaError> {
        self.scaled_parameters(1 << self.super_sampling_exponent())
    }

    /// Parameters of the panorama as displayed.
    pub fn panorama_display_parameters(&self) -> Result<PanoramaParameters, PanoramaError> {
        self.scaled_parameters(1)
    }

    #[allow(clippy::cast_sign_loss)]
    fn scaled_parameters(&self, scale: i32) -> Result<PanoramaParameters, PanoramaError> {
        PanoramaParameters::new(
            self.observer_position()?,
            f64::from(self.observer_elevation()),
            f64::from(self.center_azimuth()).to_radians(),
            f64::from(self.horizontal_field_of_view()).to_radians(),
            f64::from(self.max_distance()) * 1_000.0,
            (self.width() * scale) as usize,
            (self.height() * scale) as usize,
        )
    }
}

/// Well-known viewpoints of western Switzerland.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Niesen,
    AlpesJura,
    MontRacine,
    Finsteraarhorn,
    TourDeSauvabelin,
    PlageDuPelican,
}

impl Preset {
    pub const ALL: [Self; 6] = [
        Self::Niesen,
        Self::AlpesJura,
        Self::MontRacine,
        Self::Finsteraarhorn,
        Self::TourDeSauvabelin,
        Self::PlageDuPelican,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Niesen => "niesen",
            Self::AlpesJura => "alpes-jura",
            Self::MontRacine => "mont-racine",
            Self::Finsteraarhorn => "finsteraarhorn",
            Self::TourDeSauvabelin => "tour-de-sauvabelin",
            Self::PlageDuPelican => "plage-du-pelican",
        }
    }

    pub fn parameters(self) -> PanoramaUserParameters {
        // Longitude and latitude in 1/10000°.
        let (longitude, latitude, elevation, azimuth, fov) = match self {
            Self::Niesen => (76_500, 467_300, 600, 180, 110),
            Self::AlpesJura => (68_087, 470_085, 1380, 162, 27),
            Self::MontRacine => (68_200, 470_200, 1500, 135, 45),
            Self::Finsteraarhorn => (81_260, 465_374, 4300, 205, 20),
            Self::TourDeSauvabelin => (66_385, 465_353, 700, 135, 100),
            Self::PlageDuPelican => (65_728, 465_132, 380, 135, 60),
        };
        PanoramaUserParameters::new(longitude, latitude, elevation, azimuth, fov, 300, 2500, 800, 0)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name() == s)
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|p| p.name()).collect();
                format!("unknown preset {s}, expected one of {}", names.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::{PanoramaUserParameters, Preset, UserParameter};
    use approx::assert_relative_eq;

    #[test]
    fn test_sanitize() {
        assert_eq!(UserParameter::ObserverLongitude.sanitize(0), 60_000);
        assert_eq!(UserParameter::ObserverLatitude.sanitize(500_000), 480_000);
        assert_eq!(UserParameter::CenterAzimuth.sanitize(360), 359);
        assert_eq!(UserParameter::Width.sanitize(2500), 2500);
        assert_eq!(UserParameter::SuperSamplingExponent.sanitize(-1), 0);
    }

    #[test]
    fn test_new_sanitizes_every_value() {
        let p = PanoramaUserParameters::new(0, 0, 0, -5, 0, 0, 0, 0, 7);
        assert_eq!(p.observer_longitude(), 60_000);
        assert_eq!(p.observer_latitude(), 450_000);
        assert_eq!(p.observer_elevation(), 300);
        assert_eq!(p.center_azimuth(), 0);
        assert_eq!(p.horizontal_field_of_view(), 1);
        assert_eq!(p.max_distance(), 10);
        assert_eq!(p.width(), 30);
        assert_eq!(p.height(), 10);
        assert_eq!(p.super_sampling_exponent(), 2);
    }

    #[test]
    fn test_height_is_capped() {
        // 170 * 999 / 360 + 1
        let p = Preset::Niesen
            .parameters()
            .with(UserParameter::Width, 1000)
            .with(UserParameter::HorizontalFieldOfView, 360);
        assert_eq!(p.height(), 472);
        assert_eq!(Preset::Niesen.parameters().height(), 800);

        let vfov = p.panorama_display_parameters().unwrap().vertical_field_of_view();
        assert!(vfov.to_degrees() <= 170.0);
    }

    #[test]
    fn test_panorama_parameters() {
        let p = Preset::AlpesJura
            .parameters()
            .with(UserParameter::SuperSamplingExponent, 1);
        let display = p.panorama_display_parameters().unwrap();
        assert_eq!((display.width(), display.height()), (2500, 800));
        assert_relative_eq!(display.observer_position().longitude(), 6.8087_f64.to_radians());
        assert_relative_eq!(display.observer_position().latitude(), 47.0085_f64.to_radians());
        assert_relative_eq!(display.observer_elevation(), 1380.0);
        assert_relative_eq!(display.center_azimuth(), 162_f64.to_radians());
        assert_relative_eq!(display.horizontal_field_of_view(), 27_f64.to_radians());
        assert_relative_eq!(display.max_distance(), 300_000.0);

        let computed = p.panorama_parameters().unwrap();
        assert_eq!((computed.width(), computed.height()), (5000, 1600));
        assert_eq!(computed.observer_position(), display.observer_position());
    }

    #[test]
    fn test_presets() {
        for preset in Preset::ALL {
            assert_eq!(preset.to_string().parse::<Preset>().unwrap(), preset);
            let p = preset.parameters();
            assert_eq!((p.max_distance(), p.width(), p.height()), (300, 2500, 800));
            assert!(p.panorama_parameters().is_ok());
        }
        assert_eq!(Preset::Finsteraarhorn.parameters().observer_elevation(), 4300);
        assert!("matterhorn".parse::<Preset>().is_err());
    }
}
