use anyhow::{anyhow, Error as AnyError};
use clap::{Parser, Subcommand};
use panorama::{PanoramaUserParameters, Preset, UserParameter};
use std::{path::PathBuf, str::FromStr};

/// Compute the terrain panorama seen from a point, using SRTM tiles.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory containing SRTM hgt tiles.
    #[arg(short, long)]
    pub tile_dir: PathBuf,

    /// Start from a well-known viewpoint; other options override its
    /// values.
    #[arg(short, long, default_value_t = Preset::Niesen)]
    pub preset: Preset,

    /// Observer "lat,lon" in degrees.
    #[arg(long)]
    pub observer: Option<LatLon>,

    /// Observer elevation (meters).
    #[arg(short, long)]
    pub elevation: Option<i32>,

    /// Azimuth of the panorama's center (degrees clockwise from
    /// north).
    #[arg(short, long)]
    pub azimuth: Option<i32>,

    /// Horizontal field of view (degrees).
    #[arg(short, long)]
    pub fov: Option<i32>,

    /// Maximum terrain distance (kilometers).
    #[arg(short, long)]
    pub max_distance: Option<i32>,

    /// Image width (pixels).
    #[arg(long)]
    pub width: Option<i32>,

    /// Image height (pixels).
    #[arg(long)]
    pub height: Option<i32>,

    /// Compute 2^n times as many pixels on each axis.
    #[arg(short, long)]
    pub supersampling: Option<i32>,

    /// Number of worker threads. Defaults to one per core.
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Read tiles into memory instead of mapping them.
    #[arg(long)]
    pub in_mem: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

impl Cli {
    /// The preset's parameters with every given option applied, all
    /// clamped into their valid ranges.
    pub fn user_parameters(&self) -> PanoramaUserParameters {
        let mut parameters = self.preset.parameters();
        if let Some(LatLon { lat, lon }) = self.observer {
            #[allow(clippy::cast_possible_truncation)]
            {
                parameters = parameters
                    .with(UserParameter::ObserverLongitude, (lon * 10_000.0).round() as i32)
                    .with(UserParameter::ObserverLatitude, (lat * 10_000.0).round() as i32);
            }
        }
        for (parameter, value) in [
            (UserParameter::ObserverElevation, self.elevation),
            (UserParameter::CenterAzimuth, self.azimuth),
            (UserParameter::HorizontalFieldOfView, self.fov),
            (UserParameter::MaxDistance, self.max_distance),
            (UserParameter::Width, self.width),
            (UserParameter::Height, self.height),
            (UserParameter::SuperSamplingExponent, self.supersampling),
        ] {
            if let Some(value) = value {
                parameters = parameters.with(parameter, value);
            }
        }
        parameters
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl FromStr for LatLon {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, AnyError> {
        let (lat_str, lon_str) = s
            .split_once(',')
            .ok_or_else(|| anyhow!("not a valid lat,lon pair"))?;
        let lat = f64::from_str(lat_str.trim())?;
        let lon = f64::from_str(lon_str.trim())?;
        Ok(Self { lat, lon })
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a summary of the panorama.
    Display,

    /// Print every pixel that sees terrain as JSON.
    Json {
        /// Indent the output.
        #[arg(long)]
        pretty: bool,
    },

    /// Plot the skyline in the terminal.
    Plot {
        /// Plot width (terminal dots).
        #[arg(long, default_value_t = 200)]
        cols: u32,

        /// Plot height (terminal dots).
        #[arg(long, default_value_t = 60)]
        rows: u32,
    },
}
