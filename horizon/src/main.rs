mod options;
mod progress;

use anyhow::{Context, Error as AnyError};
use clap::Parser;
use dem::{
    geo::geometry::Coord, load_region, DiscreteElevationModel, TileMode, SAMPLES_PER_RADIAN,
};
use log::info;
use options::{Cli, Command as CliCmd};
use panorama::{Panorama, PanoramaComputer, PanoramaParameters};
use serde::Serialize;
use std::io::Write;
use terrain::{
    math::{azimuth, distance},
    ContinuousElevationModel, GeoPoint,
};
use textplots::{Chart, Plot, Shape};
#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

fn main() -> Result<(), AnyError> {
    env_logger::init();
    let cli = Cli::parse();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    let user_parameters = cli.user_parameters();
    let parameters = user_parameters.panorama_parameters()?;
    info!(
        "{} looking {} ({}°), {}x{} pixels",
        parameters.observer_position(),
        azimuth::to_octant_string(parameters.center_azimuth(), "N", "E", "S", "W")?,
        user_parameters.center_azimuth(),
        parameters.width(),
        parameters.height()
    );

    let mode = if cli.in_mem {
        TileMode::InMem
    } else {
        TileMode::MemMap
    };
    let dem = load_dem(&cli, &parameters, mode)?;
    info!(
        "{} tiles, elevations {}..={} m",
        dem.tile_count(),
        dem.min_elevation(),
        dem.max_elevation()
    );
    let cem = ContinuousElevationModel::new(dem);

    let pb = progress::bar("Computing panorama".to_string(), parameters.width() as u64);
    let panorama =
        PanoramaComputer::new(&cem).compute_panorama_with_progress(&parameters, || pb.inc(1))?;
    pb.finish_and_clear();

    match cli.cmd {
        CliCmd::Display => display(&cem, &panorama),
        CliCmd::Json { pretty } => json(&panorama, pretty),
        CliCmd::Plot { cols, rows } => plot(&panorama, cols, rows),
    }
}

/// Samples needed past a ray's end: the far corner of the bilinear
/// cell, plus one more for its slope.
const EDGE_SAMPLES: f64 = 2.0;

/// South-west and north-east corners of the tiles a ray of length
/// `max_distance` from `observer` can reach.
fn degree_box(observer: GeoPoint, max_distance: f64) -> (Coord<i16>, Coord<i16>) {
    let margin = EDGE_SAMPLES / SAMPLES_PER_RADIAN;
    let d_lat = distance::to_radians(max_distance);
    let d_lon = d_lat / observer.latitude().cos() + margin;
    let d_lat = d_lat + margin;
    #[allow(clippy::cast_possible_truncation)]
    let corner = |lon: f64, lat: f64| Coord {
        x: lon.to_degrees().floor() as i16,
        y: lat.to_degrees().floor() as i16,
    };
    (
        corner(observer.longitude() - d_lon, observer.latitude() - d_lat),
        corner(observer.longitude() + d_lon, observer.latitude() + d_lat),
    )
}

/// Loads every tile a ray of `parameters` can reach.
fn load_dem(
    cli: &Cli,
    parameters: &PanoramaParameters,
    mode: TileMode,
) -> Result<DiscreteElevationModel, AnyError> {
    let (sw, ne) = degree_box(parameters.observer_position(), parameters.max_distance());
    load_region(&cli.tile_dir, sw, ne, mode)
        .with_context(|| format!("loading tiles {sw:?}..={ne:?} from {:?}", cli.tile_dir))
}

/// Visits every pixel through which terrain is visible.
fn terrain_pixels(panorama: &Panorama) -> impl Iterator<Item = (usize, usize)> + '_ {
    let p = panorama.parameters();
    (0..p.height())
        .flat_map(move |y| (0..p.width()).map(move |x| (x, y)))
        .filter(move |&(x, y)| panorama.is_terrain_at(x, y).unwrap_or(false))
}

fn display(cem: &ContinuousElevationModel, panorama: &Panorama) -> Result<(), AnyError> {
    let parameters = panorama.parameters();
    let (width, height) = (parameters.width(), parameters.height());

    let mut visible = 0_usize;
    let mut nearest: Option<(f32, usize, usize)> = None;
    let mut farthest: Option<(f32, usize, usize)> = None;
    for (x, y) in terrain_pixels(panorama) {
        let distance = panorama.distance_at(x, y)?;
        visible += 1;
        if nearest.map_or(true, |(d, ..)| distance < d) {
            nearest = Some((distance, x, y));
        }
        if farthest.map_or(true, |(d, ..)| distance > d) {
            farthest = Some((distance, x, y));
        }
    }

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "observer:  {}", parameters.observer_position())?;
    writeln!(
        stdout,
        "looking:   {} ({:.1}°, {:.1}° wide)",
        azimuth::to_octant_string(parameters.center_azimuth(), "N", "E", "S", "W")?,
        parameters.center_azimuth().to_degrees(),
        parameters.horizontal_field_of_view().to_degrees()
    )?;
    #[allow(clippy::cast_precision_loss)]
    let fraction = visible as f64 / (width * height) as f64;
    writeln!(
        stdout,
        "terrain:   {visible} of {} pixels ({:.1}%)",
        width * height,
        100.0 * fraction
    )?;
    writeln!(
        stdout,
        "loaded:    {} tiles, {} m to {} m",
        cem.dem().tile_count(),
        cem.dem().min_elevation(),
        cem.dem().max_elevation()
    )?;
    for (label, hit) in [("nearest", nearest), ("farthest", farthest)] {
        if let Some((distance, x, y)) = hit {
            let point = GeoPoint::new(
                f64::from(panorama.longitude_at(x, y)?),
                f64::from(panorama.latitude_at(x, y)?),
            )?;
            writeln!(
                stdout,
                "{label:9}  {:.0} m at {point}, {:.0} m high, pixel ({x}, {y})",
                distance,
                panorama.elevation_at(x, y)?
            )?;
        }
    }
    Ok(())
}

fn json(panorama: &Panorama, pretty: bool) -> Result<(), AnyError> {
    #[derive(Serialize)]
    struct JsonEntry {
        pixel: [usize; 2],
        /// Slant distance (meters).
        distance: f32,
        /// Longitude, latitude (degrees).
        location: [f32; 2],
        elevation: f32,
        /// Degrees.
        slope: f32,
    }

    let entries = terrain_pixels(panorama)
        .map(|(x, y)| -> Result<JsonEntry, AnyError> {
            Ok(JsonEntry {
                pixel: [x, y],
                distance: panorama.distance_at(x, y)?,
                location: [
                    panorama.longitude_at(x, y)?.to_degrees(),
                    panorama.latitude_at(x, y)?.to_degrees(),
                ],
                elevation: panorama.elevation_at(x, y)?,
                slope: panorama.slope_at(x, y)?.to_degrees(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let json = if pretty {
        serde_json::to_string_pretty(&entries)?
    } else {
        serde_json::to_string(&entries)?
    };
    println!("{json}");
    Ok(())
}

/// Plots, for every column, the altitude of the highest visible
/// terrain against the azimuth offset from the center.
fn plot(panorama: &Panorama, cols: u32, rows: u32) -> Result<(), AnyError> {
    let parameters = panorama.parameters();
    let half_fov = parameters.horizontal_field_of_view().to_degrees() / 2.0;

    let mut skyline = Vec::with_capacity(parameters.width());
    for x in 0..parameters.width() {
        let top = (0..parameters.height()).find(|&y| panorama.is_terrain_at(x, y).unwrap_or(false));
        if let Some(y) = top {
            #[allow(clippy::cast_precision_loss)]
            let offset = x as f64 * parameters.horizontal_field_of_view().to_degrees()
                / (parameters.width() - 1) as f64
                - half_fov;
            #[allow(clippy::cast_precision_loss)]
            let altitude = parameters.altitude_for_y(y as f64)?.to_degrees();
            #[allow(clippy::cast_possible_truncation)]
            skyline.push((offset as f32, altitude as f32));
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    Chart::new(cols, rows, -half_fov as f32, half_fov as f32)
        .lineplot(&Shape::Lines(&skyline))
        .display();
    Ok(())
}
