//! Discrete elevation models built from 1°×1° HGT tiles.
//!
//! A [`DiscreteElevationModel`] maps integer sample indices `(x, y)`
//! to elevations. Indices are angular positions (longitude for `x`,
//! latitude for `y`) scaled by [`SAMPLES_PER_RADIAN`], so that tiles
//! with different origins share one index space and can be combined
//! with [`DiscreteElevationModel::union`].

mod error;
mod hgt;
mod interval;
mod region;

pub use crate::{
    error::DemError,
    hgt::{HgtTile, TileMode, HGT_FILE_LEN, SAMPLES_PER_ROW, SAMPLES_PER_TILE},
    interval::{Interval1D, Interval2D},
    region::{load_region, tile_file_name},
};
pub use geo;
use std::{f64::consts::PI, path::Path};

/// Number of samples per degree of longitude or latitude.
pub const SAMPLES_PER_DEGREE: i32 = 3600;

/// Number of samples per radian of longitude or latitude.
pub const SAMPLES_PER_RADIAN: f64 = (360 * SAMPLES_PER_DEGREE) as f64 / (2.0 * PI);

/// Returns the (fractional) sample index of `angle`, in radians.
pub fn sample_index(angle: f64) -> f64 {
    angle * SAMPLES_PER_RADIAN
}

/// An elevation model defined exactly over a rectangular extent of
/// sample indices.
pub enum DiscreteElevationModel {
    /// A single tile.
    Tile(HgtTile),

    /// Two models whose extents jointly and exactly cover `extent`.
    Union {
        left: Box<DiscreteElevationModel>,
        right: Box<DiscreteElevationModel>,
        extent: Interval2D,
    },
}

impl DiscreteElevationModel {
    /// Returns a single-tile model backed by the memory-mapped file at
    /// `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DemError> {
        Ok(Self::Tile(HgtTile::memmap(path)?))
    }

    /// Returns a single-tile model read into memory from `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DemError> {
        Ok(Self::Tile(HgtTile::load(path)?))
    }

    /// Returns a single-tile model opened according to `mode`.
    pub fn open<P: AsRef<Path>>(path: P, mode: TileMode) -> Result<Self, DemError> {
        Ok(Self::Tile(HgtTile::open(path, mode)?))
    }

    /// Sample indices for which this model is defined.
    pub fn extent(&self) -> Interval2D {
        match self {
            Self::Tile(tile) => tile.extent(),
            Self::Union { extent, .. } => *extent,
        }
    }

    /// Returns the elevation sample, in meters, at index `(x, y)`.
    pub fn elevation_sample(&self, x: i32, y: i32) -> Result<f64, DemError> {
        match self {
            Self::Tile(tile) => tile.sample(x, y).map(f64::from),
            Self::Union { extent, .. } if !extent.contains(x, y) => Err(DemError::OutOfBounds {
                x,
                y,
                extent: *extent,
            }),
            Self::Union { left, right, .. } => {
                if left.extent().contains(x, y) {
                    left.elevation_sample(x, y)
                } else {
                    right.elevation_sample(x, y)
                }
            }
        }
    }

    /// Combines `self` and `that` into a single model.
    ///
    /// Fails unless the two extents together form a single rectangle.
    pub fn union(self, that: Self) -> Result<Self, DemError> {
        let (a, b) = (self.extent(), that.extent());
        if !a.tiles_exactly_with(&b) {
            return Err(DemError::NotUnionable(a, b));
        }
        Ok(Self::Union {
            left: Box::new(self),
            right: Box::new(that),
            extent: a.union(&b)?,
        })
    }

    /// Lowest elevation sample, in meters, over the whole extent.
    pub fn min_elevation(&self) -> i16 {
        match self {
            Self::Tile(tile) => tile.min_elevation(),
            Self::Union { left, right, .. } => left.min_elevation().min(right.min_elevation()),
        }
    }

    /// Highest elevation sample, in meters, over the whole extent.
    pub fn max_elevation(&self) -> i16 {
        match self {
            Self::Tile(tile) => tile.max_elevation(),
            Self::Union { left, right, .. } => left.max_elevation().max(right.max_elevation()),
        }
    }

    /// Number of tiles backing this model.
    pub fn tile_count(&self) -> usize {
        match self {
            Self::Tile(_) => 1,
            Self::Union { left, right, .. } => left.tile_count() + right.tile_count(),
        }
    }
}

impl From<HgtTile> for DiscreteElevationModel {
    fn from(tile: HgtTile) -> Self {
        Self::Tile(tile)
    }
}
