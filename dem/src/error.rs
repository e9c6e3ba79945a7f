use crate::{Interval1D, Interval2D};
use geo::geometry::Coord;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DemError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("invalid HGT name {0}")]
    HgtName(PathBuf),

    #[error("invalid HGT file len {0} for {1}")]
    HgtLen(u64, PathBuf),

    #[error("expected {expected} samples, got {actual}")]
    SampleCount { expected: usize, actual: usize },

    #[error("invalid interval [{0}..{1}]")]
    Interval(i32, i32),

    #[error("intervals {0} and {1} are not unionable")]
    NotUnionable1D(Interval1D, Interval1D),

    #[error("extents {0} and {1} do not form a single rectangle")]
    NotUnionable(Interval2D, Interval2D),

    #[error("sample ({x}, {y}) out of bounds of {extent}")]
    OutOfBounds { x: i32, y: i32, extent: Interval2D },

    #[error("invalid region {0:?}..={1:?}")]
    Region(Coord<i16>, Coord<i16>),

    #[error("missing tile {0}")]
    MissingTile(PathBuf),
}
