//! Continuous terrain on top of the `dem` crate's discrete samples.
//!
//! Positions are [`GeoPoint`]s in radians. Elevations and distances
//! are in meters.

mod continuous;
mod error;
mod geo_point;
pub mod math;
mod profile;

pub use crate::{
    continuous::ContinuousElevationModel,
    error::TerrainError,
    geo_point::GeoPoint,
    profile::{ElevationProfile, MAX_PROFILE_LENGTH, POSITION_STEP},
};
pub use dem;
pub use geo;
