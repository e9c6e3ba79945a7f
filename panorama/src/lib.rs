//! Terrain panoramas.
//!
//! A [`PanoramaComputer`] casts one ray per pixel of a
//! [`PanoramaParameters`] projection over a
//! [`ContinuousElevationModel`](terrain::ContinuousElevationModel) and
//! records, in a [`Panorama`], the first terrain each ray meets.

mod computer;
mod error;
#[allow(clippy::module_inception)]
mod panorama;
mod parameters;
pub mod user_parameters;

pub use crate::{
    computer::{PanoramaComputer, Ray, COARSE_STEP, REFRACTION_COEFFICIENT, ROOT_TOLERANCE},
    error::PanoramaError,
    panorama::{Panorama, PanoramaBuilder},
    parameters::{PanoramaParameters, PanoramaParametersBuilder},
    user_parameters::{PanoramaUserParameters, Preset, UserParameter},
};
pub use terrain;
