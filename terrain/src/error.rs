use dem::DemError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerrainError {
    #[error("{0}")]
    Dem(#[from] DemError),

    #[error("longitude {0} outside [-π, π]")]
    Longitude(f64),

    #[error("latitude {0} outside [-π/2, π/2]")]
    Latitude(f64),

    #[error("azimuth {0} is not canonical")]
    Azimuth(f64),

    #[error("profile length must be in (0, half a great circle], got {0}")]
    Length(f64),

    #[error("position {x} outside profile [0, {length}]")]
    Position { x: f64, length: f64 },

    #[error("no sign change between {0} and {1}")]
    Bracket(f64, f64),
}

impl TerrainError {
    /// True for lookups outside a valid domain, as opposed to invalid
    /// arguments.
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(
            self,
            Self::Dem(dem::DemError::OutOfBounds { .. }) | Self::Position { .. }
        )
    }
}
