use terrain::TerrainError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PanoramaError {
    #[error("{0}")]
    Terrain(#[from] TerrainError),

    #[error("missing builder field {0}")]
    Builder(&'static str),

    #[error("invalid {name}: {value}")]
    Argument { name: &'static str, value: f64 },

    #[error("pixel ({x}, {y}) out of bounds")]
    Pixel { x: usize, y: usize },

    #[error("column {0} outside the image")]
    Column(f64),

    #[error("row {0} outside the image")]
    Row(f64),

    #[error("angle {0} outside the field of view")]
    OutOfView(f64),

    #[error("panorama already built")]
    AlreadyBuilt,
}

impl PanoramaError {
    /// True for lookups outside a valid domain, as opposed to invalid
    /// arguments.
    pub fn is_out_of_bounds(&self) -> bool {
        match self {
            Self::Pixel { .. } | Self::Column(_) | Self::Row(_) | Self::OutOfView(_) => true,
            Self::Terrain(e) => e.is_out_of_bounds(),
            _ => false,
        }
    }
}
