use orbis_mesh::BuildError;

/// Rejected relief parameters or input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReliefError {
    #[error("water level {0} is outside [0, 1)")]
    InvalidWaterLevel(f32),

    #[error("land height {0} must be a finite value of at least {min}", min = crate::relief::MIN_LAND_ELEVATION)]
    InvalidLandHeight(f32),

    #[error("cannot generate relief on an empty vertex store")]
    NoVertices,
}

/// Anything that can stop a terrain from being produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TerrainError {
    #[error("mesh build failed: {0}")]
    Build(#[from] BuildError),

    #[error("relief generation failed: {0}")]
    Relief(#[from] ReliefError),
}
