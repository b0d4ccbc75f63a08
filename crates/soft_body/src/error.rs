use std::fmt;

use soft_world::WorldError;

/// Invalid shape dimensions are rejected when a soft body is built, so a
/// body that exists never fails while rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SoftBodyError {
    /// Lattice width or height below one point
    InvalidGridSize { width: usize, height: usize },
    /// Grid meshes need at least two points per side to derive UVs
    InvalidMeshSize { width: usize, height: usize },
    InvalidRadius(f32),
    TooFewSegments(usize),
    /// The fixed simulation increment must be finite and above zero
    InvalidTimeStep(f32),
    /// The physics world rejected a handle or joint while building
    World(WorldError),
}

impl fmt::Display for SoftBodyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoftBodyError::InvalidGridSize { width, height } => {
                write!(f, "invalid lattice size {width}x{height}, both sides need at least 1 point")
            }
            SoftBodyError::InvalidMeshSize { width, height } => {
                write!(f, "invalid mesh size {width}x{height}, both sides need at least 2 points")
            }
            SoftBodyError::InvalidRadius(radius) => {
                write!(f, "invalid radius {radius}, expected a finite value above zero")
            }
            SoftBodyError::TooFewSegments(segments) => {
                write!(f, "ring has {segments} segments, at least 3 are needed")
            }
            SoftBodyError::InvalidTimeStep(time_step) => {
                write!(f, "invalid time step {time_step}, expected a finite value above zero")
            }
            SoftBodyError::World(error) => write!(f, "physics world error: {error}"),
        }
    }
}

impl std::error::Error for SoftBodyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SoftBodyError::World(error) => Some(error),
            _ => None,
        }
    }
}

impl From<WorldError> for SoftBodyError {
    fn from(error: WorldError) -> Self {
        SoftBodyError::World(error)
    }
}
