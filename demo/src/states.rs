use bevy::prelude::*;

/// What a left click does.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum InteractionMode {
    #[default]
    Drag,
    SpawnRectangles,
    SpawnCircles,
    SpawnRigidRectangles,
    SpawnRigidCircles,
}

impl std::fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InteractionMode::Drag => write!(f, "Drag"),
            InteractionMode::SpawnRectangles => write!(f, "Rectangles"),
            InteractionMode::SpawnCircles => write!(f, "Circles"),
            InteractionMode::SpawnRigidRectangles => write!(f, "Rigid boxes"),
            InteractionMode::SpawnRigidCircles => write!(f, "Rigid circles"),
        }
    }
}
