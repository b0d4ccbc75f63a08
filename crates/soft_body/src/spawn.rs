use std::ops::RangeInclusive;

use glam::Vec2;
use rand::Rng;

pub const GRID_SIZE_RANGE: RangeInclusive<usize> = 2..=8;
pub const RADIUS_RANGE: RangeInclusive<f32> = 0.3..=1.5;
/// Side length of rigid boxes
pub const RIGID_SIZE_RANGE: RangeInclusive<f32> = 0.1..=1.;
pub const RIGID_RADIUS_RANGE: RangeInclusive<f32> = 0.1..=0.7;
/// Shared by friction and density of rigid bodies
pub const RIGID_MATERIAL_RANGE: RangeInclusive<f32> = 0.1..=1.;

fn clamp_to(value: f32, range: &RangeInclusive<f32>) -> f32 {
    if value.is_nan() {
        *range.start()
    } else {
        value.clamp(*range.start(), *range.end())
    }
}

/// A user request for a new soft body, in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnRequest {
    Rectangle { origin: Vec2, width: usize, height: usize },
    Circle { center: Vec2, radius: f32 },
}

impl SpawnRequest {
    /// Forces the request into sizes the scene can always build.
    pub fn clamped(self) -> Self {
        match self {
            SpawnRequest::Rectangle { origin, width, height } => SpawnRequest::Rectangle {
                origin,
                width: width.clamp(*GRID_SIZE_RANGE.start(), *GRID_SIZE_RANGE.end()),
                height: height.clamp(*GRID_SIZE_RANGE.start(), *GRID_SIZE_RANGE.end()),
            },
            SpawnRequest::Circle { center, radius } => SpawnRequest::Circle {
                center,
                radius: clamp_to(radius, &RADIUS_RANGE),
            },
        }
    }

    pub fn random_rectangle<R: Rng>(at: Vec2, rng: &mut R) -> Self {
        SpawnRequest::Rectangle {
            origin: at,
            width: rng.random_range(2..=5),
            height: rng.random_range(2..=5),
        }
    }

    pub fn random_circle<R: Rng>(at: Vec2, rng: &mut R) -> Self {
        SpawnRequest::Circle {
            center: at,
            radius: rng.random_range(0.4..=1.0),
        }
    }
}

/// A user request for a plain rigid body, in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RigidBodyRequest {
    Rectangle { center: Vec2, size: Vec2, friction: f32, density: f32 },
    Circle { center: Vec2, radius: f32, friction: f32, density: f32 },
}

impl RigidBodyRequest {
    pub fn clamped(self) -> Self {
        match self {
            RigidBodyRequest::Rectangle { center, size, friction, density } => {
                RigidBodyRequest::Rectangle {
                    center,
                    size: Vec2::new(
                        clamp_to(size.x, &RIGID_SIZE_RANGE),
                        clamp_to(size.y, &RIGID_SIZE_RANGE),
                    ),
                    friction: clamp_to(friction, &RIGID_MATERIAL_RANGE),
                    density: clamp_to(density, &RIGID_MATERIAL_RANGE),
                }
            }
            RigidBodyRequest::Circle { center, radius, friction, density } => {
                RigidBodyRequest::Circle {
                    center,
                    radius: clamp_to(radius, &RIGID_RADIUS_RANGE),
                    friction: clamp_to(friction, &RIGID_MATERIAL_RANGE),
                    density: clamp_to(density, &RIGID_MATERIAL_RANGE),
                }
            }
        }
    }

    pub fn random_rectangle<R: Rng>(at: Vec2, rng: &mut R) -> Self {
        RigidBodyRequest::Rectangle {
            center: at,
            size: Vec2::new(
                rng.random_range(RIGID_SIZE_RANGE),
                rng.random_range(RIGID_SIZE_RANGE),
            ),
            friction: rng.random_range(RIGID_MATERIAL_RANGE),
            density: rng.random_range(RIGID_MATERIAL_RANGE),
        }
    }

    pub fn random_circle<R: Rng>(at: Vec2, rng: &mut R) -> Self {
        RigidBodyRequest::Circle {
            center: at,
            radius: rng.random_range(RIGID_RADIUS_RANGE),
            friction: rng.random_range(RIGID_MATERIAL_RANGE),
            density: rng.random_range(RIGID_MATERIAL_RANGE),
        }
    }
}
