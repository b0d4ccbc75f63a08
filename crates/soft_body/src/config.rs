use glam::Vec2;

use crate::stepper::{DEFAULT_MAX_FRAME_TIME, DEFAULT_TIME_STEP};

/// Material and spring tunables shared by every point mass of a soft body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftBodyConfig {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
    /// Radius of each point mass circle, in meters
    pub point_radius: f32,
    /// Spring stiffness in Hertz
    pub joint_frequency: f32,
    pub joint_damping: f32,
    /// Damping of the ring to hub joints of circles. Softer than the ring itself
    pub hub_damping: f32,
    /// Distance between neighbouring grid points, in meters
    pub grid_spacing: f32,
    /// Ring segments per meter of circle radius
    pub segments_per_unit: f32,
    pub collide_connected: bool,
}

impl Default for SoftBodyConfig {
    fn default() -> Self {
        SoftBodyConfig {
            restitution: 0.05,
            friction: 1.0,
            density: 0.1,
            point_radius: 0.15,
            joint_frequency: 10.,
            joint_damping: 0.1,
            hub_damping: 0.5,
            grid_spacing: 0.3,
            segments_per_unit: 20.,
            collide_connected: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConfig {
    pub gravity: Vec2,
    pub velocity_iterations: usize,
    pub position_iterations: usize,
    /// Fixed simulation increment in seconds
    pub time_step: f32,
    /// Longest frame the stepper will catch up on
    pub max_frame_time: f32,
    /// Half size of the box used to pick a body under the cursor
    pub pick_half_extent: f32,
    pub mouse_max_force: f32,
    pub soft_body: SoftBodyConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            gravity: Vec2::new(0., -9.8),
            velocity_iterations: 6,
            position_iterations: 2,
            time_step: DEFAULT_TIME_STEP,
            max_frame_time: DEFAULT_MAX_FRAME_TIME,
            pick_half_extent: 0.2,
            mouse_max_force: 500.,
            soft_body: SoftBodyConfig::default(),
        }
    }
}
