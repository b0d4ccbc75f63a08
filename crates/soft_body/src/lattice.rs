use std::f32::consts::TAU;

use glam::Vec2;
use soft_world::{
    BodyDef, BodyHandle, BodyType, DistanceJointDef, Fixture, JointHandle, PhysicsWorld, WorldError,
};
use tracing::debug;

use crate::{config::SoftBodyConfig, error::SoftBodyError};

/// A joint of a lattice. `from` is the point whose visit created the joint,
/// both ends are point indices into the owning lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatticeJoint {
    pub handle: JointHandle,
    pub from: usize,
    pub to: usize,
}

fn create_point_mass(
    world: &mut PhysicsWorld,
    position: Vec2,
    config: &SoftBodyConfig,
) -> Result<BodyHandle, SoftBodyError> {
    let def = BodyDef::new(BodyType::Dynamic, position).with_fixed_rotation(true);
    let body = world.create_body(&def);
    world.create_fixture(
        body,
        Fixture::circle(config.point_radius)
            .with_density(config.density)
            .with_friction(config.friction)
            .with_restitution(config.restitution),
    )?;
    Ok(body)
}

/// Springs need a frequency, checked before the first point exists.
fn check_frequency(config: &SoftBodyConfig) -> Result<(), SoftBodyError> {
    let frequency = config.joint_frequency;
    if frequency.is_finite() && frequency > 0. {
        Ok(())
    } else {
        Err(WorldError::InvalidFrequency(frequency).into())
    }
}

fn connect(
    world: &mut PhysicsWorld,
    (from, to): (BodyHandle, BodyHandle),
    frequency: f32,
    damping: f32,
    collide_connected: bool,
) -> Result<JointHandle, SoftBodyError> {
    let anchor_a = world.body_position(from).ok_or(WorldError::UnknownBody)?;
    let anchor_b = world.body_position(to).ok_or(WorldError::UnknownBody)?;
    let def = DistanceJointDef::initialize(from, to, anchor_a, anchor_b)
        .with_frequency(frequency)
        .with_damping(damping)
        .with_collide_connected(collide_connected);
    Ok(world.create_distance_joint(def)?)
}

/// Writes the current position of every point into `out`. A point whose body
/// is gone keeps whatever position `out` already held for it.
fn read_body_positions(world: &PhysicsWorld, points: &[BodyHandle], out: &mut Vec<Vec2>) {
    out.resize(points.len(), Vec2::ZERO);
    for (k, point) in points.iter().enumerate() {
        match world.body_position(*point) {
            Some(position) => out[k] = position,
            None => debug!(point = k, "point mass missing, reusing last position"),
        }
    }
}

fn destroy_points(world: &mut PhysicsWorld, points: &[BodyHandle]) {
    for point in points {
        world.destroy_body(*point);
    }
}

/// Rectangular lattice of point masses. Points are stored column by column,
/// `index(i, j) = i * height + j`.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLattice {
    width: usize,
    height: usize,
    points: Vec<BodyHandle>,
    joints: Vec<LatticeJoint>,
}

impl GridLattice {
    /// Each new point links back to its left, bottom, bottom left and top
    /// left neighbours, which the scan order guarantees already exist.
    pub fn build(
        world: &mut PhysicsWorld,
        origin: Vec2,
        width: usize,
        height: usize,
        spacing: f32,
        config: &SoftBodyConfig,
    ) -> Result<Self, SoftBodyError> {
        if width < 1 || height < 1 {
            return Err(SoftBodyError::InvalidGridSize { width, height });
        }
        check_frequency(config)?;

        let mut lattice = GridLattice {
            width,
            height,
            points: Vec::with_capacity(width * height),
            joints: Vec::new(),
        };
        for i in 0..width {
            for j in 0..height {
                let position = origin + Vec2::new(i as f32, j as f32) * spacing;
                lattice.points.push(create_point_mass(world, position, config)?);
                let from = lattice.index(i, j);

                let neighbours = [
                    (i > 0).then(|| (i - 1, j)),
                    (j > 0).then(|| (i, j - 1)),
                    (i > 0 && j > 0).then(|| (i - 1, j - 1)),
                    (i > 0 && j + 1 < height).then(|| (i - 1, j + 1)),
                ];
                for (ni, nj) in neighbours.into_iter().flatten() {
                    let to = lattice.index(ni, nj);
                    let handle = connect(
                        world,
                        (lattice.points[from], lattice.points[to]),
                        config.joint_frequency,
                        config.joint_damping,
                        config.collide_connected,
                    )?;
                    lattice.joints.push(LatticeJoint { handle, from, to });
                }
            }
        }
        debug!(width, height, joints = lattice.joints.len(), "built grid lattice");
        Ok(lattice)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        i * self.height + j
    }

    pub fn point(&self, i: usize, j: usize) -> BodyHandle {
        self.points[self.index(i, j)]
    }

    pub fn points(&self) -> &[BodyHandle] {
        &self.points
    }

    pub fn joints(&self) -> &[LatticeJoint] {
        &self.joints
    }

    pub fn joints_created_at(&self, i: usize, j: usize) -> usize {
        let index = self.index(i, j);
        self.joints.iter().filter(|joint| joint.from == index).count()
    }

    /// Positions in storage order.
    pub fn read_positions(&self, world: &PhysicsWorld, out: &mut Vec<Vec2>) {
        read_body_positions(world, &self.points, out);
    }

    /// Destroys every point, which takes the joints with it.
    pub fn destroy(&self, world: &mut PhysicsWorld) {
        destroy_points(world, &self.points);
    }
}

/// Closed ring of point masses around a hub. Ring points take indices
/// `0..segments`, the hub is index `segments`.
#[derive(Debug, Clone, PartialEq)]
pub struct RingLattice {
    radius: f32,
    points: Vec<BodyHandle>,
    joints: Vec<LatticeJoint>,
}

impl RingLattice {
    /// Larger circles get finer rings. Never below one segment.
    pub fn segments_for_radius(radius: f32, segments_per_unit: f32) -> usize {
        let segments = (segments_per_unit * radius).floor();
        if segments.is_finite() && segments >= 1. {
            segments as usize
        } else {
            1
        }
    }

    pub fn build(
        world: &mut PhysicsWorld,
        center: Vec2,
        radius: f32,
        segments: usize,
        config: &SoftBodyConfig,
    ) -> Result<Self, SoftBodyError> {
        if !radius.is_finite() || radius <= 0. {
            return Err(SoftBodyError::InvalidRadius(radius));
        }
        if segments < 3 {
            return Err(SoftBodyError::TooFewSegments(segments));
        }
        check_frequency(config)?;

        let mut points = Vec::with_capacity(segments + 1);
        for k in 0..segments {
            let angle = k as f32 * TAU / segments as f32;
            let position = center + Vec2::from_angle(angle) * radius;
            points.push(create_point_mass(world, position, config)?);
        }
        points.push(create_point_mass(world, center, config)?);

        // The ring is cyclic, so joints wait until every point exists
        let hub = segments;
        let mut joints = Vec::with_capacity(2 * segments);
        for from in 0..segments {
            let next = (from + 1) % segments;
            for (to, damping) in [(next, config.joint_damping), (hub, config.hub_damping)] {
                let handle = connect(
                    world,
                    (points[from], points[to]),
                    config.joint_frequency,
                    damping,
                    config.collide_connected,
                )?;
                joints.push(LatticeJoint { handle, from, to });
            }
        }
        debug!(segments, radius, "built ring lattice");
        Ok(RingLattice {
            radius,
            points,
            joints,
        })
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn segments(&self) -> usize {
        self.points.len() - 1
    }

    pub fn ring(&self) -> &[BodyHandle] {
        &self.points[..self.segments()]
    }

    pub fn hub(&self) -> BodyHandle {
        self.points[self.segments()]
    }

    pub fn hub_index(&self) -> usize {
        self.segments()
    }

    pub fn points(&self) -> &[BodyHandle] {
        &self.points
    }

    pub fn joints(&self) -> &[LatticeJoint] {
        &self.joints
    }

    /// Ring positions followed by the hub.
    pub fn read_positions(&self, world: &PhysicsWorld, out: &mut Vec<Vec2>) {
        read_body_positions(world, &self.points, out);
    }

    pub fn destroy(&self, world: &mut PhysicsWorld) {
        destroy_points(world, &self.points);
    }
}
