use glam::Vec2;
use soft_world::{
    BodyDef, BodyHandle, BodyType, Fixture, JointHandle, MouseJointDef, PhysicsWorld,
};
use tracing::{debug, info, trace, warn};

use crate::{
    config::SceneConfig,
    error::SoftBodyError,
    soft_body::{MeshBackend, SoftBody},
    spawn::{RigidBodyRequest, SpawnRequest},
    stepper::FixedStepper,
};

/// The physics world and every soft and rigid body living in it.
pub struct Scene<M> {
    config: SceneConfig,
    world: PhysicsWorld,
    stepper: FixedStepper,
    bodies: Vec<SoftBody<M>>,
    rigid_bodies: Vec<BodyHandle>,
    walls: Vec<BodyHandle>,
    /// Static anchor for mouse joints
    ground: Option<BodyHandle>,
    drag: Option<JointHandle>,
}

impl<M> Scene<M> {
    pub fn new(config: SceneConfig) -> Result<Self, SoftBodyError> {
        Ok(Scene {
            config,
            world: PhysicsWorld::new(config.gravity),
            stepper: FixedStepper::new(config.time_step, config.max_frame_time)?,
            bodies: Vec::new(),
            rigid_bodies: Vec::new(),
            walls: Vec::new(),
            ground: None,
            drag: None,
        })
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn bodies(&self) -> &[SoftBody<M>] {
        &self.bodies
    }

    /// Rigid bodies in spawn order. Platforms are not included.
    pub fn rigid_bodies(&self) -> &[BodyHandle] {
        &self.rigid_bodies
    }

    pub fn walls(&self) -> &[BodyHandle] {
        &self.walls
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Static box of `size` centered on `center`. Platforms survive resets.
    pub fn create_platform(
        &mut self,
        center: Vec2,
        size: Vec2,
    ) -> Result<BodyHandle, SoftBodyError> {
        let platform = self
            .world
            .create_body(&BodyDef::new(BodyType::Static, center));
        self.world
            .create_fixture(platform, Fixture::cuboid(size / 2.).with_density(0.))?;
        debug!(?center, ?size, "created platform");
        Ok(platform)
    }

    /// Walls around `[0, width] x [0, height]`, ordered left, right, top,
    /// bottom. The bottom wall becomes the ground.
    pub fn create_bounds(
        &mut self,
        width: f32,
        height: f32,
        wall_thickness: f32,
    ) -> Result<(), SoftBodyError> {
        let half = wall_thickness / 2.;
        let upright = Vec2::new(wall_thickness, height + 2. * wall_thickness);
        let flat = Vec2::new(width + 2. * wall_thickness, wall_thickness);
        let walls = [
            (Vec2::new(-half, height / 2.), upright),
            (Vec2::new(width + half, height / 2.), upright),
            (Vec2::new(width / 2., height + half), flat),
            (Vec2::new(width / 2., -half), flat),
        ];
        for (center, size) in walls {
            let wall = self.create_platform(center, size)?;
            self.walls.push(wall);
        }
        self.ground = self.walls.last().copied();
        info!(width, height, "created scene bounds");
        Ok(())
    }

    fn ground(&mut self) -> BodyHandle {
        match self.ground {
            Some(ground) => ground,
            None => {
                let ground = self
                    .world
                    .create_body(&BodyDef::new(BodyType::Static, Vec2::ZERO));
                self.ground = Some(ground);
                ground
            }
        }
    }

    /// Advances the world by one frame worth of fixed steps.
    pub fn update(&mut self, frame_time: f32) -> usize {
        let world = &mut self.world;
        let (velocity_iterations, position_iterations) =
            (self.config.velocity_iterations, self.config.position_iterations);
        let steps = self.stepper.advance(frame_time, |dt| {
            world.step(dt, velocity_iterations, position_iterations)
        });
        trace!(frame_time, steps, alpha = self.stepper.alpha(), "advanced scene");
        steps
    }

    /// Builds the clamped request. Returns the new body's index, or `None`
    /// when it could not be built.
    pub fn spawn(&mut self, request: SpawnRequest) -> Option<usize> {
        let request = request.clamped();
        let config = self.config.soft_body;
        let body = match request {
            SpawnRequest::Rectangle { origin, width, height } => {
                SoftBody::rectangle(&mut self.world, &config, origin, width, height)
            }
            SpawnRequest::Circle { center, radius } => {
                SoftBody::circle(&mut self.world, &config, center, radius)
            }
        };
        match body {
            Ok(body) => {
                self.bodies.push(body);
                info!(?request, bodies = self.bodies.len(), "spawned soft body");
                Some(self.bodies.len() - 1)
            }
            Err(error) => {
                warn!(?request, %error, "dropped spawn request");
                None
            }
        }
    }

    /// Builds the clamped request as a single free rotating body.
    pub fn spawn_rigid(&mut self, request: RigidBodyRequest) -> Option<BodyHandle> {
        let request = request.clamped();
        let (center, fixture) = match request {
            RigidBodyRequest::Rectangle { center, size, friction, density } => (
                center,
                Fixture::cuboid(size / 2.)
                    .with_friction(friction)
                    .with_density(density),
            ),
            RigidBodyRequest::Circle { center, radius, friction, density } => (
                center,
                Fixture::circle(radius)
                    .with_friction(friction)
                    .with_density(density),
            ),
        };
        let body = self
            .world
            .create_body(&BodyDef::new(BodyType::Dynamic, center));
        if let Err(error) = self.world.create_fixture(body, fixture) {
            warn!(?request, %error, "dropped rigid body request");
            self.world.destroy_body(body);
            return None;
        }
        self.rigid_bodies.push(body);
        info!(?request, rigid_bodies = self.rigid_bodies.len(), "spawned rigid body");
        Some(body)
    }

    /// Grabs the dynamic body closest to `point` within the pick box.
    pub fn begin_drag(&mut self, point: Vec2) -> bool {
        self.end_drag();
        let half = Vec2::splat(self.config.pick_half_extent);
        let candidates = self.world.query_aabb(point - half, point + half);
        let Some(body) = candidates
            .into_iter()
            .filter_map(|handle| {
                let body = self.world.body(handle)?;
                (!body.is_static()).then(|| (handle, body.position().distance_squared(point)))
            })
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(handle, _)| handle)
        else {
            return false;
        };
        let ground = self.ground();
        let def =
            MouseJointDef::new(ground, body, point).with_max_force(self.config.mouse_max_force);
        match self.world.create_mouse_joint(def) {
            Ok(joint) => {
                self.drag = Some(joint);
                debug!(?point, "started drag");
                true
            }
            Err(error) => {
                warn!(%error, "could not start drag");
                false
            }
        }
    }

    pub fn drag_to(&mut self, point: Vec2) {
        let Some(joint) = self.drag else {
            return;
        };
        if let Err(error) = self.world.set_mouse_target(joint, point) {
            debug!(%error, "dragged body is gone");
            self.drag = None;
        }
    }

    pub fn end_drag(&mut self) {
        if let Some(joint) = self.drag.take() {
            self.world.destroy_joint(joint);
        }
    }

    /// Renders every soft body in spawn order.
    pub fn render<B>(&mut self, backend: &mut B)
    where
        B: MeshBackend<Mesh = M>,
    {
        for body in &mut self.bodies {
            body.render(&self.world, backend);
        }
    }

    /// Destroys every dynamic body and joint, walls and platforms stay.
    /// Returns the meshes of the removed soft bodies.
    pub fn reset(&mut self) -> Vec<M> {
        self.drag = None;
        let meshes: Vec<M> = self
            .bodies
            .drain(..)
            .filter_map(|body| body.destroy(&mut self.world))
            .collect();
        self.rigid_bodies.clear();
        self.world.clear_dynamic();
        self.stepper.reset();
        info!(meshes = meshes.len(), remaining = self.world.body_count(), "reset scene");
        meshes
    }
}
