use std::{collections::HashMap, num::NonZeroUsize};

use glam::Vec2;
use rapier2d::{parry::bounding_volume::Aabb, prelude::*};
use tracing::{debug, trace};

use crate::{
    body::{Body, BodyDef, BodyHandle, Fixture, to_vec2, to_vector},
    error::WorldError,
    joint::{DistanceJointDef, Joint, JointHandle, MouseJointDef},
};

/// Rigid bodies with circle and box fixtures, joined by spring joints and
/// stepped by rapier.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    /// Colliders changed since the query pipeline was last rebuilt
    query_stale: bool,
    /// Definition behind every live joint
    joints: HashMap<JointHandle, Joint>,
}

impl PhysicsWorld {
    pub fn new(gravity: Vec2) -> Self {
        PhysicsWorld {
            gravity: to_vector(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            query_stale: false,
            joints: HashMap::new(),
        }
    }

    pub fn gravity(&self) -> Vec2 {
        to_vec2(&self.gravity)
    }

    pub fn create_body(&mut self, def: &BodyDef) -> BodyHandle {
        BodyHandle(self.rigid_body_set.insert(def.to_rigid_body()))
    }

    /// Bodies carry at most one fixture, a second call replaces the first.
    pub fn create_fixture(&mut self, body: BodyHandle, fixture: Fixture) -> Result<(), WorldError> {
        let previous = self
            .rigid_body_set
            .get(body.0)
            .ok_or(WorldError::UnknownBody)?
            .colliders()
            .to_vec();
        for collider in previous {
            self.collider_set.remove(
                collider,
                &mut self.island_manager,
                &mut self.rigid_body_set,
                true,
            );
        }
        self.collider_set
            .insert_with_parent(fixture.to_collider(), body.0, &mut self.rigid_body_set);
        self.query_stale = true;
        Ok(())
    }

    pub fn create_distance_joint(
        &mut self,
        def: DistanceJointDef,
    ) -> Result<JointHandle, WorldError> {
        if !def.frequency_hz.is_finite() || def.frequency_hz <= 0. {
            return Err(WorldError::InvalidFrequency(def.frequency_hz));
        }
        self.check_bodies(def.body_a, def.body_b)?;
        let handle = self
            .impulse_joint_set
            .insert(def.body_a.0, def.body_b.0, def.to_spring(), true);
        Ok(self.register_joint(handle, Joint::Distance(def)))
    }

    /// The ground anchor is placed on the target, so the body is pulled
    /// there from the first step.
    pub fn create_mouse_joint(&mut self, def: MouseJointDef) -> Result<JointHandle, WorldError> {
        self.check_bodies(def.body_a, def.body_b)?;
        let anchor = self.capped_anchor(&def).ok_or(WorldError::UnknownBody)?;
        let spring = def.to_spring().local_anchor1(anchor);
        let handle = self
            .impulse_joint_set
            .insert(def.body_a.0, def.body_b.0, spring, true);
        Ok(self.register_joint(handle, Joint::Mouse(def)))
    }

    fn check_bodies(&self, body_a: BodyHandle, body_b: BodyHandle) -> Result<(), WorldError> {
        if self.rigid_body_set.contains(body_a.0) && self.rigid_body_set.contains(body_b.0) {
            Ok(())
        } else {
            Err(WorldError::UnknownBody)
        }
    }

    fn register_joint(&mut self, handle: ImpulseJointHandle, joint: Joint) -> JointHandle {
        let handle = JointHandle(handle);
        self.joints.insert(handle, joint);
        trace!(joints = self.joints.len(), "created joint");
        handle
    }

    /// Target of a mouse joint in the anchor body's local frame, after the
    /// force cap.
    fn capped_anchor(&self, def: &MouseJointDef) -> Option<Point<Real>> {
        let anchor_body = self.rigid_body_set.get(def.body_a.0)?;
        let body = self.rigid_body_set.get(def.body_b.0)?;
        let target = def.capped_target(to_vec2(body.translation()), body.mass());
        Some(
            anchor_body
                .position()
                .inverse_transform_point(&point![target.x, target.y]),
        )
    }

    pub fn set_mouse_target(&mut self, joint: JointHandle, target: Vec2) -> Result<(), WorldError> {
        match self.joints.get_mut(&joint) {
            Some(Joint::Mouse(def)) => {
                def.target = target;
                if let Some(body) = self.rigid_body_set.get_mut(def.body_b.0) {
                    body.wake_up(true);
                }
                Ok(())
            }
            Some(Joint::Distance(_)) => Err(WorldError::NotMouseJoint),
            None => Err(WorldError::UnknownJoint),
        }
    }

    /// Moves every mouse anchor to its capped target before a step.
    fn update_mouse_anchors(&mut self) {
        for (handle, joint) in &self.joints {
            let Joint::Mouse(def) = joint else {
                continue;
            };
            let Some(anchor) = self.capped_anchor(def) else {
                continue;
            };
            if let Some(impulse_joint) = self.impulse_joint_set.get_mut(handle.0) {
                impulse_joint.data.set_local_anchor1(anchor);
            }
        }
    }

    pub fn body_position(&self, body: BodyHandle) -> Option<Vec2> {
        self.rigid_body_set
            .get(body.0)
            .map(|rigid_body| to_vec2(rigid_body.translation()))
    }

    pub fn body(&self, body: BodyHandle) -> Option<Body<'_>> {
        self.rigid_body_set
            .get(body.0)
            .map(|rigid_body| self.view(rigid_body))
    }

    fn view<'w>(&'w self, rigid_body: &'w RigidBody) -> Body<'w> {
        Body {
            rigid_body,
            collider: rigid_body
                .colliders()
                .first()
                .and_then(|collider| self.collider_set.get(*collider)),
        }
    }

    pub fn joint(&self, joint: JointHandle) -> Option<&Joint> {
        self.joints.get(&joint)
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, Body<'_>)> {
        self.rigid_body_set
            .iter()
            .map(|(handle, rigid_body)| (BodyHandle(handle), self.view(rigid_body)))
    }

    /// Joints in storage order.
    pub fn joints(&self) -> impl Iterator<Item = (JointHandle, &Joint)> {
        self.impulse_joint_set.iter().filter_map(|(handle, _)| {
            let handle = JointHandle(handle);
            self.joints.get(&handle).map(|joint| (handle, joint))
        })
    }

    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    pub fn total_joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Joints anchored on `body`, from either end.
    pub fn joint_count(&self, body: BodyHandle) -> usize {
        self.joints
            .values()
            .filter(|joint| joint.touches(body))
            .count()
    }

    /// Destroys the body, its fixture and every joint attached to it.
    /// Returns false when the handle was already stale.
    pub fn destroy_body(&mut self, body: BodyHandle) -> bool {
        let removed = self.rigid_body_set.remove(
            body.0,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
        if removed.is_none() {
            return false;
        }
        self.joints.retain(|_, joint| !joint.touches(body));
        self.query_stale = true;
        true
    }

    pub fn destroy_joint(&mut self, joint: JointHandle) -> Option<Joint> {
        let removed = self.joints.remove(&joint)?;
        self.impulse_joint_set.remove(joint.0, true);
        Some(removed)
    }

    /// Destroys every dynamic body and every joint. Returns how many bodies
    /// were removed.
    pub fn clear_dynamic(&mut self) -> usize {
        let dynamic: Vec<RigidBodyHandle> = self
            .rigid_body_set
            .iter()
            .filter(|(_, rigid_body)| rigid_body.is_dynamic())
            .map(|(handle, _)| handle)
            .collect();
        for handle in &dynamic {
            self.rigid_body_set.remove(
                *handle,
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true,
            );
        }
        for (joint, _) in self.joints.drain() {
            self.impulse_joint_set.remove(joint.0, true);
        }
        self.query_stale = true;
        debug!(removed = dynamic.len(), remaining = self.body_count(), "cleared dynamic bodies");
        dynamic.len()
    }

    /// Bodies whose fixture bounds overlap `[min, max]`, each listed once.
    pub fn query_aabb(&mut self, min: Vec2, max: Vec2) -> Vec<BodyHandle> {
        if self.query_stale {
            self.query_pipeline.update(&self.collider_set);
            self.query_stale = false;
        }
        let aabb = Aabb::new(point![min.x, min.y], point![max.x, max.y]);
        let mut hits = Vec::new();
        self.query_pipeline
            .colliders_with_aabb_intersecting_aabb(&aabb, |collider| {
                let parent = self
                    .collider_set
                    .get(*collider)
                    .and_then(|collider| collider.parent());
                if let Some(parent) = parent
                    .map(BodyHandle)
                    .filter(|parent| !hits.contains(parent))
                {
                    hits.push(parent);
                }
                true
            });
        hits
    }

    /// One fixed step. Velocity iterations become solver iterations,
    /// position iterations the internal stabilization passes of each.
    pub fn step(&mut self, timestep: f32, velocity_iterations: usize, position_iterations: usize) {
        if timestep.is_nan() || timestep <= 0. {
            return;
        }
        self.update_mouse_anchors();
        self.integration_parameters.dt = timestep;
        self.integration_parameters.num_solver_iterations =
            NonZeroUsize::new(velocity_iterations).unwrap_or(NonZeroUsize::MIN);
        self.integration_parameters.num_internal_pgs_iterations = position_iterations.max(1);
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
        self.query_stale = false;
        trace!(
            timestep,
            bodies = self.rigid_body_set.len(),
            joints = self.joints.len(),
            "stepped world"
        );
    }
}
