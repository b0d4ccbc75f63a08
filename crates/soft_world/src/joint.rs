use std::f32::consts::TAU;

use glam::Vec2;
use rapier2d::prelude::*;

use crate::body::BodyHandle;

/// Handle to a [Joint] stored in a [crate::PhysicsWorld].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JointHandle(pub(crate) ImpulseJointHandle);

/// Keeps two bodies near a rest length with a damped spring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceJointDef {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    pub length: f32,
    /// Mass-spring-damper frequency in Hertz, must be above zero
    pub frequency_hz: f32,
    pub damping_ratio: f32,
    /// Whether the two bodies still collide with each other
    pub collide_connected: bool,
}

impl DistanceJointDef {
    /// Rest length is the current distance between the two anchors.
    pub fn initialize(
        body_a: BodyHandle,
        body_b: BodyHandle,
        anchor_a: Vec2,
        anchor_b: Vec2,
    ) -> Self {
        DistanceJointDef {
            body_a,
            body_b,
            length: anchor_a.distance(anchor_b),
            frequency_hz: 0.,
            damping_ratio: 0.,
            collide_connected: false,
        }
    }

    pub fn with_frequency(mut self, frequency_hz: f32) -> Self {
        self.frequency_hz = frequency_hz;
        self
    }

    pub fn with_damping(mut self, damping_ratio: f32) -> Self {
        self.damping_ratio = damping_ratio;
        self
    }

    pub fn with_collide_connected(mut self, collide_connected: bool) -> Self {
        self.collide_connected = collide_connected;
        self
    }

    pub(crate) fn to_spring(self) -> SpringJointBuilder {
        let (stiffness, damping) = spring_coefficients(self.frequency_hz, self.damping_ratio);
        SpringJointBuilder::new(self.length, stiffness, damping)
            .spring_model(MotorModel::AccelerationBased)
            .contacts_enabled(self.collide_connected)
    }
}

/// Pulls a body towards a target point, capped at `max_force`. A joint
/// without force does not pull.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseJointDef {
    /// Anchor body, usually the ground. Never moved by the joint.
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    pub target: Vec2,
    pub max_force: f32,
    pub frequency_hz: f32,
    pub damping_ratio: f32,
    pub collide_connected: bool,
}

impl MouseJointDef {
    pub fn new(body_a: BodyHandle, body_b: BodyHandle, target: Vec2) -> Self {
        MouseJointDef {
            body_a,
            body_b,
            target,
            max_force: 0.,
            frequency_hz: 5.,
            damping_ratio: 0.7,
            collide_connected: true,
        }
    }

    pub fn with_max_force(mut self, max_force: f32) -> Self {
        self.max_force = max_force;
        self
    }

    /// Zero length spring from the ground anchor to the dragged body.
    pub(crate) fn to_spring(self) -> SpringJointBuilder {
        let (stiffness, damping) = spring_coefficients(self.frequency_hz, self.damping_ratio);
        SpringJointBuilder::new(0., stiffness, damping)
            .spring_model(MotorModel::AccelerationBased)
            .contacts_enabled(self.collide_connected)
    }

    /// Where the spring actually pulls a body sitting at `position`. The
    /// offset is shortened until the spring force stays under `max_force`.
    pub(crate) fn capped_target(&self, position: Vec2, mass: f32) -> Vec2 {
        if self.max_force <= 0. {
            return position;
        }
        let (stiffness, _) = spring_coefficients(self.frequency_hz, self.damping_ratio);
        if mass <= 0. || stiffness <= 0. {
            return self.target;
        }
        position + (self.target - position).clamp_length_max(self.max_force / (mass * stiffness))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Joint {
    Distance(DistanceJointDef),
    Mouse(MouseJointDef),
}

impl Joint {
    pub fn bodies(&self) -> (BodyHandle, BodyHandle) {
        match self {
            Joint::Distance(def) => (def.body_a, def.body_b),
            Joint::Mouse(def) => (def.body_a, def.body_b),
        }
    }

    pub fn collide_connected(&self) -> bool {
        match self {
            Joint::Distance(def) => def.collide_connected,
            Joint::Mouse(def) => def.collide_connected,
        }
    }

    pub(crate) fn touches(&self, body: BodyHandle) -> bool {
        let (a, b) = self.bodies();
        a == body || b == body
    }
}

/// Per unit mass stiffness and damping of a spring oscillating at
/// `frequency_hz`.
pub(crate) fn spring_coefficients(frequency_hz: f32, damping_ratio: f32) -> (f32, f32) {
    let omega = TAU * frequency_hz;
    (omega * omega, 2. * damping_ratio * omega)
}
