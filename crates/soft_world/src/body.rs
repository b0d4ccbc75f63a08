use std::f32::consts::PI;

use glam::Vec2;
use rapier2d::{parry::shape::TypedShape, prelude::*};

/// Handle to a body stored in a [crate::PhysicsWorld]. Generational, so a
/// handle to a destroyed body never resolves to a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub(crate) RigidBodyHandle);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    /// Never moves, infinite mass.
    Static,
    Dynamic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
    /// Oriented box, rotated by the owning body's angle.
    Box { half_extents: Vec2 },
}

impl Shape {
    pub fn area(&self) -> f32 {
        match self {
            Shape::Circle { radius } => PI * radius * radius,
            Shape::Box { half_extents } => 4. * half_extents.x * half_extents.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fixture {
    pub shape: Shape,
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
}

impl Fixture {
    pub fn circle(radius: f32) -> Self {
        Fixture {
            shape: Shape::Circle { radius },
            density: 1.,
            friction: 0.2,
            restitution: 0.,
        }
    }

    pub fn cuboid(half_extents: Vec2) -> Self {
        Fixture {
            shape: Shape::Box { half_extents },
            density: 1.,
            friction: 0.2,
            restitution: 0.,
        }
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    /// Bouncier surface wins a contact. Friction averages.
    pub(crate) fn to_collider(self) -> Collider {
        let builder = match self.shape {
            Shape::Circle { radius } => ColliderBuilder::ball(radius),
            Shape::Box { half_extents } => ColliderBuilder::cuboid(half_extents.x, half_extents.y),
        };
        builder
            .density(self.density)
            .friction(self.friction)
            .restitution(self.restitution)
            .restitution_combine_rule(CoefficientCombineRule::Max)
            .build()
    }

    fn from_collider(collider: &Collider) -> Option<Self> {
        let shape = match collider.shape().as_typed_shape() {
            TypedShape::Ball(ball) => Shape::Circle {
                radius: ball.radius,
            },
            TypedShape::Cuboid(cuboid) => Shape::Box {
                half_extents: to_vec2(&cuboid.half_extents),
            },
            _ => return None,
        };
        Some(Fixture {
            shape,
            density: collider.density(),
            friction: collider.friction(),
            restitution: collider.restitution(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDef {
    pub body_type: BodyType,
    pub position: Vec2,
    /// Locks rotation, the body only translates.
    pub fixed_rotation: bool,
}

impl BodyDef {
    pub fn new(body_type: BodyType, position: Vec2) -> Self {
        BodyDef {
            body_type,
            position,
            fixed_rotation: false,
        }
    }

    pub fn with_fixed_rotation(mut self, fixed_rotation: bool) -> Self {
        self.fixed_rotation = fixed_rotation;
        self
    }

    pub(crate) fn to_rigid_body(self) -> RigidBody {
        let builder = match self.body_type {
            BodyType::Static => RigidBodyBuilder::fixed(),
            BodyType::Dynamic => RigidBodyBuilder::dynamic(),
        }
        .translation(to_vector(self.position));
        if self.fixed_rotation {
            builder.lock_rotations().build()
        } else {
            builder.build()
        }
    }
}

/// Read-only view of a live body and its fixture.
#[derive(Clone, Copy)]
pub struct Body<'w> {
    pub(crate) rigid_body: &'w RigidBody,
    pub(crate) collider: Option<&'w Collider>,
}

impl Body<'_> {
    pub fn body_type(&self) -> BodyType {
        if self.rigid_body.is_dynamic() {
            BodyType::Dynamic
        } else {
            BodyType::Static
        }
    }

    pub fn is_static(&self) -> bool {
        self.body_type() == BodyType::Static
    }

    pub fn position(&self) -> Vec2 {
        to_vec2(self.rigid_body.translation())
    }

    pub fn angle(&self) -> f32 {
        self.rigid_body.rotation().angle()
    }

    pub fn velocity(&self) -> Vec2 {
        to_vec2(self.rigid_body.linvel())
    }

    /// Zero for static bodies.
    pub fn mass(&self) -> f32 {
        self.rigid_body.mass()
    }

    pub fn is_fixed_rotation(&self) -> bool {
        self.rigid_body
            .locked_axes()
            .contains(LockedAxes::ROTATION_LOCKED)
    }

    pub fn fixture(&self) -> Option<Fixture> {
        self.collider.and_then(Fixture::from_collider)
    }

    /// World space bounds of the fixture. A body without one is a point.
    pub fn aabb(&self) -> (Vec2, Vec2) {
        match self.collider {
            Some(collider) => {
                let aabb = collider.compute_aabb();
                (
                    Vec2::new(aabb.mins.x, aabb.mins.y),
                    Vec2::new(aabb.maxs.x, aabb.maxs.y),
                )
            }
            None => (self.position(), self.position()),
        }
    }
}

#[inline]
pub(crate) fn to_vector(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

#[inline]
pub(crate) fn to_vec2(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_areas() {
        assert!((Shape::Circle { radius: 1. }.area() - PI).abs() < 1e-6);
        let rectangle = Shape::Box {
            half_extents: Vec2::new(0.5, 2.),
        };
        assert_eq!(rectangle.area(), 4.);
    }

    #[test]
    fn fixture_survives_the_collider() {
        let fixture = Fixture::cuboid(Vec2::new(0.3, 0.2))
            .with_density(0.5)
            .with_friction(0.8)
            .with_restitution(0.1);
        assert_eq!(Fixture::from_collider(&fixture.to_collider()), Some(fixture));

        let ball = Fixture::circle(0.15);
        assert_eq!(Fixture::from_collider(&ball.to_collider()), Some(ball));
    }

    #[test]
    fn rigid_body_follows_the_def() {
        let def = BodyDef::new(BodyType::Dynamic, Vec2::new(1., 2.)).with_fixed_rotation(true);
        let rigid_body = def.to_rigid_body();
        let body = Body {
            rigid_body: &rigid_body,
            collider: None,
        };
        assert_eq!(body.body_type(), BodyType::Dynamic);
        assert_eq!(body.position(), Vec2::new(1., 2.));
        assert!(body.is_fixed_rotation());
        assert_eq!(body.aabb(), (Vec2::new(1., 2.), Vec2::new(1., 2.)));

        let wall = BodyDef::new(BodyType::Static, Vec2::ZERO).to_rigid_body();
        assert!(!wall.is_dynamic());
    }
}
