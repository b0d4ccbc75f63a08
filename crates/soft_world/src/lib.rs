pub mod body;
pub mod error;
pub mod joint;
pub mod world;

pub use body::{Body, BodyDef, BodyHandle, BodyType, Fixture, Shape};
pub use error::WorldError;
pub use joint::{DistanceJointDef, Joint, JointHandle, MouseJointDef};
pub use world::PhysicsWorld;
