pub mod config;
pub mod error;
pub mod lattice;
pub mod mesher;
pub mod scene;
pub mod soft_body;
pub mod spawn;
pub mod stepper;
pub mod units;

pub use config::{SceneConfig, SoftBodyConfig};
pub use error::SoftBodyError;
pub use lattice::{GridLattice, LatticeJoint, RingLattice};
pub use mesher::{COMPONENT_COUNT, FanMesher, GridMesher, PrimitiveTopology};
pub use scene::Scene;
pub use soft_body::{BodyState, MeshBackend, MeshLayout, SoftBody, SoftShape, VertexAttribute};
pub use spawn::{RigidBodyRequest, SpawnRequest};
pub use stepper::FixedStepper;
