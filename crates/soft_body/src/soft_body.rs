use glam::Vec2;
use soft_world::{BodyHandle, PhysicsWorld};
use tracing::debug;

use crate::{
    config::SoftBodyConfig,
    error::SoftBodyError,
    lattice::{GridLattice, LatticeJoint, RingLattice},
    mesher::{FanMesher, GridMesher, PrimitiveTopology},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexAttribute {
    Position,
    TexCoords,
}

impl VertexAttribute {
    pub fn components(&self) -> usize {
        match self {
            VertexAttribute::Position => 3,
            VertexAttribute::TexCoords => 2,
        }
    }
}

/// Interleaved layout of every soft body vertex.
pub const VERTEX_ATTRIBUTES: [VertexAttribute; 2] =
    [VertexAttribute::Position, VertexAttribute::TexCoords];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshLayout {
    pub vertex_capacity: usize,
    pub index_capacity: usize,
    pub topology: PrimitiveTopology,
    pub attributes: &'static [VertexAttribute],
}

/// Renderer side of a soft body. Meshes are created once with a fixed
/// capacity, then only their vertices change.
pub trait MeshBackend {
    type Mesh;

    /// `indices` is empty for fans, which are drawn straight from vertex order.
    fn create_mesh(&mut self, layout: &MeshLayout, indices: &[u32]) -> Self::Mesh;

    fn upload_vertices(&mut self, mesh: &mut Self::Mesh, vertices: &[f32]);

    /// Binds the texture and draws. Retained mode backends can skip this.
    fn draw(&mut self, mesh: &Self::Mesh, topology: PrimitiveTopology);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyState {
    /// Lattice exists, no mesh yet
    Built,
    /// Mesh created, vertices refreshed on every render
    Active,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SoftShape {
    Rectangle { lattice: GridLattice, mesher: GridMesher },
    Circle { lattice: RingLattice, mesher: FanMesher },
}

impl SoftShape {
    /// Reads the lattice into `positions` and rebuilds the vertex buffer from it.
    pub fn recompute_vertices(
        &self,
        world: &PhysicsWorld,
        positions: &mut Vec<Vec2>,
        out: &mut Vec<f32>,
    ) {
        match self {
            SoftShape::Rectangle { lattice, mesher } => {
                lattice.read_positions(world, positions);
                mesher.recompute_vertices(positions, out);
            }
            SoftShape::Circle { lattice, mesher } => {
                lattice.read_positions(world, positions);
                mesher.recompute_vertices(positions, out);
            }
        }
    }

    pub fn build_topology(&self) -> Vec<u32> {
        match self {
            SoftShape::Rectangle { mesher, .. } => mesher.build_indices(),
            SoftShape::Circle { .. } => Vec::new(),
        }
    }

    pub fn primitive_topology(&self) -> PrimitiveTopology {
        match self {
            SoftShape::Rectangle { .. } => PrimitiveTopology::TriangleStrip,
            SoftShape::Circle { .. } => PrimitiveTopology::TriangleFan,
        }
    }

    pub fn vertex_count(&self) -> usize {
        match self {
            SoftShape::Rectangle { mesher, .. } => mesher.vertex_count(),
            SoftShape::Circle { mesher, .. } => mesher.vertex_count(),
        }
    }

    pub fn points(&self) -> &[BodyHandle] {
        match self {
            SoftShape::Rectangle { lattice, .. } => lattice.points(),
            SoftShape::Circle { lattice, .. } => lattice.points(),
        }
    }

    pub fn joints(&self) -> &[LatticeJoint] {
        match self {
            SoftShape::Rectangle { lattice, .. } => lattice.joints(),
            SoftShape::Circle { lattice, .. } => lattice.joints(),
        }
    }

    fn read_positions(&self, world: &PhysicsWorld, out: &mut Vec<Vec2>) {
        match self {
            SoftShape::Rectangle { lattice, .. } => lattice.read_positions(world, out),
            SoftShape::Circle { lattice, .. } => lattice.read_positions(world, out),
        }
    }

    fn destroy(&self, world: &mut PhysicsWorld) {
        match self {
            SoftShape::Rectangle { lattice, .. } => lattice.destroy(world),
            SoftShape::Circle { lattice, .. } => lattice.destroy(world),
        }
    }
}

/// A lattice of point masses and the textured mesh stretched over it. `M` is
/// the backend's mesh, created on the first render.
#[derive(Debug)]
pub struct SoftBody<M> {
    shape: SoftShape,
    /// Last known point positions, kept when a body goes missing
    positions: Vec<Vec2>,
    vertices: Vec<f32>,
    mesh: Option<M>,
}

impl<M> SoftBody<M> {
    fn from_shape(world: &PhysicsWorld, shape: SoftShape) -> Self {
        let mut positions = Vec::with_capacity(shape.points().len());
        shape.read_positions(world, &mut positions);
        SoftBody {
            shape,
            positions,
            vertices: Vec::new(),
            mesh: None,
        }
    }

    /// Grid of `width` by `height` points with its lower left point at `origin`.
    pub fn rectangle(
        world: &mut PhysicsWorld,
        config: &SoftBodyConfig,
        origin: Vec2,
        width: usize,
        height: usize,
    ) -> Result<Self, SoftBodyError> {
        let mesher = GridMesher::new(width, height)?;
        let lattice =
            GridLattice::build(world, origin, width, height, config.grid_spacing, config)?;
        Ok(SoftBody::from_shape(world, SoftShape::Rectangle { lattice, mesher }))
    }

    pub fn circle(
        world: &mut PhysicsWorld,
        config: &SoftBodyConfig,
        center: Vec2,
        radius: f32,
    ) -> Result<Self, SoftBodyError> {
        if !radius.is_finite() || radius <= 0. {
            return Err(SoftBodyError::InvalidRadius(radius));
        }
        let segments = RingLattice::segments_for_radius(radius, config.segments_per_unit);
        let mesher = FanMesher::new(segments, config.point_radius)?;
        let lattice = RingLattice::build(world, center, radius, segments, config)?;
        Ok(SoftBody::from_shape(world, SoftShape::Circle { lattice, mesher }))
    }

    pub fn shape(&self) -> &SoftShape {
        &self.shape
    }

    pub fn state(&self) -> BodyState {
        if self.mesh.is_some() {
            BodyState::Active
        } else {
            BodyState::Built
        }
    }

    pub fn mesh(&self) -> Option<&M> {
        self.mesh.as_ref()
    }

    /// Vertex buffer of the last render.
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    /// Refreshes the vertices and draws. The mesh and its indices are built on
    /// the first call only.
    pub fn render<B>(&mut self, world: &PhysicsWorld, backend: &mut B)
    where
        B: MeshBackend<Mesh = M>,
    {
        self.shape
            .recompute_vertices(world, &mut self.positions, &mut self.vertices);
        let topology = self.shape.primitive_topology();
        let shape = &self.shape;
        let mesh = self.mesh.get_or_insert_with(|| {
            let indices = shape.build_topology();
            let layout = MeshLayout {
                vertex_capacity: shape.vertex_count(),
                index_capacity: indices.len(),
                topology,
                attributes: &VERTEX_ATTRIBUTES,
            };
            debug!(
                vertices = layout.vertex_capacity,
                indices = indices.len(),
                ?topology,
                "creating soft body mesh"
            );
            backend.create_mesh(&layout, &indices)
        });
        backend.upload_vertices(mesh, &self.vertices);
        backend.draw(mesh, topology);
    }

    /// Removes the point masses and their joints from the world. Hands back
    /// the mesh so the caller can release it.
    pub fn destroy(self, world: &mut PhysicsWorld) -> Option<M> {
        self.shape.destroy(world);
        self.mesh
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Backend that keeps meshes in memory and counts calls.
    #[derive(Default)]
    pub(crate) struct RecordingBackend {
        pub created: usize,
        pub uploads: usize,
        pub draws: Vec<PrimitiveTopology>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) struct RecordedMesh {
        pub layout: MeshLayout,
        pub indices: Vec<u32>,
        pub vertices: Vec<f32>,
    }

    impl MeshBackend for RecordingBackend {
        type Mesh = RecordedMesh;

        fn create_mesh(&mut self, layout: &MeshLayout, indices: &[u32]) -> RecordedMesh {
            self.created += 1;
            RecordedMesh {
                layout: *layout,
                indices: indices.to_vec(),
                vertices: Vec::new(),
            }
        }

        fn upload_vertices(&mut self, mesh: &mut RecordedMesh, vertices: &[f32]) {
            self.uploads += 1;
            mesh.vertices = vertices.to_vec();
        }

        fn draw(&mut self, _mesh: &RecordedMesh, topology: PrimitiveTopology) {
            self.draws.push(topology);
        }
    }

    fn world() -> PhysicsWorld {
        PhysicsWorld::new(Vec2::new(0., -9.8))
    }

    #[test]
    fn mesh_is_created_once() {
        let mut world = world();
        let mut backend = RecordingBackend::default();
        let config = SoftBodyConfig::default();
        let mut body = SoftBody::rectangle(&mut world, &config, Vec2::ONE, 3, 4).unwrap();
        assert_eq!(body.state(), BodyState::Built);

        body.render(&world, &mut backend);
        world.step(1. / 60., 6, 2);
        body.render(&world, &mut backend);

        assert_eq!(body.state(), BodyState::Active);
        assert_eq!(backend.created, 1);
        assert_eq!(backend.uploads, 2);
        assert_eq!(backend.draws, vec![PrimitiveTopology::TriangleStrip; 2]);

        let mesh = body.mesh().unwrap();
        assert_eq!(mesh.layout.vertex_capacity, 12);
        assert_eq!(mesh.layout.index_capacity, 2 * 3 * 3 + 2 * 2);
        assert_eq!(mesh.indices.len(), mesh.layout.index_capacity);
        assert_eq!(mesh.vertices, body.vertices());
        let floats: usize = mesh.layout.attributes.iter().map(VertexAttribute::components).sum();
        assert_eq!(floats, crate::mesher::COMPONENT_COUNT);
    }

    #[test]
    fn circle_uses_fan_without_indices() {
        let mut world = world();
        let mut backend = RecordingBackend::default();
        let config = SoftBodyConfig::default();
        let mut body = SoftBody::circle(&mut world, &config, Vec2::new(4., 3.), 0.5).unwrap();
        body.render(&world, &mut backend);

        let mesh = body.mesh().unwrap();
        assert_eq!(mesh.layout.topology, PrimitiveTopology::TriangleFan);
        assert!(mesh.indices.is_empty());
        // 10 ring points, hub and the closing vertex
        assert_eq!(mesh.layout.vertex_capacity, 12);
        assert_eq!(body.shape().points().len(), 11);
    }

    #[test]
    fn construction_validates_before_touching_world() {
        let mut world = world();
        let config = SoftBodyConfig::default();
        assert_eq!(
            SoftBody::<()>::rectangle(&mut world, &config, Vec2::ZERO, 1, 5).err(),
            Some(SoftBodyError::InvalidMeshSize { width: 1, height: 5 })
        );
        assert_eq!(
            SoftBody::<()>::circle(&mut world, &config, Vec2::ZERO, -1.).err(),
            Some(SoftBodyError::InvalidRadius(-1.))
        );
        // 0.1 m at 20 segments per meter is only 2 segments
        assert_eq!(
            SoftBody::<()>::circle(&mut world, &config, Vec2::ZERO, 0.1).err(),
            Some(SoftBodyError::TooFewSegments(2))
        );
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn render_follows_the_world() {
        let mut world = world();
        let mut backend = RecordingBackend::default();
        let config = SoftBodyConfig::default();
        let mut body = SoftBody::rectangle(&mut world, &config, Vec2::new(1., 3.), 2, 2).unwrap();
        body.render(&world, &mut backend);
        let before = body.vertices()[1];
        for _ in 0..30 {
            world.step(1. / 60., 6, 2);
        }
        body.render(&world, &mut backend);
        assert!(body.vertices()[1] < before);
    }

    #[test]
    fn destroy_hands_back_the_mesh() {
        let mut world = world();
        let mut backend = RecordingBackend::default();
        let config = SoftBodyConfig::default();
        let mut body = SoftBody::rectangle(&mut world, &config, Vec2::ZERO, 2, 3).unwrap();
        body.render(&world, &mut backend);
        let mesh = body.destroy(&mut world);
        assert!(mesh.is_some());
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.total_joint_count(), 0);
    }
}
