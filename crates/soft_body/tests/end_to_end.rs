use glam::Vec2;
use soft_body::{
    COMPONENT_COUNT, FanMesher, GridLattice, GridMesher, MeshBackend, MeshLayout, PrimitiveTopology,
    RigidBodyRequest, RingLattice, Scene, SceneConfig, SoftBodyConfig, SpawnRequest,
};
use soft_world::PhysicsWorld;

fn vertex(buffer: &[f32], index: usize) -> &[f32] {
    &buffer[index * COMPONENT_COUNT..(index + 1) * COMPONENT_COUNT]
}

#[test]
fn four_by_three_grid() {
    let mut world = PhysicsWorld::new(Vec2::new(0., -9.8));
    let config = SoftBodyConfig::default();
    let lattice = GridLattice::build(&mut world, Vec2::ZERO, 4, 3, 0.5, &config).unwrap();
    let mesher = GridMesher::new(4, 3).unwrap();

    let mut positions = Vec::new();
    let mut vertices = Vec::new();
    lattice.read_positions(&world, &mut positions);
    mesher.recompute_vertices(&positions, &mut vertices);

    assert_eq!(vertex(&vertices, 0), &[0., 0., 0., 0., 1.]);
    // grid point (3, 2) is vertex 2 * 4 + 3
    assert_eq!(vertex(&vertices, 11), &[1.5, 1., 0., 1., 0.]);
    assert_eq!(mesher.build_indices().len(), 18);
}

#[test]
fn twelve_segment_ring() {
    let mut world = PhysicsWorld::new(Vec2::new(0., -9.8));
    let config = SoftBodyConfig::default();
    let lattice = RingLattice::build(&mut world, Vec2::new(5., 5.), 1., 12, &config).unwrap();
    assert_eq!(world.body_position(lattice.hub()), Some(Vec2::new(5., 5.)));
    assert_eq!(world.body_position(lattice.ring()[0]), Some(Vec2::new(6., 5.)));

    let mesher = FanMesher::new(12, config.point_radius).unwrap();
    let mut positions = Vec::new();
    let mut vertices = Vec::new();
    lattice.read_positions(&world, &mut positions);
    mesher.recompute_vertices(&positions, &mut vertices);
    assert_eq!(vertices.len(), 14 * COMPONENT_COUNT);
    assert_eq!(&vertices[..5], &[5., 5., 0., 0.5, 0.5]);
    assert_eq!(vertex(&vertices, 1), vertex(&vertices, 13));
}

/// Counts how often meshes are created and drawn.
#[derive(Default)]
struct CountingBackend {
    created: Vec<MeshLayout>,
    draws: usize,
}

impl MeshBackend for CountingBackend {
    type Mesh = usize;

    fn create_mesh(&mut self, layout: &MeshLayout, indices: &[u32]) -> usize {
        assert_eq!(indices.len(), layout.index_capacity);
        self.created.push(*layout);
        self.created.len() - 1
    }

    fn upload_vertices(&mut self, mesh: &mut usize, vertices: &[f32]) {
        assert_eq!(vertices.len(), self.created[*mesh].vertex_capacity * COMPONENT_COUNT);
    }

    fn draw(&mut self, _mesh: &usize, _topology: PrimitiveTopology) {
        self.draws += 1;
    }
}

#[test]
fn scene_runs_spawns_and_resets() {
    let mut scene: Scene<usize> = Scene::new(SceneConfig::default()).unwrap();
    scene.create_bounds(8., 6., 0.5).unwrap();
    scene.spawn(SpawnRequest::Rectangle {
        origin: Vec2::ONE,
        width: 3,
        height: 4,
    });
    scene.spawn(SpawnRequest::Circle {
        center: Vec2::new(5., 3.),
        radius: 1.,
    });
    let rigid = scene.spawn_rigid(RigidBodyRequest::Circle {
        center: Vec2::new(7., 4.),
        radius: 0.3,
        friction: 0.4,
        density: 0.6,
    });
    assert!(rigid.is_some());

    let mut backend = CountingBackend::default();
    for _ in 0..120 {
        scene.update(1. / 60.);
        scene.render(&mut backend);
    }
    assert_eq!(backend.created.len(), 2);
    assert_eq!(backend.draws, 240);
    assert_eq!(backend.created[0].topology, PrimitiveTopology::TriangleStrip);
    assert_eq!(backend.created[1].topology, PrimitiveTopology::TriangleFan);

    for (_, body) in scene.world().bodies().filter(|(_, body)| !body.is_static()) {
        let position = body.position();
        assert!(position.is_finite());
        assert!(position.y > 0. && position.y < 6., "body escaped to {position}");
    }

    let meshes = scene.reset();
    assert_eq!(meshes, vec![0, 1]);
    assert_eq!(scene.world().body_count(), scene.walls().len());
    assert_eq!(scene.world().total_joint_count(), 0);
}
