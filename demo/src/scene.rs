use bevy::{color::palettes, prelude::*};
use soft_body::{Scene, SceneConfig, SpawnRequest};
use soft_world::{BodyHandle, Joint, PhysicsWorld, Shape};

use crate::{
    mesh_backend::{BevyMeshBackend, BodyMesh},
    texture::checkerboard,
};

#[derive(Resource, Clone, Copy)]
pub struct ScenePluginConfig {
    pub scene: SceneConfig,
    /// Visible area in meters, walled in on every side
    pub bounds: Vec2,
    pub wall_thickness: f32,
    /// Side length of the generated texture in pixels
    pub texture_size: u32,
    pub texture_cells: u32,
}

pub struct ScenePlugin {
    pub config: ScenePluginConfig,
}
impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config)
            .insert_resource(DebugOverlay(false))
            .configure_sets(Update, (SceneSet::Input, SceneSet::Step, SceneSet::Render).chain())
            .add_systems(Startup, setup)
            .add_systems(
                Update,
                (
                    step_scene.in_set(SceneSet::Step),
                    (render_scene, sync_rigid_sprites).in_set(SceneSet::Render),
                    draw_debug_overlay
                        .after(SceneSet::Step)
                        .run_if(|overlay: Res<DebugOverlay>| overlay.0),
                ),
            );
    }
}

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneSet {
    Input,
    Step,
    Render,
}

#[derive(Resource)]
pub struct JellyScene(pub Scene<BodyMesh>);

/// Textured material shared by every soft body.
#[derive(Resource)]
pub struct SceneMaterial(pub Handle<ColorMaterial>);

/// Flat material shared by every rigid body.
#[derive(Resource)]
pub struct RigidMaterial(pub Handle<ColorMaterial>);

/// Entity drawing one rigid body of the scene. Despawned once the body is
/// gone from the world.
#[derive(Component)]
pub struct RigidBodySprite(pub BodyHandle);

/// Whether joints and point masses are drawn on top of the meshes.
#[derive(Resource)]
pub struct DebugOverlay(pub bool);

fn setup(
    config: Res<ScenePluginConfig>,
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) -> Result {
    let texture = images.add(checkerboard(config.texture_size, config.texture_cells));
    let material = materials.add(ColorMaterial::from(texture));
    commands.insert_resource(SceneMaterial(material));
    let rigid = materials.add(ColorMaterial::from_color(palettes::css::STEEL_BLUE));
    commands.insert_resource(RigidMaterial(rigid));

    let mut scene = Scene::new(config.scene)?;
    let (width, height) = (config.bounds.x, config.bounds.y);
    if let Err(error) = scene.create_bounds(width, height, config.wall_thickness) {
        warn!("could not create scene bounds: {error}");
    }
    scene.spawn(SpawnRequest::Rectangle {
        origin: Vec2::new(1., 1.),
        width: 3,
        height: 4,
    });
    scene.spawn(SpawnRequest::Circle {
        center: Vec2::new(config.bounds.x * 0.65, config.bounds.y * 0.5),
        radius: 0.8,
    });
    commands.insert_resource(JellyScene(scene));
    Ok(())
}

fn step_scene(time: Res<Time>, mut scene: ResMut<JellyScene>) {
    scene.0.update(time.delta_secs());
}

fn render_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    material: Res<SceneMaterial>,
    mut scene: ResMut<JellyScene>,
) {
    let mut backend = BevyMeshBackend {
        commands: &mut commands,
        meshes: &mut meshes,
        material: material.0.clone(),
    };
    scene.0.render(&mut backend);
}

/// Spawns the entity mirroring `body`, shaped after its fixture.
pub fn spawn_rigid_sprite(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    material: Handle<ColorMaterial>,
    world: &PhysicsWorld,
    body: BodyHandle,
) {
    let Some((position, angle, fixture)) = world
        .body(body)
        .and_then(|view| Some((view.position(), view.angle(), view.fixture()?)))
    else {
        return;
    };
    let mesh = match fixture.shape {
        Shape::Circle { radius } => meshes.add(Circle::new(radius)),
        Shape::Box { half_extents } => meshes.add(Rectangle::from_size(half_extents * 2.)),
    };
    commands.spawn((
        RigidBodySprite(body),
        Mesh2d(mesh),
        MeshMaterial2d(material),
        Transform::from_translation(position.extend(1.))
            .with_rotation(Quat::from_rotation_z(angle)),
    ));
}

fn sync_rigid_sprites(
    mut commands: Commands,
    scene: Res<JellyScene>,
    mut sprites: Query<(Entity, &RigidBodySprite, &mut Transform)>,
) {
    let world = scene.0.world();
    for (entity, sprite, mut transform) in &mut sprites {
        match world.body(sprite.0) {
            Some(body) => {
                transform.translation = body.position().extend(transform.translation.z);
                transform.rotation = Quat::from_rotation_z(body.angle());
            }
            None => commands.entity(entity).despawn(),
        }
    }
}

fn draw_debug_overlay(mut gizmos: Gizmos, scene: Res<JellyScene>) {
    let world = scene.0.world();
    for (_, body) in world.bodies() {
        let Some(fixture) = body.fixture() else {
            continue;
        };
        match fixture.shape {
            Shape::Circle { radius } => {
                gizmos.circle_2d(
                    Isometry2d::from_translation(body.position()),
                    radius,
                    palettes::css::LIGHT_GREEN,
                );
            }
            Shape::Box { half_extents } => {
                gizmos.rect_2d(
                    Isometry2d::new(body.position(), Rot2::radians(body.angle())),
                    half_extents * 2.,
                    palettes::css::GRAY,
                );
            }
        }
    }
    for (_, joint) in world.joints() {
        let (body_a, body_b) = joint.bodies();
        let Some(position_b) = world.body_position(body_b) else {
            continue;
        };
        match joint {
            Joint::Distance(_) => {
                if let Some(position_a) = world.body_position(body_a) {
                    gizmos.line_2d(position_a, position_b, palettes::css::GOLD.with_alpha(0.5));
                }
            }
            Joint::Mouse(def) => {
                gizmos.line_2d(position_b, def.target, palettes::css::AQUA);
            }
        }
    }
}
