use bevy::{prelude::*, window::PrimaryWindow};
use soft_body::{RigidBodyRequest, SpawnRequest};

use crate::{
    GlobalRng, MainCamera,
    mesh_backend::BevyMeshBackend,
    scene::{DebugOverlay, JellyScene, RigidMaterial, SceneMaterial, SceneSet, spawn_rigid_sprite},
    states::InteractionMode,
};

pub struct InteractionPlugin;
impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                switch_mode,
                toggle_debug_overlay,
                reset_scene,
                drag.run_if(in_state(InteractionMode::Drag)),
                spawn.run_if(not(in_state(InteractionMode::Drag))),
            )
                .in_set(SceneSet::Input),
        )
        .add_systems(OnExit(InteractionMode::Drag), release_drag);
    }
}

fn cursor_world_position(
    windows: &Query<&Window, With<PrimaryWindow>>,
    cameras: &Query<(&Camera, &GlobalTransform), With<MainCamera>>,
) -> Option<Vec2> {
    let cursor = windows.single().ok()?.cursor_position()?;
    let (camera, transform) = cameras.single().ok()?;
    camera.viewport_to_world_2d(transform, cursor).ok()
}

const MODE_KEYS: [(KeyCode, InteractionMode); 5] = [
    (KeyCode::Digit1, InteractionMode::Drag),
    (KeyCode::Digit2, InteractionMode::SpawnRectangles),
    (KeyCode::Digit3, InteractionMode::SpawnCircles),
    (KeyCode::Digit4, InteractionMode::SpawnRigidRectangles),
    (KeyCode::Digit5, InteractionMode::SpawnRigidCircles),
];

fn switch_mode(keys: Res<ButtonInput<KeyCode>>, mut next_mode: ResMut<NextState<InteractionMode>>) {
    if let Some((_, mode)) = MODE_KEYS.iter().find(|(key, _)| keys.just_pressed(*key)) {
        next_mode.set(*mode);
    }
}

fn toggle_debug_overlay(keys: Res<ButtonInput<KeyCode>>, mut overlay: ResMut<DebugOverlay>) {
    if keys.just_pressed(KeyCode::Space) {
        overlay.0 = !overlay.0;
    }
}

fn reset_scene(
    keys: Res<ButtonInput<KeyCode>>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    material: Res<SceneMaterial>,
    mut scene: ResMut<JellyScene>,
) {
    if !keys.just_pressed(KeyCode::KeyR) {
        return;
    }
    let mut backend = BevyMeshBackend {
        commands: &mut commands,
        meshes: &mut meshes,
        material: material.0.clone(),
    };
    for mesh in scene.0.reset() {
        backend.release(mesh);
    }
}

fn drag(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut scene: ResMut<JellyScene>,
) {
    if buttons.just_released(MouseButton::Left) {
        scene.0.end_drag();
        return;
    }
    let Some(point) = cursor_world_position(&windows, &cameras) else {
        return;
    };
    if buttons.just_pressed(MouseButton::Left) {
        scene.0.begin_drag(point);
    } else if buttons.pressed(MouseButton::Left) {
        scene.0.drag_to(point);
    }
}

fn release_drag(mut scene: ResMut<JellyScene>) {
    scene.0.end_drag();
}

fn spawn(
    buttons: Res<ButtonInput<MouseButton>>,
    mode: Res<State<InteractionMode>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    rigid_material: Res<RigidMaterial>,
    mut rng: ResMut<GlobalRng>,
    mut scene: ResMut<JellyScene>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let Some(point) = cursor_world_position(&windows, &cameras) else {
        return;
    };
    let rigid = match mode.get() {
        InteractionMode::SpawnRectangles => {
            scene.0.spawn(SpawnRequest::random_rectangle(point, &mut rng.0));
            return;
        }
        InteractionMode::SpawnCircles => {
            scene.0.spawn(SpawnRequest::random_circle(point, &mut rng.0));
            return;
        }
        InteractionMode::SpawnRigidRectangles => {
            RigidBodyRequest::random_rectangle(point, &mut rng.0)
        }
        InteractionMode::SpawnRigidCircles => RigidBodyRequest::random_circle(point, &mut rng.0),
        InteractionMode::Drag => return,
    };
    if let Some(body) = scene.0.spawn_rigid(rigid) {
        let material = rigid_material.0.clone();
        spawn_rigid_sprite(&mut commands, &mut meshes, material, scene.0.world(), body);
    }
}
