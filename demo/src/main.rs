use crate::{
    debug_ui::DebugUIPlugin,
    interaction::InteractionPlugin,
    scene::{ScenePlugin, ScenePluginConfig},
    states::InteractionMode,
};
use bevy::{
    diagnostic::FrameTimeDiagnosticsPlugin, prelude::*, render::camera::ScalingMode,
    window::WindowResolution,
};
use rand::SeedableRng;
use soft_body::{SceneConfig, units};

mod debug_ui;
mod interaction;
mod mesh_backend;
mod scene;
mod states;
mod texture;

/// Visible area in meters.
const VIEW_SIZE: Vec2 = Vec2::new(8., 6.);

fn main() {
    let seed = rand::random::<u64>();
    let window_size = units::vec_to_pixels(VIEW_SIZE);
    App::new()
        .add_plugins((
            DefaultPlugins
                .set(ImagePlugin::default_nearest())
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Jelly".to_string(),
                        resolution: WindowResolution::new(window_size.x, window_size.y),
                        resizable: false,
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
            FrameTimeDiagnosticsPlugin {
                max_history_length: 60,
                smoothing_factor: 0.1,
            },
            DebugUIPlugin { seed },
            ScenePlugin {
                config: ScenePluginConfig {
                    scene: SceneConfig::default(),
                    bounds: VIEW_SIZE,
                    wall_thickness: 0.5,
                    texture_size: 256,
                    texture_cells: 8,
                },
            },
            InteractionPlugin,
        ))
        .add_systems(Startup, setup)
        .insert_resource(ClearColor(LinearRgba::BLACK.into()))
        .insert_resource(GlobalRng(rand::rngs::StdRng::seed_from_u64(seed)))
        .init_state::<InteractionMode>()
        .run();
}

#[derive(Resource)]
pub struct GlobalRng(pub rand::rngs::StdRng);

#[derive(Component)]
pub struct MainCamera;

fn setup(mut commands: Commands) {
    commands.spawn((
        MainCamera,
        Camera2d,
        Projection::from(OrthographicProjection {
            // The whole view height in meters, one world unit per meter.
            scaling_mode: ScalingMode::FixedVertical {
                viewport_height: VIEW_SIZE.y,
            },
            ..OrthographicProjection::default_2d()
        }),
        Transform::from_xyz(VIEW_SIZE.x / 2., VIEW_SIZE.y / 2., 0.),
    ));
}
