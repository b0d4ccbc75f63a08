use bevy::color::palettes;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

use crate::scene::{JellyScene, SceneSet};
use crate::states::InteractionMode;

#[derive(Copy, Clone)]
pub struct DebugUIPlugin {
    pub seed: u64,
}
impl Plugin for DebugUIPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Seed(self.seed));
        app.add_systems(PreStartup, setup)
            .add_systems(Update, update_fps)
            .add_systems(Update, update_counts.after(SceneSet::Render))
            .add_systems(Update, update_mode_text.run_if(state_changed::<InteractionMode>));
    }
}

#[derive(Resource, Copy, Clone)]
struct Seed(u64);

#[derive(Component)]
struct FpsText;

#[derive(Component)]
struct SeedText;

#[derive(Component)]
struct ModeText;

#[derive(Component)]
struct SoftBodyText;

#[derive(Component)]
struct RigidBodyText;

#[derive(Component)]
struct PhysicsBodyText;

#[derive(Component)]
struct JointText;

fn update_fps(
    bevy_diagnostics: Res<DiagnosticsStore>,
    mut fps_text_query: Query<&mut Text, With<FpsText>>,
) {
    let Some(value) = bevy_diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
    else {
        return;
    };
    if let Ok(mut text) = fps_text_query.single_mut() {
        **text = format!("{value:.0}");
    }
}

fn update_mode_text(
    mut mode_text_query: Query<&mut Text, With<ModeText>>,
    mode: Res<State<InteractionMode>>,
) {
    if let Ok(mut text) = mode_text_query.single_mut() {
        **text = mode.to_string();
    }
}

fn update_counts(
    scene: Res<JellyScene>,
    mut texts: ParamSet<(
        Query<&mut Text, With<SoftBodyText>>,
        Query<&mut Text, With<RigidBodyText>>,
        Query<&mut Text, With<PhysicsBodyText>>,
        Query<&mut Text, With<JointText>>,
    )>,
) {
    let world = scene.0.world();
    if let Ok(mut text) = texts.p0().single_mut() {
        **text = scene.0.bodies().len().to_string();
    }
    if let Ok(mut text) = texts.p1().single_mut() {
        **text = scene.0.rigid_bodies().len().to_string();
    }
    if let Ok(mut text) = texts.p2().single_mut() {
        **text = world.body_count().to_string();
    }
    if let Ok(mut text) = texts.p3().single_mut() {
        **text = world.total_joint_count().to_string();
    }
}

fn label(text: impl Into<String>) -> impl Bundle {
    (
        Text::new(text),
        TextFont {
            font_size: 12.0,
            ..default()
        },
    )
}

/// A label on the left and a gold value on the right.
fn stat_row(name: &'static str, value: String, marker: impl Component) -> impl Bundle {
    (
        Node {
            width: Val::Percent(100.),
            ..Default::default()
        },
        children![
            label(format!("{name}: ")),
            (
                Node {
                    margin: UiRect::left(Val::Auto),
                    ..Default::default()
                },
                Text::new(value),
                TextFont {
                    font_size: 12.0,
                    ..Default::default()
                },
                TextColor(palettes::css::GOLD.into()),
                marker
            )
        ],
    )
}

fn section() -> impl Bundle {
    (
        Node {
            padding: UiRect::new(Val::Px(0.), Val::Px(0.), Val::Px(5.), Val::Px(5.)),
            border: UiRect::bottom(Val::Px(1.)),
            flex_direction: FlexDirection::Column,
            ..Default::default()
        },
        BorderColor(LinearRgba::new(0.2, 0.2, 0.2, 0.8).into()),
    )
}

fn setup(mut commands: Commands, seed: Res<Seed>) {
    commands.spawn((
        Node {
            width: Val::Px(200.),
            height: Val::Auto,
            margin: UiRect::with_left(UiRect::all(Val::Px(10.)), Val::Auto),
            padding: UiRect::all(Val::Px(10.)),
            flex_direction: FlexDirection::Column,
            ..Default::default()
        },
        BackgroundColor(LinearRgba::new(0.01, 0.01, 0.01, 0.8).into()),
        children![
            (
                section(),
                children![
                    stat_row("FPS", String::new(), FpsText),
                    stat_row("Seed", seed.0.to_string(), SeedText),
                    stat_row("Mode", InteractionMode::default().to_string(), ModeText),
                ]
            ),
            (
                section(),
                children![
                    stat_row("Soft bodies", String::new(), SoftBodyText),
                    stat_row("Rigid bodies", String::new(), RigidBodyText),
                    stat_row("Physics bodies", String::new(), PhysicsBodyText),
                    stat_row("Joints", String::new(), JointText),
                ]
            ),
            (
                Node {
                    padding: UiRect::top(Val::Px(5.)),
                    flex_direction: FlexDirection::Column,
                    ..Default::default()
                },
                children![
                    label("1: drag  2: rectangles  3: circles"),
                    label("4: rigid boxes  5: rigid circles"),
                    label("R: reset  Space: joints"),
                ]
            ),
        ],
    ));
}
