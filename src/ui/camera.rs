use bevy::{core_pipeline::tonemapping::Tonemapping, prelude::*};
use bevy_egui::EguiContexts;
use orbit_controls::{OrbitControls, OrbitControlsPlugin, OrbitControlsSet};

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(OrbitControlsPlugin)
            .insert_resource(ClearColor(Color::BLACK))
            .add_systems(Startup, spawn_camera)
            .add_systems(Update, yield_pointer_to_panel.before(OrbitControlsSet));
    }
}

fn spawn_camera(mut commands: Commands) {
    let controls = OrbitControls::looking_at(vec3(3.0, 3.0, 3.0), Vec3::ZERO);
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 75f32.to_radians(),
            near: 0.1,
            far: 100.0,
            ..default()
        }),
        // colors go out exactly as generated
        Tonemapping::None,
        controls.transform(),
        controls,
    ));
}

/// Dragging a slider shouldn't swing the camera around
fn yield_pointer_to_panel(mut contexts: EguiContexts, mut controls: Query<&mut OrbitControls>) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };
    let panel_busy = ctx.wants_pointer_input() || ctx.is_pointer_over_area();
    for mut controls in &mut controls {
        controls.enabled = !panel_busy;
    }
}
