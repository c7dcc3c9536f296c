use crate::prelude::*;
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

mod galaxy_material;
mod galaxy_mesh;
#[cfg_attr(not(test), allow(dead_code))]
pub mod spin;

pub use galaxy_material::GalaxyMaterial;
pub use galaxy_mesh::galaxy_mesh;

pub struct GraphicsPlugin;

impl Plugin for GraphicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MaterialPlugin::<GalaxyMaterial>::default())
            .init_resource::<RenderSettings>()
            .add_systems(
                Update,
                (update_material_size, update_material_time).after(GalaxySet::Spawn),
            );
    }
}

/// Sizing of the rendered points, independent of the galaxy parameters
#[derive(Resource, Clone, Debug)]
pub struct RenderSettings {
    /// Point diameter in logical pixels at unit view depth and unit scale
    pub point_size: f32,
    /// Upper bound on the window's pixel ratio
    pub max_pixel_ratio: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            point_size: 30.0,
            max_pixel_ratio: 2.0,
        }
    }
}

impl RenderSettings {
    pub fn base_size(&self, scale_factor: f32) -> f32 {
        self.point_size * scale_factor.min(self.max_pixel_ratio)
    }
}

/// Marks the entity drawing the current galaxy
#[derive(Component)]
pub struct GalaxyPoints;

fn update_material_time(
    time: Res<Time>,
    galaxy: Query<&MeshMaterial3d<GalaxyMaterial>, With<GalaxyPoints>>,
    mut materials: ResMut<Assets<GalaxyMaterial>>,
) {
    let Ok(galaxy) = galaxy.single() else {
        return;
    };
    let Some(mat) = materials.get_mut(&galaxy.0) else {
        return;
    };
    mat.uniforms.time = time.elapsed_secs();
}

/// Keeps the point size in step with the window's pixel ratio
fn update_material_size(
    mut resized: EventReader<WindowResized>,
    windows: Query<&Window, With<PrimaryWindow>>,
    settings: Res<RenderSettings>,
    galaxy: Query<&MeshMaterial3d<GalaxyMaterial>, With<GalaxyPoints>>,
    mut materials: ResMut<Assets<GalaxyMaterial>>,
) {
    if resized.read().last().is_none() && !settings.is_changed() {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok(galaxy) = galaxy.single() else {
        return;
    };
    let Some(mat) = materials.get_mut(&galaxy.0) else {
        return;
    };

    let size = settings.base_size(window.scale_factor());
    if mat.uniforms.size != size {
        debug!("Window resized, point size now {size}");
        mat.uniforms.size = size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_ratio_is_capped() {
        let settings = RenderSettings::default();
        assert_eq!(settings.base_size(1.0), 30.0);
        assert_eq!(settings.base_size(1.5), 45.0);
        assert_eq!(settings.base_size(3.0), 60.0);
    }
}
