use super::{generate, GalaxyParameters, GalaxySet};
use crate::graphics::{galaxy_mesh, GalaxyMaterial, GalaxyPoints, RenderSettings};
use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;
use bevy::render::view::NoFrustumCulling;
use bevy::window::PrimaryWindow;

pub struct SpawnGalaxyPlugin;

impl Plugin for SpawnGalaxyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GalaxySpawningControl>()
            .add_systems(Update, regenerate_galaxy.in_set(GalaxySet::Spawn));
    }
}

/// The one live generation: its scene entity and the assets derived from its buffers
#[derive(Resource)]
pub struct GalaxySpawningControl {
    generation: i32,
    entity: Option<Entity>,
    mesh: Option<Handle<Mesh>>,
    material: Option<Handle<GalaxyMaterial>>,
    particle_count: usize,
}

impl Default for GalaxySpawningControl {
    fn default() -> Self {
        Self {
            generation: -1,
            entity: None,
            mesh: None,
            material: None,
            particle_count: 0,
        }
    }
}

impl GalaxySpawningControl {
    pub fn particle_count(&self) -> usize {
        self.particle_count
    }
}

/// Tears down the previous galaxy and builds a new one whenever the parameters' generation moves
fn regenerate_galaxy(
    mut commands: Commands,
    parameters: Res<GalaxyParameters>,
    settings: Res<RenderSettings>,
    time: Res<Time>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut control: ResMut<GalaxySpawningControl>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<GalaxyMaterial>>,
) {
    if control.generation == parameters.generation {
        return;
    }

    // cleanup the old galaxy before anything new exists
    if let Some(entity) = control.entity.take() {
        commands.entity(entity).despawn();
    }
    if let Some(mesh) = control.mesh.take() {
        meshes.remove(&mesh);
    }
    if let Some(material) = control.material.take() {
        materials.remove(&material);
    }

    if parameters.branches == 0 {
        warn!("Galaxy parameters have no branches, nothing to generate");
        control.generation = parameters.generation;
        control.particle_count = 0;
        return;
    }

    let buffers = generate(&parameters, &mut rand::rng());
    info!(
        "Regenerating galaxy: {} particles across {} branches",
        buffers.len(),
        parameters.branches
    );

    let scale_factor = windows.single().map_or(1.0, |window| window.scale_factor());
    let mesh = meshes.add(galaxy_mesh(&buffers));
    let material = materials.add(GalaxyMaterial::new(
        settings.base_size(scale_factor),
        parameters.spin,
        time.elapsed_secs(),
    ));

    let entity = commands
        .spawn((
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::IDENTITY,
            Visibility::Inherited,
            GalaxyPoints,
            NoFrustumCulling,
            NotShadowCaster,
        ))
        .id();

    control.generation = parameters.generation;
    control.entity = Some(entity);
    control.mesh = Some(mesh);
    control.material = Some(material);
    control.particle_count = buffers.len();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::galaxy::GalaxyConfigPlugin;
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Mesh>()
            .init_asset::<GalaxyMaterial>()
            .init_resource::<RenderSettings>()
            .add_plugins((GalaxyConfigPlugin, SpawnGalaxyPlugin));
        app.world_mut().resource_mut::<GalaxyParameters>().count = 500;
        app
    }

    fn live_galaxies(app: &mut App) -> usize {
        let mut query = app
            .world_mut()
            .query_filtered::<Entity, With<GalaxyPoints>>();
        query.iter(app.world()).count()
    }

    #[test]
    fn spawns_one_galaxy_on_startup() {
        let mut app = app();
        app.update();

        assert_eq!(live_galaxies(&mut app), 1);
        assert_eq!(app.world().resource::<Assets<Mesh>>().len(), 1);
        assert_eq!(app.world().resource::<Assets<GalaxyMaterial>>().len(), 1);
        assert_eq!(
            app.world().resource::<GalaxySpawningControl>().particle_count(),
            500
        );
    }

    #[test]
    fn regenerations_do_not_accumulate() {
        let mut app = app();
        app.update();

        for branches in 2..12 {
            app.world_mut().resource_mut::<GalaxyParameters>().branches = branches;
            app.update();

            assert_eq!(live_galaxies(&mut app), 1);
            assert_eq!(app.world().resource::<Assets<Mesh>>().len(), 1);
            assert_eq!(app.world().resource::<Assets<GalaxyMaterial>>().len(), 1);
        }
    }

    #[test]
    fn unchanged_parameters_keep_the_galaxy() {
        let mut app = app();
        app.update();
        let first = app.world().resource::<GalaxySpawningControl>().entity;

        app.update();
        app.update();
        assert_eq!(app.world().resource::<GalaxySpawningControl>().entity, first);
    }

    #[test]
    fn new_count_is_picked_up() {
        let mut app = app();
        app.update();

        app.world_mut().resource_mut::<GalaxyParameters>().count = 1_200;
        app.update();

        let control = app.world().resource::<GalaxySpawningControl>();
        assert_eq!(control.particle_count(), 1_200);
        let mesh = control.mesh.clone().unwrap();
        let meshes = app.world().resource::<Assets<Mesh>>();
        assert_eq!(meshes.get(&mesh).unwrap().count_vertices(), 4 * 1_200);
    }

    #[test]
    fn regenerated_material_starts_at_the_current_time() {
        let mut app = app();
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(250)));
        for _ in 0..5 {
            app.update();
        }

        app.world_mut().resource_mut::<GalaxyParameters>().branches = 7;
        app.update();

        let elapsed = app.world().resource::<Time>().elapsed_secs();
        assert!(elapsed > 0.0);

        let control = app.world().resource::<GalaxySpawningControl>();
        let material = control.material.clone().unwrap();
        let materials = app.world().resource::<Assets<GalaxyMaterial>>();
        assert_eq!(materials.get(&material).unwrap().uniforms.time, elapsed);
    }
}
