use bevy::prelude::*;

/// Parameters the galaxy is generated from.
///
/// Edited through the panel; any committed change bumps `generation`,
/// which is what the spawner watches to rebuild the point cloud.
#[derive(Resource, Clone, PartialEq, Debug)]
pub struct GalaxyParameters {
    pub generation: i32,

    pub count: u32,
    /// Carried for the panel, rendered point size comes from `RenderSettings`
    pub size: f32,
    pub radius: f32,
    pub branches: u32,
    /// Only read by the vertex shader
    pub spin: f32,
    pub randomness: f32,
    pub randomness_power: f32,
    pub inside_color: Srgba,
    pub outside_color: Srgba,
}

impl Default for GalaxyParameters {
    fn default() -> Self {
        Self {
            generation: 1,
            count: 200_000,
            size: 0.005,
            radius: 5.0,
            branches: 3,
            spin: 1.0,
            randomness: 0.5,
            randomness_power: 3.0,
            inside_color: Srgba::rgb_u8(0xff, 0x60, 0x30),
            outside_color: Srgba::rgb_u8(0x1b, 0x39, 0x84),
        }
    }
}

impl GalaxyParameters {
    pub const MIN: Self = Self {
        generation: 0,
        count: 100,
        size: 0.001,
        radius: 0.01,
        branches: 2,
        spin: -5.0,
        randomness: 0.0,
        randomness_power: 1.0,
        inside_color: Srgba::BLACK,
        outside_color: Srgba::BLACK,
    };
    pub const MAX: Self = Self {
        generation: 0,
        count: 1_000_000,
        size: 0.1,
        radius: 20.0,
        branches: 20,
        spin: 5.0,
        randomness: 2.0,
        randomness_power: 10.0,
        inside_color: Srgba::WHITE,
        outside_color: Srgba::WHITE,
    };
    /// Slider increments, colors are unused
    pub const STEP: Self = Self {
        generation: 0,
        count: 100,
        size: 0.001,
        radius: 0.01,
        branches: 1,
        spin: 0.001,
        randomness: 0.001,
        randomness_power: 0.001,
        inside_color: Srgba::NONE,
        outside_color: Srgba::NONE,
    };

    /// Pulls every numeric field into the panel's range, keeps colors and generation.
    pub fn clamped(&self) -> Self {
        let (min, max) = (Self::MIN, Self::MAX);
        Self {
            count: self.count.clamp(min.count, max.count),
            size: self.size.clamp(min.size, max.size),
            radius: self.radius.clamp(min.radius, max.radius),
            branches: self.branches.clamp(min.branches, max.branches),
            spin: self.spin.clamp(min.spin, max.spin),
            randomness: self.randomness.clamp(min.randomness, max.randomness),
            randomness_power: self
                .randomness_power
                .clamp(min.randomness_power, max.randomness_power),
            ..self.clone()
        }
    }

    /// Same values, but keeping this resource's generation counter.
    pub fn apply_values(&mut self, values: &GalaxyParameters) {
        let generation = self.generation;
        *self = values.clone();
        self.generation = generation;
    }

    /// Equality ignoring `generation`
    pub fn same_values(&self, other: &GalaxyParameters) -> bool {
        *self
            == GalaxyParameters {
                generation: self.generation,
                ..other.clone()
            }
    }
}

#[derive(Resource)]
struct GalaxyParametersOld(GalaxyParameters);

impl Default for GalaxyParametersOld {
    fn default() -> Self {
        Self(GalaxyParameters {
            generation: -1,
            ..default()
        })
    }
}

pub struct GalaxyConfigPlugin;

impl Plugin for GalaxyConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GalaxyParameters>()
            .init_resource::<GalaxyParametersOld>()
            .configure_sets(Update, (GalaxySet::Configure, GalaxySet::Spawn).chain())
            .add_systems(Update, apply_ui_updates.in_set(GalaxySet::Configure));
    }
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GalaxySet {
    /// Panel edits and generation bookkeeping
    Configure,
    /// Rebuilding the point cloud
    Spawn,
}

fn apply_ui_updates(
    mut parameters_old: ResMut<GalaxyParametersOld>,
    mut parameters: ResMut<GalaxyParameters>,
) {
    if !parameters.is_changed() || *parameters == parameters_old.0 {
        return;
    }
    // a generation moved by someone else (the Regenerate button) is taken as is
    if !parameters.same_values(&parameters_old.0) {
        parameters.generation += 1;
    }
    debug!(
        "Galaxy parameters committed, generation {}",
        parameters.generation
    );
    parameters_old.0 = parameters.clone();
}
