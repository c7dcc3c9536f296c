use super::GalaxyParameters;
use bevy::color::Mix;
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

/// Per-particle attribute arrays for one generated galaxy.
/// Index `i` refers to the same particle in every array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GalaxyBuffers {
    /// Base positions on the branch rays, jitter excluded
    pub positions: Vec<Vec3>,
    /// Linear RGB
    pub colors: Vec<Vec3>,
    pub scales: Vec<f32>,
    /// Signed jitter, added after the spin rotation in the vertex shader
    pub random_offsets: Vec<Vec3>,
}

impl GalaxyBuffers {
    fn with_capacity(count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(count),
            colors: Vec::with_capacity(count),
            scales: Vec::with_capacity(count),
            random_offsets: Vec::with_capacity(count),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Builds the particle cloud for `params`.
///
/// Shape is deterministic (particles are dealt round-robin onto `branches` evenly spaced rays),
/// detail is drawn from `rng`: orbital radius, jitter magnitude and sign per axis, and point scale.
///
/// Panics if `params.branches` is zero.
pub fn generate<R: Rng + ?Sized>(params: &GalaxyParameters, rng: &mut R) -> GalaxyBuffers {
    assert!(params.branches > 0, "a galaxy needs at least one branch");

    let count = params.count as usize;
    let mut buffers = GalaxyBuffers::with_capacity(count);

    let inside = LinearRgba::from(params.inside_color);
    let outside = LinearRgba::from(params.outside_color);

    for i in 0..count {
        let radius = rng.random::<f32>() * params.radius;
        let angle = branch_angle(i, params.branches);

        buffers
            .positions
            .push(vec3(angle.cos() * radius, 0.0, angle.sin() * radius));

        // pow() needs a non-negative base, the sign is drawn separately
        let mut jitter_axis = || {
            let magnitude = rng.random::<f32>().powf(params.randomness_power);
            let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
            magnitude * sign * params.randomness * radius
        };
        let x = jitter_axis();
        let y = jitter_axis();
        let z = jitter_axis();
        buffers.random_offsets.push(vec3(x, y, z));

        let t = if params.radius > 0.0 {
            (radius / params.radius).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let mixed = inside.mix(&outside, t);
        buffers
            .colors
            .push(vec3(mixed.red, mixed.green, mixed.blue));

        buffers.scales.push(rng.random::<f32>());
    }

    buffers
}

/// Angle of the branch particle `index` is dealt onto.
pub fn branch_angle(index: usize, branches: u32) -> f32 {
    let branch = (index % branches as usize) as f32;
    branch / branches as f32 * TAU
}
