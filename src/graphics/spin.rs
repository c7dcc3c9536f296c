//! CPU copy of the math in `galaxy_points.wgsl`, used by tests only.
//!
//! Nothing here runs at render time: the shader does. The functions follow it line for line so the
//! animation can be checked without a GPU, and the shared constants are checked against the shader
//! source. Keep both in sync.
use bevy::prelude::*;

/// Angular speed factor of the differential rotation, radians per second at unit distance.
pub const SPIN_RATE: f32 = 0.2;

/// Exponent of the radial falloff of a point's glow.
pub const GLOW_FALLOFF: f32 = 10.0;

/// Moves a particle's world-space base position to where it is drawn at `time`.
///
/// The base position is swung around the vertical axis by an angle inversely proportional to its
/// distance from the axis, so inner particles lap outer ones. Jitter is added afterwards and does
/// not rotate with the arm.
pub fn spin_position(base: Vec3, jitter: Vec3, time: f32, spin: f32) -> Vec3 {
    let distance_to_center = base.xz().length();
    if distance_to_center == 0.0 {
        return base + jitter;
    }

    let angle = f32::atan2(base.x, base.z)
        + (1.0 / distance_to_center) * time * SPIN_RATE * spin;

    vec3(
        angle.cos() * distance_to_center,
        base.y,
        angle.sin() * distance_to_center,
    ) + jitter
}

/// Point diameter in pixels, attenuated by view-space depth (`view_z` is negative in front of the camera).
pub fn point_size(base_size: f32, scale: f32, view_z: f32) -> f32 {
    base_size * scale * (1.0 / -view_z)
}

/// Brightness at `point_coord` (in [0, 1]² across the point), 1 at the center.
pub fn glow_strength(point_coord: Vec2) -> f32 {
    let distance = point_coord.distance(Vec2::splat(0.5));
    (1.0 - distance).powf(GLOW_FALLOFF)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn angle_travelled(base: Vec3, time: f32) -> f32 {
        let at_rest = spin_position(base, Vec3::ZERO, 0.0, 1.0);
        let moved = spin_position(base, Vec3::ZERO, time, 1.0);
        at_rest.xz().angle_to(moved.xz()).abs()
    }

    #[test]
    fn distance_to_axis_is_preserved() {
        let base = vec3(3.0, 0.0, -4.0);
        for time in [0.0, 1.0, 12.5] {
            let p = spin_position(base, Vec3::ZERO, time, 1.0);
            assert!((p.xz().length() - 5.0).abs() < 1e-4);
            assert_eq!(p.y, 0.0);
        }
    }

    #[test]
    fn inner_particles_spin_faster() {
        let inner = angle_travelled(vec3(0.5, 0.0, 0.0), 1.0);
        let outer = angle_travelled(vec3(4.0, 0.0, 0.0), 1.0);
        assert!((inner - 0.4).abs() < 1e-4);
        assert!((outer - 0.05).abs() < 1e-4);
    }

    #[test]
    fn spin_parameter_scales_and_reverses() {
        let base = vec3(0.0, 0.0, 2.0);
        let forward = spin_position(base, Vec3::ZERO, 1.0, 1.0);
        let backward = spin_position(base, Vec3::ZERO, 1.0, -1.0);
        let at_rest = spin_position(base, Vec3::ZERO, 1.0, 0.0);

        let ahead = at_rest.xz().angle_to(forward.xz());
        let behind = at_rest.xz().angle_to(backward.xz());
        assert!((ahead.abs() - 0.1).abs() < 1e-4);
        assert!((ahead + behind).abs() < 1e-4);
    }

    #[test]
    fn jitter_is_added_after_rotation() {
        let base = vec3(2.0, 0.0, 0.0);
        let jitter = vec3(0.0, 0.3, 0.1);
        for time in [0.0, 3.0, 40.0] {
            let plain = spin_position(base, Vec3::ZERO, time, 1.0);
            let jittered = spin_position(base, jitter, time, 1.0);
            assert!((jittered - plain - jitter).length() < 1e-5);
        }
    }

    #[test]
    fn particle_on_the_axis_stays_finite() {
        let p = spin_position(Vec3::ZERO, vec3(0.1, 0.2, 0.3), 10.0, 1.0);
        assert_eq!(p, vec3(0.1, 0.2, 0.3));
    }

    #[test]
    fn points_shrink_with_depth() {
        assert_eq!(point_size(30.0, 0.5, -1.0), 15.0);
        assert!((point_size(30.0, 0.5, -3.0) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn glow_fades_from_the_center() {
        assert_eq!(glow_strength(Vec2::splat(0.5)), 1.0);
        let edge = glow_strength(vec2(1.0, 0.5));
        assert!((edge - 0.5f32.powi(10)).abs() < 1e-7);
        assert!(glow_strength(vec2(0.6, 0.5)) > glow_strength(vec2(0.8, 0.5)));
    }

    #[test]
    fn constants_match_the_shader() {
        let shader = include_str!("../../assets/shaders/galaxy_points.wgsl");
        for line in [
            format!("const SPIN_RATE: f32 = {SPIN_RATE:?};"),
            format!("const GLOW_FALLOFF: f32 = {GLOW_FALLOFF:?};"),
        ] {
            assert!(shader.contains(&line), "shader is missing `{line}`");
        }
    }
}
