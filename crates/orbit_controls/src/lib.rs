use bevy::{
    input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit},
    prelude::*,
};
use std::f32::consts::PI;

/// Orbit camera with damped rotate / pan / zoom around a target point.
///
/// Left drag rotates, right drag pans, the wheel zooms. Input only feeds velocities;
/// every frame a fraction `damping_factor` of the remaining motion is applied, so the
/// camera glides to a halt after the input stops.
#[derive(Component, Clone, Debug)]
#[require(Camera3d)]
pub struct OrbitControls {
    /// Input is ignored while false, the camera still settles
    pub enabled: bool,
    pub target: Vec3,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,

    radius: f32,
    /// azimuth around +Y, 0 on the +Z axis
    theta: f32,
    /// polar angle from +Y
    phi: f32,

    delta_theta: f32,
    delta_phi: f32,
    pan_offset: Vec3,
    zoom_scale: f32,
}

/// Keeps the camera off the poles where `look_at` flips
const POLE_EPSILON: f32 = 1e-6;

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            enabled: true,
            target: Vec3::ZERO,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            radius: 1.0,
            theta: 0.0,
            phi: PI / 2.0,
            delta_theta: 0.0,
            delta_phi: 0.0,
            pan_offset: Vec3::ZERO,
            zoom_scale: 1.0,
        }
    }
}

impl OrbitControls {
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        let mut controls = Self {
            target,
            ..default()
        };
        controls.set_offset(eye - target);
        controls
    }

    fn set_offset(&mut self, offset: Vec3) {
        self.radius = offset.length();
        if self.radius == 0.0 {
            return;
        }
        self.theta = f32::atan2(offset.x, offset.z);
        self.phi = (offset.y / self.radius).clamp(-1.0, 1.0).acos();
    }

    pub fn distance(&self) -> f32 {
        self.radius
    }

    pub fn eye(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        self.target
            + self.radius
                * vec3(
                    sin_phi * self.theta.sin(),
                    self.phi.cos(),
                    sin_phi * self.theta.cos(),
                )
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.eye()).looking_at(self.target, Vec3::Y)
    }

    /// Queues a rotation from a pointer drag of `delta` pixels in a viewport `viewport_height` pixels tall.
    pub fn rotate(&mut self, delta: Vec2, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        self.delta_theta -= 2.0 * PI * delta.x / viewport_height * self.rotate_speed;
        self.delta_phi -= 2.0 * PI * delta.y / viewport_height * self.rotate_speed;
    }

    /// Queues a pan of the target; `right` and `up` are the camera's axes in world space.
    pub fn pan(&mut self, delta: Vec2, viewport_height: f32, fov: f32, right: Vec3, up: Vec3) {
        if viewport_height <= 0.0 {
            return;
        }
        // world units covered by one pixel at the target's depth
        let units_per_pixel = 2.0 * self.radius * (fov / 2.0).tan() / viewport_height;
        self.pan_offset += (-delta.x * right + delta.y * up) * units_per_pixel * self.pan_speed;
    }

    /// Queues a zoom, positive `steps` moves closer.
    pub fn zoom(&mut self, steps: f32) {
        self.zoom_scale *= 0.95f32.powf(steps * self.zoom_speed);
    }

    /// Applies one frame's share of the queued motion.
    pub fn advance(&mut self) {
        let factor = self.damping_factor;

        self.theta += self.delta_theta * factor;
        self.phi = (self.phi + self.delta_phi * factor).clamp(POLE_EPSILON, PI - POLE_EPSILON);
        self.radius = (self.radius * self.zoom_scale).clamp(self.min_distance, self.max_distance);
        self.target += self.pan_offset * factor;

        self.delta_theta *= 1.0 - factor;
        self.delta_phi *= 1.0 - factor;
        self.pan_offset *= 1.0 - factor;
        self.zoom_scale = 1.0;
    }
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrbitControlsSet;

pub struct OrbitControlsPlugin;

impl Plugin for OrbitControlsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (orbit_input_system, orbit_update_system)
                .chain()
                .in_set(OrbitControlsSet),
        );
    }
}

fn orbit_input_system(
    mut query: Query<(&Camera, &Projection, &Transform, &mut OrbitControls)>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mouse_scroll: Res<AccumulatedMouseScroll>,
) {
    for (camera, projection, transform, mut controls) in &mut query {
        if !controls.enabled {
            continue;
        }
        let Some(viewport) = camera.logical_viewport_size() else {
            continue;
        };

        let motion = mouse_motion.delta;
        if motion != Vec2::ZERO {
            if mouse_buttons.pressed(MouseButton::Left) {
                controls.rotate(motion, viewport.y);
            } else if mouse_buttons.pressed(MouseButton::Right) {
                let fov = match projection {
                    Projection::Perspective(perspective) => perspective.fov,
                    _ => PI / 4.0,
                };
                controls.pan(
                    motion,
                    viewport.y,
                    fov,
                    *transform.right(),
                    *transform.up(),
                );
            }
        }

        let steps = match mouse_scroll.unit {
            MouseScrollUnit::Line => mouse_scroll.delta.y,
            MouseScrollUnit::Pixel => mouse_scroll.delta.y / 16.0,
        };
        if steps != 0.0 {
            controls.zoom(steps);
        }
    }
}

fn orbit_update_system(mut query: Query<(&mut Transform, &mut OrbitControls)>) {
    for (mut transform, mut controls) in &mut query {
        controls.advance();
        *transform = controls.transform();
    }
}
