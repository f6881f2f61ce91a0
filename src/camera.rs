use std::f32::consts::{PI, TAU};

use glam::{Mat4, Vec3};
use serde::Deserialize;

use crate::scene::Lens;
use crate::types::CameraUniform;

pub const INITIAL_POSITION: Vec3 = Vec3::new(0.0, 0.0, 8.0);
pub const AUTO_ROTATE_SPEED: f32 = 0.5;
pub const DAMPING_FACTOR: f32 = 0.05;

const POLAR_EPSILON: f32 = 1e-6;

/// Orbit behaviour; zoom and pan are not settings because they are never enabled
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrbitSettings {
    pub auto_rotate: bool,
    /// 0.5 means one revolution every 120 seconds
    pub auto_rotate_speed: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            auto_rotate: true,
            auto_rotate_speed: AUTO_ROTATE_SPEED,
            enable_damping: true,
            damping_factor: DAMPING_FACTOR,
            rotate_speed: 1.0,
        }
    }
}

impl OrbitSettings {
    /// Radians per second of auto-rotation
    pub fn angular_rate(&self) -> f32 {
        TAU / 60.0 * self.auto_rotate_speed
    }
}

/// Camera that orbits the origin on a sphere of fixed radius
///
/// Auto-rotates about the vertical axis while idle. A drag with the primary button
/// rotates it manually and pauses auto-rotation until release.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    target: Vec3,
    radius: f32,
    /// Azimuth around +Y, measured from +Z towards +X
    theta: f32,
    /// Polar angle from +Y
    phi: f32,
    delta_theta: f32,
    delta_phi: f32,
    dragging: bool,
    last_pointer: Option<(f32, f32)>,
    settings: OrbitSettings,
    lens: Lens,
}

impl OrbitCamera {
    pub fn new(position: Vec3, lens: Lens, settings: OrbitSettings) -> Self {
        let target = Vec3::ZERO;
        let offset = position - target;
        let radius = offset.length();
        let (theta, phi) = if radius > 0.0 {
            (offset.x.atan2(offset.z), (offset.y / radius).clamp(-1.0, 1.0).acos())
        } else {
            (0.0, PI / 2.0)
        };

        Self {
            target,
            radius,
            theta,
            phi,
            delta_theta: 0.0,
            delta_phi: 0.0,
            dragging: false,
            last_pointer: None,
            settings,
            lens,
        }
    }

    pub fn with_lens(lens: Lens, settings: OrbitSettings) -> Self {
        Self::new(INITIAL_POSITION, lens, settings)
    }

    /// Advance by `delta_time` seconds
    pub fn update(&mut self, delta_time: f32) {
        if self.settings.auto_rotate && !self.dragging {
            self.delta_theta -= self.settings.angular_rate() * delta_time;
        }

        if self.settings.enable_damping {
            self.theta += self.delta_theta * self.settings.damping_factor;
            self.phi += self.delta_phi * self.settings.damping_factor;
            self.delta_theta *= 1.0 - self.settings.damping_factor;
            self.delta_phi *= 1.0 - self.settings.damping_factor;
        } else {
            self.theta += self.delta_theta;
            self.phi += self.delta_phi;
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
        }

        self.phi = self.phi.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
    }

    pub fn begin_drag(&mut self, x: f32, y: f32) {
        self.dragging = true;
        self.last_pointer = Some((x, y));
    }

    /// Pointer moved to `(x, y)`; rotation is scaled by the viewport height in the same units
    pub fn drag_to(&mut self, x: f32, y: f32, viewport_height: f32) {
        if !self.dragging || viewport_height <= 0.0 {
            return;
        }
        if let Some((last_x, last_y)) = self.last_pointer {
            let scale = TAU * self.settings.rotate_speed / viewport_height;
            self.delta_theta -= (x - last_x) * scale;
            self.delta_phi -= (y - last_y) * scale;
        }
        self.last_pointer = Some((x, y));
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
        self.last_pointer = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn theta(&self) -> f32 {
        self.theta
    }

    pub fn phi(&self) -> f32 {
        self.phi
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn lens(&self) -> Lens {
        self.lens
    }

    pub fn settings(&self) -> &OrbitSettings {
        &self.settings
    }

    pub fn position(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        self.target
            + self.radius
                * Vec3::new(
                    sin_phi * self.theta.sin(),
                    self.phi.cos(),
                    sin_phi * self.theta.cos(),
                )
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(
            self.lens.fov_y_degrees.to_radians(),
            aspect.max(f32::EPSILON),
            self.lens.near,
            self.lens.far,
        )
    }

    pub fn to_uniform(&self, width: u32, height: u32, time: f32) -> CameraUniform {
        let aspect = width as f32 / height.max(1) as f32;
        let mut uniform = CameraUniform::new(
            self.view_matrix(),
            self.projection_matrix(aspect),
            self.position(),
            [width as f32, height as f32],
        );
        uniform.time = time;
        uniform
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn undamped() -> OrbitSettings {
        OrbitSettings {
            enable_damping: false,
            ..OrbitSettings::default()
        }
    }

    #[test]
    fn test_initial_spherical_coordinates() {
        let camera = OrbitCamera::with_lens(Lens::default(), OrbitSettings::default());
        assert!((camera.radius() - 8.0).abs() < 1e-6);
        assert!(camera.theta().abs() < 1e-6);
        assert!((camera.phi() - PI / 2.0).abs() < 1e-6);
        assert!((camera.position() - INITIAL_POSITION).length() < 1e-5);
    }

    #[test]
    fn test_angular_rate() {
        let rate = OrbitSettings::default().angular_rate();
        assert!((rate - TAU / 120.0).abs() < 1e-7);
    }

    #[test]
    fn test_polar_clamped() {
        let mut camera = OrbitCamera::with_lens(Lens::default(), undamped());
        camera.begin_drag(0.0, 0.0);
        camera.drag_to(0.0, 10_000.0, 100.0);
        camera.update(0.0);
        assert!(camera.phi() >= POLAR_EPSILON);
        assert!(camera.position().y <= 8.0);
    }

    #[test]
    fn test_drag_ignored_without_button() {
        let mut camera = OrbitCamera::with_lens(Lens::default(), undamped());
        camera.drag_to(50.0, 0.0, 100.0);
        camera.update(0.0);
        assert!(camera.theta().abs() < 1e-6);
    }

    #[test]
    fn test_uniform_carries_viewport() {
        let camera = OrbitCamera::with_lens(Lens::default(), OrbitSettings::default());
        let uniform = camera.to_uniform(800, 600, 1.5);
        assert_eq!(uniform.viewport, [800.0, 600.0]);
        assert_eq!(uniform.time, 1.5);
        assert_eq!(uniform.position, camera.position().to_array());
    }
}
