use glam::Vec3;
use prism_common::CameraRig;
use std::f32::consts::PI;

/// Damped orbit controls around the rig's target.
///
/// Pointer drags feed angular velocity, `update` integrates and decays it and
/// writes the new eye back into the rig. Orbit motion lives outside the
/// animation kernel and is disabled while the cube is grabbed or a camera
/// flight owns the eye.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitControls {
    pub enabled: bool,
    /// Fraction of the pending velocity applied (and removed) per update.
    pub damping: f32,
    /// Radians per pixel of drag.
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    azimuth_velocity: f32,
    polar_velocity: f32,
    zoom_scale: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            enabled: true,
            damping: 0.1,
            rotate_speed: 0.005,
            zoom_speed: 0.95,
            min_distance: 3.0,
            max_distance: 50.0,
            azimuth_velocity: 0.0,
            polar_velocity: 0.0,
            zoom_scale: 1.0,
        }
    }
}

const POLAR_EPS: f32 = 1e-3;

impl OrbitControls {
    /// Queue a drag of `dx`, `dy` pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        if !self.enabled {
            return;
        }
        self.azimuth_velocity -= dx * self.rotate_speed;
        self.polar_velocity -= dy * self.rotate_speed;
    }

    /// Queue a zoom; positive `steps` move toward the target.
    pub fn zoom(&mut self, steps: f32) {
        if !self.enabled {
            return;
        }
        self.zoom_scale *= self.zoom_speed.powf(steps);
    }

    /// Drop any motion still pending.
    pub fn stop(&mut self) {
        self.azimuth_velocity = 0.0;
        self.polar_velocity = 0.0;
        self.zoom_scale = 1.0;
    }

    pub fn is_settled(&self) -> bool {
        self.azimuth_velocity.abs() < 1e-5
            && self.polar_velocity.abs() < 1e-5
            && (self.zoom_scale - 1.0).abs() < 1e-5
    }

    /// Apply one damped step of pending motion to `rig`. Returns whether
    /// the eye moved.
    pub fn update(&mut self, rig: &mut CameraRig) -> bool {
        if !self.enabled {
            self.stop();
            return false;
        }
        if self.is_settled() {
            return false;
        }

        let offset = rig.eye - rig.target;
        let radius = offset.length();
        if radius < f32::EPSILON {
            self.stop();
            return false;
        }
        let mut azimuth = offset.x.atan2(offset.z);
        let mut polar = (offset.y / radius).clamp(-1.0, 1.0).acos();

        azimuth += self.azimuth_velocity * self.damping;
        polar = (polar + self.polar_velocity * self.damping).clamp(POLAR_EPS, PI - POLAR_EPS);
        let zoom = 1.0 + (self.zoom_scale - 1.0) * self.damping;
        let radius = self.zoomed_radius(radius, zoom);

        rig.eye = rig.target
            + Vec3::new(
                radius * polar.sin() * azimuth.sin(),
                radius * polar.cos(),
                radius * polar.sin() * azimuth.cos(),
            );

        self.azimuth_velocity *= 1.0 - self.damping;
        self.polar_velocity *= 1.0 - self.damping;
        self.zoom_scale = 1.0 + (self.zoom_scale - 1.0) * (1.0 - self.damping);
        true
    }

    /// Limits only stop a zoom moving further past them. An eye left out of
    /// range by something else (a camera flight) keeps its distance.
    fn zoomed_radius(&self, radius: f32, zoom: f32) -> f32 {
        let zoomed = radius * zoom;
        if zoom < 1.0 {
            zoomed.max(self.min_distance.min(radius))
        } else if zoom > 1.0 {
            zoomed.min(self.max_distance.max(radius))
        } else {
            radius
        }
    }
}
