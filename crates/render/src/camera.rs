use glam::{Mat4, Vec3, Vec4};
use prism_common::CameraRig;

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y: 75.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Projection {
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }
}

/// A camera rig combined with a projection: everything needed to go between
/// world space and normalized device coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub rig: CameraRig,
    pub projection: Projection,
}

impl PerspectiveCamera {
    pub fn new(rig: CameraRig, projection: Projection) -> Self {
        Self { rig, projection }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.rig.eye, self.rig.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection.matrix()
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World position of `ndc.xy` at depth `ndc.z`, where 0 is the near plane
    /// and 1 the far plane.
    pub fn unproject(&self, ndc: Vec3) -> Vec3 {
        let inv = self.view_projection().inverse();
        let p = inv * Vec4::new(ndc.x, ndc.y, ndc.z, 1.0);
        p.truncate() / p.w
    }

    /// World position projected to normalized device coordinates.
    pub fn project(&self, world: Vec3) -> Vec3 {
        self.view_projection().project_point3(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(CameraRig::default(), Projection::default())
    }

    #[test]
    fn default_projection_is_finite() {
        let vp = camera().view_projection();
        assert!(!vp.col(0).x.is_nan());
        assert!(vp.is_finite());
    }

    #[test]
    fn screen_center_unprojects_onto_view_axis() {
        let cam = camera();
        let near = cam.unproject(Vec3::new(0.0, 0.0, 0.0));
        let far = cam.unproject(Vec3::new(0.0, 0.0, 1.0));
        assert!(near.x.abs() < 1e-4 && near.y.abs() < 1e-4);
        assert!((near.z - 6.9).abs() < 1e-3);
        assert!(far.z < near.z);
    }

    #[test]
    fn project_inverts_unproject() {
        let cam = camera();
        let world = Vec3::new(0.5, -0.3, 1.0);
        let ndc = cam.project(world);
        let back = cam.unproject(ndc);
        assert!((back - world).length() < 1e-3);
    }

    #[test]
    fn viewport_sets_aspect() {
        let mut p = Projection::default();
        p.set_viewport(800, 400);
        assert_eq!(p.aspect, 2.0);
        p.set_viewport(800, 0);
        assert_eq!(p.aspect, 800.0);
    }
}
