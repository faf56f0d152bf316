use crate::camera::{PerspectiveCamera, Projection};
use crate::scene::Scene;
use glam::{Vec2, Vec3};
use prism_common::{CameraRig, Transform};
use prism_kernel::ScenePicker;

/// A half-line in world space. `direction` is unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Ray from the near plane through `ndc` toward the far plane.
    pub fn from_camera(camera: &PerspectiveCamera, ndc: Vec2) -> Self {
        let near = camera.unproject(ndc.extend(0.0));
        let far = camera.unproject(ndc.extend(1.0));
        Self {
            origin: near,
            direction: (far - near).normalize_or(camera.rig.forward()),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance along the ray to the first intersection with a box of
    /// `half_extents` placed by `transform` (scale, then rotation, then
    /// translation). Starting inside the box yields the exit distance.
    pub fn intersect_box(&self, transform: &Transform, half_extents: Vec3) -> Option<f32> {
        let scale = transform.scale;
        if scale.abs().min_element() < f32::EPSILON {
            return None;
        }
        let inv_rot = transform.rotation.inverse();
        // Local-space ray keeps the world parameterization of t.
        let origin = (inv_rot * (self.origin - transform.position)) / scale;
        let direction = (inv_rot * self.direction) / scale;

        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;
        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            let h = half_extents[axis];
            if d.abs() < 1e-8 {
                if o < -h || o > h {
                    return None;
                }
                continue;
            }
            let t1 = (-h - o) / d;
            let t2 = (h - o) / d;
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
            if t_min > t_max {
                return None;
            }
        }

        if t_max < 0.0 {
            None
        } else if t_min >= 0.0 {
            Some(t_min)
        } else {
            Some(t_max)
        }
    }
}

/// Pointer ray caster for the scene's single target object.
///
/// Holds the projection (updated on resize) and the target's unscaled box
/// size, if the scene has a target at all; the camera rig and object
/// transform come from the kernel each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitTester {
    pub projection: Projection,
    pub half_extents: Option<Vec3>,
}

impl HitTester {
    pub fn new(projection: Projection, half_extents: Option<Vec3>) -> Self {
        Self {
            projection,
            half_extents,
        }
    }

    pub fn for_scene(projection: Projection, scene: &Scene) -> Self {
        Self::new(projection, scene.target.map(|t| t.half_extents))
    }

    /// Aim at `scene`'s target, or at nothing when it has none.
    pub fn retarget(&mut self, scene: &Scene) {
        self.half_extents = scene.target.map(|t| t.half_extents);
    }

    pub fn camera(&self, rig: &CameraRig) -> PerspectiveCamera {
        PerspectiveCamera::new(*rig, self.projection)
    }

    pub fn ray(&self, rig: &CameraRig, ndc: Vec2) -> Ray {
        Ray::from_camera(&self.camera(rig), ndc)
    }
}

impl ScenePicker for HitTester {
    fn pick(&self, camera: &CameraRig, ndc: Vec2, target: &Transform) -> Option<Vec3> {
        let half_extents = self.half_extents?;
        let ray = self.ray(camera, ndc);
        let hit = ray.intersect_box(target, half_extents).map(|t| ray.at(t));
        tracing::trace!(x = ndc.x, y = ndc.y, hit = hit.is_some(), "pointer ray");
        hit
    }

    fn unproject(&self, camera: &CameraRig, ndc: Vec3) -> Vec3 {
        self.camera(camera).unproject(ndc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    fn cube_tester() -> HitTester {
        HitTester::for_scene(Projection::default(), &Scene::crystal_room())
    }

    #[test]
    fn center_hits_front_face() {
        let hit = cube_tester()
            .pick(&CameraRig::default(), Vec2::ZERO, &Transform::default())
            .unwrap();
        assert!((hit - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-3);
    }

    #[test]
    fn corner_misses() {
        let t = cube_tester();
        assert!(t.pick(&CameraRig::default(), Vec2::new(1.0, 1.0), &Transform::default()).is_none());
        assert!(t.pick(&CameraRig::default(), Vec2::new(-0.9, 0.0), &Transform::default()).is_none());
    }

    #[test]
    fn scaled_object_is_larger() {
        let t = cube_tester();
        // Half-width at depth 5 is 5*tan(37.5 deg)*aspect; 0.3 of that is about 2.04.
        let ndc = Vec2::new(0.3, 0.0);
        assert!(t.pick(&CameraRig::default(), ndc, &Transform::default()).is_none());
        let grown = Transform {
            scale: Vec3::splat(1.25),
            ..Transform::default()
        };
        assert!(t.pick(&CameraRig::default(), ndc, &grown).is_some());
    }

    #[test]
    fn rotation_moves_the_silhouette() {
        let ray = Ray {
            origin: Vec3::new(2.5, 0.0, 10.0),
            direction: Vec3::NEG_Z,
        };
        let square = Transform::default();
        assert!(ray.intersect_box(&square, Vec3::splat(2.0)).is_none());

        // Turned 45 degrees, the vertical edge reaches out to 2*sqrt(2).
        let turned = Transform {
            rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_4),
            ..Transform::default()
        };
        let t = ray.intersect_box(&turned, Vec3::splat(2.0)).unwrap();
        let hit = ray.at(t);
        assert!(hit.z > 0.0 && hit.z < 0.5, "hit on the leading face: {hit:?}");
    }

    #[test]
    fn ray_behind_origin_misses() {
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 10.0),
            direction: Vec3::Z,
        };
        assert!(ray.intersect_box(&Transform::default(), Vec3::ONE).is_none());
    }

    #[test]
    fn ray_from_inside_reports_exit() {
        let ray = Ray {
            origin: Vec3::ZERO,
            direction: Vec3::X,
        };
        let t = ray.intersect_box(&Transform::default(), Vec3::ONE).unwrap();
        assert!((t - 1.0).abs() < 1e-6);
    }

    #[test]
    fn axis_parallel_ray_outside_slab_misses() {
        let ray = Ray {
            origin: Vec3::new(0.0, 5.0, 10.0),
            direction: Vec3::NEG_Z,
        };
        assert!(ray.intersect_box(&Transform::default(), Vec3::ONE).is_none());
    }

    #[test]
    fn degenerate_scale_never_hits() {
        let flat = Transform {
            scale: Vec3::new(1.0, 0.0, 1.0),
            ..Transform::default()
        };
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 10.0),
            direction: Vec3::NEG_Z,
        };
        assert!(ray.intersect_box(&flat, Vec3::ONE).is_none());
    }

    #[test]
    fn scene_without_target_never_hits() {
        let empty = HitTester::for_scene(Projection::default(), &Scene::empty_room());
        assert_eq!(empty.half_extents, None);
        assert!(empty.pick(&CameraRig::default(), Vec2::ZERO, &Transform::default()).is_none());

        let mut t = cube_tester();
        t.retarget(&Scene::empty_room());
        assert!(t.pick(&CameraRig::default(), Vec2::ZERO, &Transform::default()).is_none());
        t.retarget(&Scene::crystal_room());
        assert!(t.pick(&CameraRig::default(), Vec2::ZERO, &Transform::default()).is_some());
    }

    #[test]
    fn unproject_matches_camera() {
        let t = cube_tester();
        let rig = CameraRig::default();
        let p = t.unproject(&rig, Vec3::new(0.0, 0.0, 0.5));
        assert_eq!(p, t.camera(&rig).unproject(Vec3::new(0.0, 0.0, 0.5)));
    }
}
