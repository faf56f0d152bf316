use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Handle to an externally owned scene/camera pair.
///
/// The animation core only ever compares and swaps these; the scene contents
/// (lights, geometry, materials) live with whoever renders them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SceneId(pub Uuid);

impl SceneId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for log lines and debug output.
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for SceneId {
    fn default() -> Self {
        Self::new()
    }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

/// Camera placement: where the eye sits and which point it orbits/looks at.
///
/// Projection parameters are a rendering concern and live in `prism-render`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraRig {
    pub eye: Vec3,
    pub target: Vec3,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 7.0),
            target: Vec3::ZERO,
        }
    }
}

impl CameraRig {
    /// Unit vector from the eye toward the target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or(Vec3::NEG_Z)
    }

    pub fn distance(&self) -> f32 {
        self.eye.distance(self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_id_uniqueness() {
        let a = SceneId::new();
        let b = SceneId::new();
        assert_ne!(a, b);
        assert_eq!(a.short().len(), 8);
    }

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn default_rig_looks_down_negative_z() {
        let rig = CameraRig::default();
        assert_eq!(rig.eye.z, 7.0);
        assert!((rig.forward() - Vec3::NEG_Z).length() < 1e-6);
        assert_eq!(rig.distance(), 7.0);
    }

    #[test]
    fn degenerate_rig_has_finite_forward() {
        let rig = CameraRig {
            eye: Vec3::ONE,
            target: Vec3::ONE,
        };
        assert!(rig.forward().is_finite());
    }
}
