use glam::Vec3;
use prism_common::SceneId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Color of the page behind the canvas; faded output blends toward it.
pub const PAGE_COLOR: [f32; 3] = [0.996, 0.996, 0.996];

/// Physically based parameters of the crystal cube, editable from the debug
/// panel at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrystalMaterial {
    pub base_color: [f32; 3],
    pub metalness: f32,
    pub roughness: f32,
    /// Transmission thickness; negative values disable refraction tinting.
    pub thickness: f32,
    pub env_intensity: f32,
}

impl Default for CrystalMaterial {
    fn default() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0],
            metalness: 1.0,
            roughness: 0.0,
            thickness: -1.0,
            env_intensity: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub position: Vec3,
    pub color: [f32; 3],
    pub intensity: f32,
}

/// What fills the screen behind the geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Background {
    Color([f32; 3]),
    /// The environment map once loaded, otherwise the fallback color.
    Environment { fallback: [f32; 3] },
}

impl Background {
    /// Clear color to use when no environment map is available.
    pub fn clear_color(&self) -> [f32; 3] {
        match *self {
            Self::Color(c) => c,
            Self::Environment { fallback } => fallback,
        }
    }
}

/// The interactive object: an axis-aligned box in its local space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub half_extents: Vec3,
    pub material: CrystalMaterial,
}

/// A renderable unit: lights, background and at most one target object.
///
/// The camera is not stored here; its placement is animation state.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub id: SceneId,
    pub name: String,
    pub background: Background,
    pub ambient: AmbientLight,
    pub lights: Vec<PointLight>,
    pub target: Option<SceneObject>,
}

const LIGHT_GREY: [f32; 3] = [0.867, 0.890, 0.902];

fn studio_lights() -> Vec<PointLight> {
    [-5.0, 0.0, 5.0]
        .into_iter()
        .map(|x| PointLight {
            position: Vec3::new(x, 5.0, 5.0),
            color: LIGHT_GREY,
            intensity: 1.0,
        })
        .collect()
}

impl Scene {
    /// The crystal cube (4 units on a side) under three studio lights, with
    /// the environment as backdrop.
    pub fn crystal_room() -> Self {
        Self {
            id: SceneId::new(),
            name: "crystal".into(),
            background: Background::Environment {
                fallback: PAGE_COLOR,
            },
            ambient: AmbientLight {
                color: PAGE_COLOR,
                intensity: 0.5,
            },
            lights: studio_lights(),
            target: Some(SceneObject {
                half_extents: Vec3::splat(2.0),
                material: CrystalMaterial::default(),
            }),
        }
    }

    /// Same lighting, no object: where the fly-in leads.
    pub fn empty_room() -> Self {
        Self {
            id: SceneId::new(),
            name: "beyond".into(),
            background: Background::Color(PAGE_COLOR),
            ambient: AmbientLight {
                color: PAGE_COLOR,
                intensity: 0.5,
            },
            lights: studio_lights(),
            target: None,
        }
    }
}

/// Owner of every scene the kernel can refer to by id.
#[derive(Debug, Clone, Default)]
pub struct SceneSet {
    scenes: BTreeMap<SceneId, Scene>,
}

impl SceneSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, scene: Scene) -> SceneId {
        let id = scene.id;
        self.scenes.insert(id, scene);
        id
    }

    pub fn get(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.get(&id)
    }

    pub fn get_mut(&mut self, id: SceneId) -> Option<&mut Scene> {
        self.scenes.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crystal_room_has_cube_and_three_lights() {
        let s = Scene::crystal_room();
        let cube = s.target.unwrap();
        assert_eq!(cube.half_extents, Vec3::splat(2.0));
        assert_eq!(cube.material.metalness, 1.0);
        assert_eq!(cube.material.roughness, 0.0);
        assert_eq!(s.lights.len(), 3);
        assert_eq!(s.lights[0].position, Vec3::new(-5.0, 5.0, 5.0));
    }

    #[test]
    fn empty_room_has_no_target() {
        let s = Scene::empty_room();
        assert!(s.target.is_none());
        assert_eq!(s.background.clear_color(), PAGE_COLOR);
    }

    #[test]
    fn scene_set_lookup() {
        let mut set = SceneSet::new();
        let a = set.insert(Scene::crystal_room());
        let b = set.insert(Scene::empty_room());
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(a).unwrap().name, "crystal");
        assert_eq!(set.get(b).unwrap().name, "beyond");
        assert!(set.get(SceneId::new()).is_none());
    }

    #[test]
    fn material_edits_stick() {
        let mut set = SceneSet::new();
        let a = set.insert(Scene::crystal_room());
        if let Some(obj) = set.get_mut(a).and_then(|s| s.target.as_mut()) {
            obj.material.roughness = 0.4;
        }
        assert_eq!(set.get(a).unwrap().target.unwrap().material.roughness, 0.4);
    }
}
