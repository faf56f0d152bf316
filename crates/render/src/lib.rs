//! Rendering Adapter: renderer-agnostic interface over the animation kernel.
//!
//! # Invariants
//! - Renderers read kernel output (object transform, camera rig, opacity);
//!   they never mutate animation state.
//! - Exactly one scene is drawn per frame: the kernel's active scene.
//!
//! Hit testing lives here because it needs the projection, which is a
//! rendering concern; the kernel reaches it through `ScenePicker`.

mod camera;
mod picking;
mod renderer;
mod scene;

pub use camera::{PerspectiveCamera, Projection};
pub use picking::{HitTester, Ray};
pub use renderer::{DebugTextRenderer, FrameView, Renderer};
pub use scene::{
    AmbientLight, Background, CrystalMaterial, PAGE_COLOR, PointLight, Scene, SceneObject,
    SceneSet,
};

pub fn crate_info() -> &'static str {
    "prism-render v0.1.0"
}
