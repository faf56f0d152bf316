//! wgpu render backend for the crystal scene.
//!
//! Draws an equirectangular environment backdrop and the lit, reflective cube,
//! and provides damped orbit controls for the camera rig.
//!
//! # Invariants
//! - The renderer never mutates animation state.
//! - Orbit motion is not part of the animation kernel.
//! - Frame opacity fades the whole image toward the page color.

mod camera;
mod gpu;
mod shaders;

pub use camera::OrbitControls;
pub use gpu::WgpuRenderer;
