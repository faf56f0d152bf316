//! Shared types for the prism workspace.
//!
//! Everything here is plain data: the kernel mutates it, the renderer reads it.

mod types;

pub use types::{CameraRig, SceneId, Transform};
