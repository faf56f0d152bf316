//! Animation kernel: the per-frame update that blends hover scaling,
//! pointer-follow rotation, drag rotation, camera flight and scene transition
//! into one object transform and one camera placement.
//!
//! # Invariants
//! - `tick` is pure with respect to its inputs: same state, frame and picker
//!   give the same result, with no rendering context required.
//! - Exactly one scene is active at any time; a transition swaps it atomically
//!   and at most once per activation.
//! - At most one transition, one flight and one rotation tween run at a time.

pub mod animation;
pub mod config;
pub mod easing;
pub mod flight;
pub mod interaction;
pub mod progress;
pub mod scroll;
pub mod transition;
pub mod tween;

pub use animation::{AnimationEvent, AnimationState, EVENT_LOG_CAPACITY, FrameInput, ScenePicker, tick};
pub use config::{AnimationConfig, ConfigError};
pub use easing::{Easing, ease_in_out_quad};
pub use flight::CameraFlightState;
pub use interaction::{InteractionChange, InteractionState};
pub use progress::StepProgress;
pub use scroll::ScrollTimeline;
pub use transition::TransitionState;
pub use tween::{RotationTween, Tween};
