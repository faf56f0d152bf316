//! Input: raw pointer events normalized into device-independent samples, and
//! the high-level actions the shell maps keys and clicks onto.
//!
//! # Invariants
//! - Pointer handlers only mutate `PointerState`; they never animate or render.
//! - Normalized coordinates are not clamped. Off-viewport positions pass through.

pub mod action;
pub mod pointer;

pub use action::Action;
pub use pointer::{PointerSample, PointerState, Viewport, normalize};
