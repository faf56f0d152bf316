use crate::progress::StepProgress;
use prism_common::SceneId;

/// Idle → Active → Idle fade between two scenes.
///
/// There is no cancel: once begun, the transition always runs to completion
/// and hands back its destination exactly once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionState {
    progress: StepProgress,
    active: bool,
    source: Option<SceneId>,
    destination: Option<SceneId>,
}

impl TransitionState {
    pub fn new(step: f32) -> Self {
        Self {
            progress: StepProgress::new(step),
            active: false,
            source: None,
            destination: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn progress(&self) -> f32 {
        self.progress.value()
    }

    pub fn source(&self) -> Option<SceneId> {
        self.source
    }

    pub fn destination(&self) -> Option<SceneId> {
        self.destination
    }

    /// Activate from zero progress. Returns false if already active.
    pub fn begin(&mut self, source: SceneId, destination: SceneId) -> bool {
        if self.active {
            return false;
        }
        self.progress.reset();
        self.source = Some(source);
        self.destination = Some(destination);
        self.active = true;
        true
    }

    /// Step once and return the new progress. No-op when idle.
    pub fn advance(&mut self) -> f32 {
        if !self.active {
            return self.progress.value();
        }
        self.progress.advance()
    }

    pub fn is_complete(&self) -> bool {
        self.active && self.progress.is_complete()
    }

    /// Return to idle and yield the destination.
    ///
    /// Yields `None` unless the transition is active and complete, so a
    /// second call after completion never produces a second swap.
    pub fn finish(&mut self) -> Option<SceneId> {
        if !self.is_complete() {
            return None;
        }
        self.active = false;
        self.progress.reset();
        self.source = None;
        self.destination.take()
    }
}
