use crate::progress::StepProgress;
use glam::Vec3;

/// Camera fly-in from a captured start position to an end position.
///
/// Progress is frame-stepped; the eye is a straight lerp between the two ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFlightState {
    start: Vec3,
    end: Vec3,
    progress: StepProgress,
    active: bool,
}

impl CameraFlightState {
    pub fn new(step: f32) -> Self {
        Self {
            start: Vec3::ZERO,
            end: Vec3::ZERO,
            progress: StepProgress::new(step),
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn progress(&self) -> f32 {
        self.progress.value()
    }

    pub fn start(&self) -> Vec3 {
        self.start
    }

    pub fn end(&self) -> Vec3 {
        self.end
    }

    /// Begin a flight. Returns false if one is already running.
    pub fn begin(&mut self, start: Vec3, end: Vec3) -> bool {
        if self.active {
            return false;
        }
        self.start = start;
        self.end = end;
        self.progress.reset();
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

    /// Camera eye for the current progress.
    pub fn eye(&self) -> Vec3 {
        self.start.lerp(self.end, self.progress.value())
    }

    /// Deactivate and reset to the idle state.
    pub fn finish(&mut self) {
        self.active = false;
        self.progress.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_by_default() {
        let mut f = CameraFlightState::new(0.02);
        assert!(!f.is_active());
        assert_eq!(f.advance(), 0.0);
        assert!(!f.is_complete());
    }

    #[test]
    fn eye_follows_lerp() {
        let mut f = CameraFlightState::new(0.25);
        assert!(f.begin(Vec3::new(0.0, 0.0, 8.0), Vec3::new(0.0, 0.0, 2.0)));
        f.advance();
        assert_eq!(f.eye(), Vec3::new(0.0, 0.0, 6.5));
        f.advance();
        f.advance();
        f.advance();
        assert!(f.is_complete());
        assert_eq!(f.eye(), Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn second_begin_is_refused() {
        let mut f = CameraFlightState::new(0.02);
        assert!(f.begin(Vec3::ZERO, Vec3::X));
        f.advance();
        assert!(!f.begin(Vec3::Y, Vec3::Z));
        assert_eq!(f.end(), Vec3::X);
    }

    #[test]
    fn finish_resets() {
        let mut f = CameraFlightState::new(0.5);
        f.begin(Vec3::ZERO, Vec3::X);
        f.advance();
        f.advance();
        f.finish();
        assert!(!f.is_active());
        assert_eq!(f.progress(), 0.0);
        assert!(f.begin(Vec3::ZERO, Vec3::Y));
    }
}
