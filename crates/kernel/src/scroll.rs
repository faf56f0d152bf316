use std::f32::consts::TAU;

/// Scroll-scrubbed rotation: wheel movement moves a playhead along a fixed
/// scroll length, and the playhead maps linearly onto a Y angle.
///
/// The timeline lives outside `AnimationState`; the shell turns it into a
/// per-frame angle delta and hands that to the tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTimeline {
    position: f32,
    length: f32,
    start_angle: f32,
    end_angle: f32,
    last_angle: f32,
}

impl Default for ScrollTimeline {
    fn default() -> Self {
        Self::new(2000.0, 0.0, TAU)
    }
}

impl ScrollTimeline {
    /// `length` is the scroll distance in pixels that spans the whole timeline.
    pub fn new(length: f32, start_angle: f32, end_angle: f32) -> Self {
        Self {
            position: 0.0,
            length: length.max(1.0),
            start_angle,
            end_angle,
            last_angle: start_angle,
        }
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn progress(&self) -> f32 {
        self.position / self.length
    }

    pub fn angle(&self) -> f32 {
        self.start_angle + (self.end_angle - self.start_angle) * self.progress()
    }

    /// Move the playhead, clamped to `[0, length]`.
    pub fn on_wheel(&mut self, delta_px: f32) {
        self.position = (self.position + delta_px).clamp(0.0, self.length);
    }

    /// Angle change since the previous call.
    pub fn take_rotation_delta(&mut self) -> f32 {
        let angle = self.angle();
        let delta = angle - self.last_angle;
        self.last_angle = angle;
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_clamps() {
        let mut s = ScrollTimeline::new(100.0, 0.0, 1.0);
        s.on_wheel(-50.0);
        assert_eq!(s.position(), 0.0);
        s.on_wheel(500.0);
        assert_eq!(s.position(), 100.0);
        assert_eq!(s.progress(), 1.0);
        assert_eq!(s.angle(), 1.0);
    }

    #[test]
    fn delta_is_consumed() {
        let mut s = ScrollTimeline::new(100.0, 0.0, 2.0);
        s.on_wheel(25.0);
        assert!((s.take_rotation_delta() - 0.5).abs() < 1e-6);
        assert_eq!(s.take_rotation_delta(), 0.0);
        s.on_wheel(-25.0);
        assert!((s.take_rotation_delta() + 0.5).abs() < 1e-6);
    }

    #[test]
    fn default_spans_a_full_turn() {
        let mut s = ScrollTimeline::default();
        s.on_wheel(10_000.0);
        assert!((s.angle() - TAU).abs() < 1e-6);
    }
}
