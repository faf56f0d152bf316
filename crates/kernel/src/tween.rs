use crate::easing::Easing;
use glam::Quat;
use std::time::Duration;

/// A finite scalar animation sampled against elapsed time.
///
/// Time is whatever clock the owner feeds in; the tween never schedules itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub start_time: Duration,
    pub duration: Duration,
    pub start_value: f32,
    pub end_value: f32,
    pub easing: Easing,
}

impl Tween {
    pub fn new(start_time: Duration, duration: Duration, start_value: f32, end_value: f32) -> Self {
        Self {
            start_time,
            duration,
            start_value,
            end_value,
            easing: Easing::Linear,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Normalized time in `[0, 1]`. A zero duration is already finished.
    pub fn progress(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start_time);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    pub fn sample(&self, now: Duration) -> f32 {
        let t = self.easing.apply(self.progress(now));
        self.start_value + (self.end_value - self.start_value) * t
    }

    pub fn is_finished(&self, now: Duration) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Rotation about world Y by a fixed angle, relative to the orientation the
/// object had when the tween started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationTween {
    base: Quat,
    angle: Tween,
}

impl RotationTween {
    pub fn new(base: Quat, angle: f32, start_time: Duration, duration: Duration) -> Self {
        Self {
            base,
            angle: Tween::new(start_time, duration, 0.0, angle),
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.angle = self.angle.with_easing(easing);
        self
    }

    /// Signed total angle in radians.
    pub fn angle(&self) -> f32 {
        self.angle.end_value
    }

    /// Apply `rotation` underneath the tween, so it carries through to the
    /// end orientation.
    pub fn pre_rotate(&mut self, rotation: Quat) {
        self.base = (rotation * self.base).normalize();
    }

    pub fn sample(&self, now: Duration) -> Quat {
        (Quat::from_rotation_y(self.angle.sample(now)) * self.base).normalize()
    }

    pub fn end_rotation(&self) -> Quat {
        (Quat::from_rotation_y(self.angle.end_value) * self.base).normalize()
    }

    pub fn is_finished(&self, now: Duration) -> bool {
        self.angle.is_finished(now)
    }
}
