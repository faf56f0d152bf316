use glam::{Quat, Vec3};
use prism_input::PointerSample;

/// Hover and grab flags plus the targets the object is damped toward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionState {
    hover: f32,
    target_scale: Vec3,
    target_orientation: Quat,
    grabbed: bool,
    dragging: bool,
    drag_session: bool,
    was_pressed: bool,
}

/// What changed in one [`InteractionState::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InteractionChange {
    pub hover_entered: bool,
    pub hover_left: bool,
    pub drag_started: bool,
    pub drag_ended: bool,
}

impl InteractionState {
    pub fn new(original_scale: f32) -> Self {
        Self {
            hover: 0.0,
            target_scale: Vec3::splat(original_scale),
            target_orientation: Quat::IDENTITY,
            grabbed: false,
            dragging: false,
            drag_session: false,
            was_pressed: false,
        }
    }

    /// 1 while the pointer is over the object, else 0.
    pub fn hover(&self) -> f32 {
        self.hover
    }

    pub fn is_hovered(&self) -> bool {
        self.hover >= 1.0
    }

    pub fn target_scale(&self) -> Vec3 {
        self.target_scale
    }

    pub fn target_orientation(&self) -> Quat {
        self.target_orientation
    }

    pub fn set_target_orientation(&mut self, orientation: Quat) {
        self.target_orientation = orientation;
    }

    /// The current press began over the object.
    pub fn is_grabbed(&self) -> bool {
        self.grabbed
    }

    /// Grabbed and moved this frame.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Fold one frame of pointer input and hit result into the flags.
    ///
    /// A press grabs the object only if it starts while hovering; the grab
    /// lasts until release even if the pointer slides off the object.
    pub fn update(
        &mut self,
        pointer: &PointerSample,
        hit: bool,
        original_scale: f32,
        hover_scale: f32,
    ) -> InteractionChange {
        let mut change = InteractionChange::default();

        let was_hovered = self.is_hovered();
        self.hover = if hit { 1.0 } else { 0.0 };
        self.target_scale = Vec3::splat(if hit { hover_scale } else { original_scale });
        change.hover_entered = hit && !was_hovered;
        change.hover_left = !hit && was_hovered;

        let press_edge = pointer.pressed && !self.was_pressed;
        if press_edge {
            self.grabbed = hit;
        } else if !pointer.pressed {
            self.grabbed = false;
        }
        self.was_pressed = pointer.pressed;

        self.dragging = self.grabbed && pointer.is_dragging();
        if self.dragging && !self.drag_session {
            self.drag_session = true;
            change.drag_started = true;
        } else if !self.grabbed && self.drag_session {
            self.drag_session = false;
            change.drag_ended = true;
        }

        change
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn sample(pressed: bool, delta: Vec2) -> PointerSample {
        PointerSample {
            ndc: Vec2::ZERO,
            drag_delta: delta,
            pressed,
        }
    }

    #[test]
    fn hover_switches_target_scale() {
        let mut s = InteractionState::new(1.0);
        let c = s.update(&sample(false, Vec2::ZERO), true, 1.0, 1.25);
        assert!(c.hover_entered);
        assert_eq!(s.hover(), 1.0);
        assert_eq!(s.target_scale(), Vec3::splat(1.25));

        let c = s.update(&sample(false, Vec2::ZERO), false, 1.0, 1.25);
        assert!(c.hover_left);
        assert_eq!(s.hover(), 0.0);
        assert_eq!(s.target_scale(), Vec3::ONE);
    }

    #[test]
    fn press_off_object_does_not_grab() {
        let mut s = InteractionState::new(1.0);
        s.update(&sample(true, Vec2::ZERO), false, 1.0, 1.25);
        s.update(&sample(true, Vec2::new(10.0, 0.0)), true, 1.0, 1.25);
        assert!(!s.is_grabbed());
        assert!(!s.is_dragging());
    }

    #[test]
    fn grab_survives_leaving_the_object() {
        let mut s = InteractionState::new(1.0);
        s.update(&sample(true, Vec2::ZERO), true, 1.0, 1.25);
        assert!(s.is_grabbed());
        assert!(!s.is_dragging());

        let c = s.update(&sample(true, Vec2::new(4.0, 0.0)), false, 1.0, 1.25);
        assert!(c.drag_started);
        assert!(s.is_dragging());

        let c = s.update(&sample(false, Vec2::ZERO), false, 1.0, 1.25);
        assert!(c.drag_ended);
        assert!(!s.is_grabbed());
    }

    #[test]
    fn held_without_motion_is_not_dragging() {
        let mut s = InteractionState::new(1.0);
        s.update(&sample(true, Vec2::ZERO), true, 1.0, 1.25);
        s.update(&sample(true, Vec2::ZERO), true, 1.0, 1.25);
        assert!(s.is_grabbed());
        assert!(!s.is_dragging());
    }

    #[test]
    fn pausing_mid_drag_does_not_restart_it() {
        let mut s = InteractionState::new(1.0);
        s.update(&sample(true, Vec2::ZERO), true, 1.0, 1.25);
        let c = s.update(&sample(true, Vec2::X), true, 1.0, 1.25);
        assert!(c.drag_started);
        let c = s.update(&sample(true, Vec2::ZERO), true, 1.0, 1.25);
        assert!(!c.drag_started && !c.drag_ended);
        let c = s.update(&sample(true, Vec2::X), true, 1.0, 1.25);
        assert!(!c.drag_started);
    }
}
