/// A high-level request the shell derives from keys, clicks and the wheel.
///
/// The animation kernel consumes actions, never raw window events, so the
/// desktop shell and the headless CLI drive the scene the same way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Fly the camera into the target object, then transition scenes.
    FlyToTarget,
    /// Start the scene transition immediately, without a flight.
    StartTransition,
    /// Quarter turn about Y, counter-clockwise seen from above.
    RotateNext,
    /// Quarter turn about Y the other way.
    RotatePrevious,
    /// Wheel movement in pixels; positive scrolls down the page.
    Scroll(f32),
    /// Toggle the debug control panel.
    TogglePanel,
    /// Unbound input.
    Noop,
}

impl Action {
    /// Whether this action changes animation state (as opposed to UI chrome).
    pub fn is_animation(&self) -> bool {
        !matches!(self, Self::TogglePanel | Self::Noop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_carries_delta() {
        let a = Action::Scroll(120.0);
        assert!(matches!(a, Action::Scroll(d) if d == 120.0));
    }

    #[test]
    fn chrome_actions_are_not_animation() {
        assert!(!Action::TogglePanel.is_animation());
        assert!(!Action::Noop.is_animation());
        assert!(Action::RotateNext.is_animation());
        assert!(Action::FlyToTarget.is_animation());
    }
}
