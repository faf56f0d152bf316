use prism_kernel::AnimationState;

/// Read-only view of the animation state for the debug panel, the CLI and
/// log lines.
pub struct AnimationInspector;

impl AnimationInspector {
    pub fn summary(state: &AnimationState) -> AnimationSummary {
        let object = state.object();
        let (yaw, pitch, _) = object.rotation.to_euler(glam::EulerRot::YXZ);
        let phase = if state.transition().is_active() {
            Phase::Transition
        } else if state.flight().is_active() {
            Phase::Flight
        } else if state.rotation_tween().is_some() {
            Phase::Rotating
        } else if state.is_grabbing() {
            Phase::Grabbed
        } else if state.interaction().is_hovered() {
            Phase::Hovered
        } else {
            Phase::Idle
        };
        AnimationSummary {
            tick: state.tick_count(),
            clock_ms: state.clock().as_millis(),
            phase,
            scale: object.scale.x,
            yaw,
            pitch,
            opacity: state.opacity(),
            flight_progress: state.flight().progress(),
            transition_progress: state.transition().progress(),
            eye: state.camera().eye.to_array(),
            interactive: state.is_interactive(),
            pending_events: state.events().len(),
        }
    }
}

/// What the scene is doing this tick, most specific first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Hovered,
    Grabbed,
    Rotating,
    Flight,
    Transition,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Phase::Idle => "idle",
            Phase::Hovered => "hovered",
            Phase::Grabbed => "grabbed",
            Phase::Rotating => "rotating",
            Phase::Flight => "flight",
            Phase::Transition => "transition",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct AnimationSummary {
    pub tick: u64,
    pub clock_ms: u128,
    pub phase: Phase,
    pub scale: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub opacity: f32,
    pub flight_progress: f32,
    pub transition_progress: f32,
    pub eye: [f32; 3],
    pub interactive: bool,
    pub pending_events: usize,
}

impl std::fmt::Display for AnimationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "tick={} t={}ms phase={} scale={:.3} yaw={:.2} opacity={:.2} flight={:.2} transition={:.2} eye=({:.2}, {:.2}, {:.2})",
            self.tick,
            self.clock_ms,
            self.phase,
            self.scale,
            self.yaw,
            self.opacity,
            self.flight_progress,
            self.transition_progress,
            self.eye[0],
            self.eye[1],
            self.eye[2],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};
    use prism_common::{CameraRig, SceneId, Transform};
    use prism_input::PointerSample;
    use prism_kernel::{AnimationConfig, FrameInput, ScenePicker};
    use std::time::Duration;

    struct Always(bool);

    impl ScenePicker for Always {
        fn pick(&self, _: &CameraRig, _: Vec2, _: &Transform) -> Option<Vec3> {
            self.0.then_some(Vec3::ZERO)
        }

        fn unproject(&self, _: &CameraRig, ndc: Vec3) -> Vec3 {
            Vec3::new(ndc.x, ndc.y, 5.0)
        }
    }

    fn state() -> AnimationState {
        AnimationState::new(AnimationConfig::default(), SceneId::new(), Some(SceneId::new()))
    }

    #[test]
    fn fresh_state_is_idle() {
        let summary = AnimationInspector::summary(&state());
        assert_eq!(summary.tick, 0);
        assert_eq!(summary.phase, Phase::Idle);
        assert_eq!(summary.opacity, 1.0);
        assert!(summary.interactive);
    }

    #[test]
    fn hover_then_flight_phases() {
        let mut s = state();
        s.step(&FrameInput::default(), &Always(true), Duration::from_millis(16));
        assert_eq!(AnimationInspector::summary(&s).phase, Phase::Hovered);

        assert!(s.start_flight());
        s.step(&FrameInput::default(), &Always(true), Duration::from_millis(16));
        let summary = AnimationInspector::summary(&s);
        assert_eq!(summary.phase, Phase::Flight);
        assert!((summary.flight_progress - 0.02).abs() < 1e-6);
    }

    #[test]
    fn grab_phase() {
        let mut s = state();
        let press = FrameInput {
            pointer: PointerSample {
                pressed: true,
                ..PointerSample::default()
            },
            ..FrameInput::default()
        };
        s.step(&FrameInput::default(), &Always(true), Duration::from_millis(16));
        s.step(&press, &Always(true), Duration::from_millis(16));
        assert_eq!(AnimationInspector::summary(&s).phase, Phase::Grabbed);
    }

    #[test]
    fn display_mentions_phase_and_tick() {
        let mut s = state();
        s.rotate_next();
        s.step(&FrameInput::default(), &Always(false), Duration::from_millis(100));
        let text = AnimationInspector::summary(&s).to_string();
        assert!(text.contains("tick=1"));
        assert!(text.contains("phase=rotating"));
        assert!(text.contains("t=100ms"));
    }
}
