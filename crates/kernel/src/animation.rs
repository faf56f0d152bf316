use crate::config::AnimationConfig;
use crate::flight::CameraFlightState;
use crate::interaction::InteractionState;
use crate::transition::TransitionState;
use crate::tween::RotationTween;
use glam::{Quat, Vec2, Vec3};
use prism_common::{CameraRig, SceneId, Transform};
use prism_input::{Action, PointerSample};
use std::time::Duration;

/// Scene queries the tick needs but cannot answer itself.
///
/// Implemented by the renderer-side hit tester; tests substitute stubs.
pub trait ScenePicker {
    /// First point where the pointer ray through `ndc` meets `target`.
    fn pick(&self, camera: &CameraRig, ndc: Vec2, target: &Transform) -> Option<Vec3>;

    /// World position of `ndc.xy` at normalized depth `ndc.z` (0 near, 1 far).
    fn unproject(&self, camera: &CameraRig, ndc: Vec3) -> Vec3;
}

/// Everything the shell feeds into one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInput {
    pub pointer: PointerSample,
    /// Radians to add about world Y, from the scroll timeline.
    pub scroll_rotation: f32,
}

/// A discrete change produced by the animation loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationEvent {
    HoverEntered,
    HoverLeft,
    DragStarted,
    DragEnded,
    FlightStarted { from: Vec3, to: Vec3 },
    FlightCompleted,
    TransitionStarted { source: SceneId, destination: SceneId },
    SceneSwapped { from: SceneId, to: SceneId },
    RotationStarted { angle: f32 },
    RotationFinished,
}

/// Oldest events are dropped past this many undrained entries.
pub const EVENT_LOG_CAPACITY: usize = 256;

/// All animation state, owned by the frame loop.
///
/// The object transform and camera rig are the outputs; the renderer reads
/// them after each tick.
#[derive(Debug, Clone)]
pub struct AnimationState {
    config: AnimationConfig,
    object: Transform,
    camera: CameraRig,
    opacity: f32,
    interaction: InteractionState,
    flight: CameraFlightState,
    transition: TransitionState,
    rotation: Option<RotationTween>,
    interactive_scene: SceneId,
    active_scene: SceneId,
    next_scene: Option<SceneId>,
    clock: Duration,
    tick: u64,
    event_log: Vec<AnimationEvent>,
}

impl AnimationState {
    /// Start in `interactive_scene`, the scene holding the target object.
    /// `next_scene` is where a completed flight transitions to.
    pub fn new(config: AnimationConfig, interactive_scene: SceneId, next_scene: Option<SceneId>) -> Self {
        Self {
            object: Transform {
                scale: Vec3::splat(config.original_scale),
                ..Transform::default()
            },
            camera: CameraRig::default(),
            opacity: 1.0,
            interaction: InteractionState::new(config.original_scale),
            flight: CameraFlightState::new(config.progress_step),
            transition: TransitionState::new(config.progress_step),
            rotation: None,
            interactive_scene,
            active_scene: interactive_scene,
            next_scene,
            clock: Duration::ZERO,
            tick: 0,
            event_log: Vec::new(),
            config,
        }
    }

    pub fn with_object(mut self, object: Transform) -> Self {
        self.object = object;
        self
    }

    pub fn with_camera(mut self, camera: CameraRig) -> Self {
        self.camera = camera;
        self
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    pub fn object(&self) -> &Transform {
        &self.object
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    /// Mutable camera access for orbit controls between ticks.
    pub fn camera_mut(&mut self) -> &mut CameraRig {
        &mut self.camera
    }

    /// Output opacity in `[0, 1]`; faded by flight and transition.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn flight(&self) -> &CameraFlightState {
        &self.flight
    }

    pub fn transition(&self) -> &TransitionState {
        &self.transition
    }

    pub fn rotation_tween(&self) -> Option<&RotationTween> {
        self.rotation.as_ref()
    }

    pub fn active_scene(&self) -> SceneId {
        self.active_scene
    }

    pub fn next_scene(&self) -> Option<SceneId> {
        self.next_scene
    }

    pub fn interactive_scene(&self) -> SceneId {
        self.interactive_scene
    }

    /// The scene with the target object is the one on screen.
    pub fn is_interactive(&self) -> bool {
        self.active_scene == self.interactive_scene
    }

    /// The pointer holds the object, so camera controls should stand down.
    pub fn is_grabbing(&self) -> bool {
        self.interaction.is_grabbed()
    }

    /// Flight or transition in progress.
    pub fn is_busy(&self) -> bool {
        self.flight.is_active() || self.transition.is_active()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Time accumulated from the `dt` of every tick.
    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn events(&self) -> &[AnimationEvent] {
        &self.event_log
    }

    /// Take the events recorded since the last drain. Callers that never
    /// drain see only the latest [`EVENT_LOG_CAPACITY`] events.
    pub fn drain_events(&mut self) -> Vec<AnimationEvent> {
        std::mem::take(&mut self.event_log)
    }

    fn record(&mut self, event: AnimationEvent) {
        if self.event_log.len() >= EVENT_LOG_CAPACITY {
            self.event_log.remove(0);
        }
        self.event_log.push(event);
    }

    /// Fly the camera from where it is to just in front of the object.
    ///
    /// Refused while busy, outside the interactive scene, or with nowhere to
    /// transition to afterwards.
    pub fn start_flight(&mut self) -> bool {
        if self.is_busy() || !self.is_interactive() || self.next_scene.is_none() {
            tracing::debug!(
                busy = self.is_busy(),
                interactive = self.is_interactive(),
                "flight request ignored"
            );
            return false;
        }
        let from = self.camera.eye;
        let to = self.object.position + self.config.flight_offset;
        self.flight.begin(from, to);
        self.record(AnimationEvent::FlightStarted { from, to });
        tracing::info!(?from, ?to, "camera flight started");
        true
    }

    /// Fade to `destination` without a flight.
    pub fn start_transition(&mut self, destination: SceneId) -> bool {
        if self.is_busy() || destination == self.active_scene {
            tracing::debug!(destination = %destination.short(), "transition request ignored");
            return false;
        }
        self.begin_transition(destination)
    }

    /// Fade to the pending next scene, if there is one.
    pub fn start_transition_to_next(&mut self) -> bool {
        match self.next_scene {
            Some(next) => self.start_transition(next),
            None => false,
        }
    }

    pub fn rotate_next(&mut self) -> bool {
        self.start_rotation(self.config.rotation_step())
    }

    pub fn rotate_previous(&mut self) -> bool {
        self.start_rotation(-self.config.rotation_step())
    }

    /// Dispatch a high-level action. Returns whether it started anything.
    ///
    /// Scroll and panel toggles belong to the shell and are not handled here.
    pub fn apply_action(&mut self, action: Action) -> bool {
        match action {
            Action::FlyToTarget => self.start_flight(),
            Action::StartTransition => self.start_transition_to_next(),
            Action::RotateNext => self.rotate_next(),
            Action::RotatePrevious => self.rotate_previous(),
            Action::Scroll(_) | Action::TogglePanel | Action::Noop => false,
        }
    }

    /// Advance one display frame.
    pub fn step(&mut self, frame: &FrameInput, picker: &impl ScenePicker, dt: Duration) {
        let _span = tracing::info_span!("animation_tick", tick = self.tick).entered();
        self.tick += 1;
        self.clock += dt;

        if self.is_interactive() {
            self.update_interaction(frame, picker);
            self.advance_flight();
        }
        self.advance_transition();

        if frame.scroll_rotation != 0.0 {
            self.spin_object(Quat::from_rotation_y(frame.scroll_rotation));
        }
        self.advance_rotation();

        tracing::trace!(
            scale = self.object.scale.x,
            opacity = self.opacity,
            flight = self.flight.progress(),
            transition = self.transition.progress(),
            "tick complete"
        );
    }

    fn update_interaction(&mut self, frame: &FrameInput, picker: &impl ScenePicker) {
        let pointer = &frame.pointer;
        let hit = picker.pick(&self.camera, pointer.ndc, &self.object);

        let change = self.interaction.update(
            pointer,
            hit.is_some(),
            self.config.original_scale,
            self.config.hover_scale(),
        );
        if change.hover_entered {
            tracing::debug!("pointer entered object");
            self.record(AnimationEvent::HoverEntered);
        }
        if change.hover_left {
            tracing::debug!("pointer left object");
            self.record(AnimationEvent::HoverLeft);
        }
        if change.drag_started {
            self.record(AnimationEvent::DragStarted);
        }
        if change.drag_ended {
            self.record(AnimationEvent::DragEnded);
        }

        let cfg = &self.config;
        self.object.scale = damp(self.object.scale, self.interaction.target_scale(), cfg.blend);

        // Pointer-follow yields to direct manipulation, which it would undo.
        let follow = self.interaction.is_hovered()
            && !self.interaction.is_grabbed()
            && self.rotation.is_none();
        if follow {
            let at = picker.unproject(&self.camera, pointer.ndc.extend(cfg.pointer_depth));
            let direction = (at - self.object.position).normalize_or_zero();
            if direction != Vec3::ZERO {
                self.interaction
                    .set_target_orientation(Quat::from_rotation_arc(Vec3::Z, direction));
            }
            self.object.rotation = self
                .object
                .rotation
                .slerp(self.interaction.target_orientation(), cfg.blend);
        }

        if self.interaction.is_dragging() && self.rotation.is_none() {
            let d = pointer.drag_delta * cfg.drag_sensitivity;
            let spin = Quat::from_rotation_y(d.x) * Quat::from_rotation_x(d.y);
            self.object.rotation = (spin * self.object.rotation).normalize();
        }
    }

    fn advance_flight(&mut self) {
        if !self.flight.is_active() {
            return;
        }
        self.spin_object(Quat::from_rotation_y(self.config.flight_spin));

        let progress = self.flight.advance();
        self.camera.eye = self.flight.eye();
        self.opacity = 1.0 - progress;
        self.camera.target = self
            .camera
            .target
            .lerp(self.object.position, self.config.blend);

        if self.flight.is_complete() {
            self.flight.finish();
            self.record(AnimationEvent::FlightCompleted);
            tracing::info!("camera flight complete");
            if let Some(next) = self.next_scene {
                self.begin_transition(next);
            }
        }
    }

    fn advance_transition(&mut self) {
        if !self.transition.is_active() {
            return;
        }
        let progress = self.transition.advance();
        self.opacity = 1.0 - progress;

        if let Some(destination) = self.transition.finish() {
            let from = self.active_scene;
            self.active_scene = destination;
            self.next_scene = Some(from);
            self.opacity = 1.0;
            self.record(AnimationEvent::SceneSwapped {
                from,
                to: destination,
            });
            tracing::info!(from = %from.short(), to = %destination.short(), "scene swapped");
        }
    }

    fn advance_rotation(&mut self) {
        let Some(tween) = self.rotation else {
            return;
        };
        if tween.is_finished(self.clock) {
            self.object.rotation = tween.end_rotation();
            self.rotation = None;
            self.record(AnimationEvent::RotationFinished);
            tracing::debug!("rotation tween finished");
        } else {
            self.object.rotation = tween.sample(self.clock);
        }
    }

    /// World-space spin on top of the current orientation. A running tween
    /// takes it into its base.
    fn spin_object(&mut self, spin: Quat) {
        self.object.rotation = (spin * self.object.rotation).normalize();
        if let Some(tween) = self.rotation.as_mut() {
            tween.pre_rotate(spin);
        }
    }

    fn begin_transition(&mut self, destination: SceneId) -> bool {
        let source = self.active_scene;
        if !self.transition.begin(source, destination) {
            return false;
        }
        self.record(AnimationEvent::TransitionStarted {
            source,
            destination,
        });
        tracing::info!(
            source = %source.short(),
            destination = %destination.short(),
            "scene transition started"
        );
        true
    }

    fn start_rotation(&mut self, angle: f32) -> bool {
        if self.rotation.is_some() {
            tracing::debug!("rotation already running");
            return false;
        }
        let tween = RotationTween::new(
            self.object.rotation,
            angle,
            self.clock,
            self.config.rotation_duration(),
        )
        .with_easing(self.config.rotation_easing);
        self.rotation = Some(tween);
        self.record(AnimationEvent::RotationStarted { angle });
        true
    }
}

/// Pure form of [`AnimationState::step`].
pub fn tick(
    mut state: AnimationState,
    frame: &FrameInput,
    picker: &impl ScenePicker,
    dt: Duration,
) -> AnimationState {
    state.step(frame, picker, dt);
    state
}

/// Move `current` a fixed fraction of the way toward `target`.
fn damp(current: Vec3, target: Vec3, blend: f32) -> Vec3 {
    current + (target - current) * blend
}
