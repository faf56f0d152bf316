use std::hint::black_box;
use std::time::{Duration, Instant};

use glam::{Vec2, Vec3};
use prism_common::{CameraRig, SceneId, Transform};
use prism_input::PointerSample;
use prism_kernel::{AnimationConfig, AnimationState, FrameInput, ScenePicker};

/// Hits whenever the pointer is within a unit disc of the screen center.
struct DiscPicker;

impl ScenePicker for DiscPicker {
    fn pick(&self, _camera: &CameraRig, ndc: Vec2, target: &Transform) -> Option<Vec3> {
        (ndc.length() < 0.5).then_some(target.position)
    }

    fn unproject(&self, camera: &CameraRig, ndc: Vec3) -> Vec3 {
        camera.eye + Vec3::new(ndc.x, ndc.y, -ndc.z * 10.0)
    }
}

fn frame(i: usize) -> FrameInput {
    let t = i as f32 * 0.01;
    FrameInput {
        pointer: PointerSample {
            ndc: Vec2::new(t.sin(), t.cos() * 0.5),
            drag_delta: if i % 7 == 0 { Vec2::new(3.0, 1.0) } else { Vec2::ZERO },
            pressed: i % 50 < 25,
        },
        scroll_rotation: 0.0,
    }
}

fn bench_hover_ticks(iterations: usize) {
    let mut state = AnimationState::new(AnimationConfig::default(), SceneId::new(), Some(SceneId::new()));
    let dt = Duration::from_micros(16_667);

    let start = Instant::now();
    for i in 0..iterations {
        state.step(black_box(&frame(i)), &DiscPicker, dt);
        black_box(state.drain_events());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  hover/drag tick ({iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn bench_flight_and_transition(runs: usize) {
    let dt = Duration::from_micros(16_667);

    let start = Instant::now();
    for _ in 0..runs {
        let one = SceneId::new();
        let mut state = AnimationState::new(AnimationConfig::default(), one, Some(SceneId::new()));
        state.start_flight();
        while state.active_scene() == one {
            state.step(&FrameInput::default(), &DiscPicker, dt);
        }
        black_box(state.drain_events());
    }
    let elapsed = start.elapsed();
    let per_run = elapsed / runs as u32;
    println!("  flight + transition ({runs} runs): {per_run:?}/run, total {elapsed:?}");
}

fn main() {
    println!("=== Animation Tick Benchmarks ===\n");

    println!("Interactive ticks:");
    bench_hover_ticks(10_000);
    bench_hover_ticks(100_000);

    println!("\nFlight into scene transition:");
    bench_flight_and_transition(100);
    bench_flight_and_transition(1000);

    println!("\n=== Done ===");
}
