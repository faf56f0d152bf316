use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec2;
use prism_assets::EnvironmentLoad;
use prism_input::{Action, PointerState, Viewport};
use prism_kernel::{AnimationConfig, AnimationEvent, AnimationState, FrameInput};
use prism_render::{
    DebugTextRenderer, FrameView, HitTester, PerspectiveCamera, Projection, Renderer, Scene, SceneSet,
};
use prism_tools::AnimationInspector;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "prism-cli", about = "Headless tooling for the prism crystal scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, crate info and the default animation config
    Info,
    /// Run a scripted hover, drag and fly-in without a window
    Simulate {
        /// Number of ticks to run
        #[arg(short, long, default_value = "200")]
        ticks: u64,
        /// Print an inspector line every N ticks (0 disables)
        #[arg(short, long, default_value = "25")]
        every: u64,
        /// JSON animation config overriding the defaults
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Decode an environment map and print its statistics
    Env {
        path: PathBuf,
        /// Exposure used for the tone-mapped preview statistics
        #[arg(long, default_value = "1.0")]
        exposure: f32,
    },
}

const VIEWPORT: Viewport = Viewport {
    width: 1280.0,
    height: 720.0,
};
const FRAME: Duration = Duration::from_micros(16_667);
const HOVER_TICKS: u64 = 30;
const DRAG_TICKS: u64 = 20;

/// The scripted pointer: rest on the cube, grab and drag right, release,
/// then request the fly-in.
fn script(tick: u64, pointer: &mut PointerState) -> Option<Action> {
    let center = Vec2::new(VIEWPORT.width / 2.0, VIEWPORT.height / 2.0);
    match tick {
        0 => pointer.on_move(center, VIEWPORT),
        t if t == HOVER_TICKS => pointer.on_press(center, VIEWPORT),
        t if t > HOVER_TICKS && t <= HOVER_TICKS + DRAG_TICKS => {
            let step = (t - HOVER_TICKS) as f32 * 10.0;
            pointer.on_move(center + Vec2::new(step, 0.0), VIEWPORT);
        }
        t if t == HOVER_TICKS + DRAG_TICKS + 1 => {
            pointer.on_release();
            pointer.on_move(center, VIEWPORT);
            return Some(Action::FlyToTarget);
        }
        _ => {}
    }
    None
}

struct Simulation {
    scenes: SceneSet,
    state: AnimationState,
    picker: HitTester,
    events: Vec<(u64, AnimationEvent)>,
}

fn simulate(config: AnimationConfig, ticks: u64, every: u64) -> Simulation {
    let mut scenes = SceneSet::new();
    let crystal = scenes.insert(Scene::crystal_room());
    let beyond = scenes.insert(Scene::empty_room());
    let mut projection = Projection::default();
    projection.set_viewport(VIEWPORT.width as u32, VIEWPORT.height as u32);
    let mut picker = HitTester::new(projection, None);
    if let Some(scene) = scenes.get(crystal) {
        picker.retarget(scene);
    }

    let mut state = AnimationState::new(config, crystal, Some(beyond));
    let mut pointer = PointerState::new();
    let mut events = Vec::new();

    for tick in 0..ticks {
        if let Some(action) = script(tick, &mut pointer) {
            let started = state.apply_action(action);
            tracing::debug!(?action, started, "scripted action");
        }
        let frame = FrameInput {
            pointer: pointer.take_sample(),
            scroll_rotation: 0.0,
        };
        state.step(&frame, &picker, FRAME);
        let now = state.tick_count();
        events.extend(state.drain_events().into_iter().map(|e| (now, e)));

        if every > 0 && state.tick_count() % every == 0 {
            println!("{}", AnimationInspector::summary(&state));
        }
    }

    Simulation {
        scenes,
        state,
        picker,
        events,
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("prism-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", prism_render::crate_info());
            println!("assets: {}", prism_assets::crate_info());
            println!("tools: {}", prism_tools::crate_info());
            println!("default config:");
            println!("{}", serde_json::to_string_pretty(&AnimationConfig::default())?);
        }
        Commands::Simulate {
            ticks,
            every,
            config,
        } => {
            let config = match config {
                Some(path) => AnimationConfig::load(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => AnimationConfig::default(),
            };
            let sim = simulate(config, ticks, every);

            println!("Events:");
            for (tick, event) in &sim.events {
                println!("  [{tick:>4}] {event:?}");
            }

            let state = &sim.state;
            let scene = sim
                .scenes
                .get(state.active_scene())
                .context("active scene missing from scene set")?;
            let camera = PerspectiveCamera::new(*state.camera(), sim.picker.projection);
            let text = DebugTextRenderer::new().render(&FrameView {
                scene,
                camera: &camera,
                object: state.object(),
                opacity: state.opacity(),
            });
            print!("{text}");
            println!("{}", AnimationInspector::summary(state));
        }
        Commands::Env { path, exposure } => {
            let env = EnvironmentLoad::spawn(&path)?
                .wait()
                .with_context(|| format!("loading environment map {}", path.display()))?;
            let preview = env.to_rgba8(exposure);
            let mean_byte = preview.iter().map(|&b| b as f64).sum::<f64>() / preview.len().max(1) as f64;
            println!("Environment map {}", path.display());
            println!("  id: {}", env.id);
            println!("  size: {}x{} ({:?} range)", env.width, env.height, env.range);
            println!("  mean luminance: {:.4}", env.mean_luminance());
            println!("  mean preview byte at exposure {exposure}: {mean_byte:.1}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_run_swaps_scene_once() {
        let sim = simulate(AnimationConfig::default(), 200, 0);
        let swaps = sim
            .events
            .iter()
            .filter(|(_, e)| matches!(e, AnimationEvent::SceneSwapped { .. }))
            .count();
        assert_eq!(swaps, 1);
        assert!(!sim.state.is_interactive());
        assert_eq!(sim.state.opacity(), 1.0);
    }

    #[test]
    fn scripted_run_hovers_and_drags_first() {
        let sim = simulate(AnimationConfig::default(), HOVER_TICKS + DRAG_TICKS + 2, 0);
        let kinds: Vec<_> = sim.events.iter().map(|(_, e)| e).collect();
        assert!(matches!(kinds[0], AnimationEvent::HoverEntered));
        assert!(kinds.iter().any(|e| matches!(e, AnimationEvent::DragStarted)));
        assert!(kinds.iter().any(|e| matches!(e, AnimationEvent::DragEnded)));
        assert!(kinds.iter().any(|e| matches!(e, AnimationEvent::FlightStarted { .. })));
        assert!(sim.state.object().scale.x > 1.2);
    }
}
