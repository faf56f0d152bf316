use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use glam::Vec2;
use prism_assets::{EnvironmentLoad, EnvironmentMap, LoadingProgress};
use prism_common::SceneId;
use prism_input::{Action, PointerState, Viewport};
use prism_kernel::{
    AnimationConfig, AnimationEvent, AnimationState, FrameInput, ScenePicker, ScrollTimeline,
};
use prism_render::{FrameView, HitTester, PerspectiveCamera, Projection, Scene, SceneSet};
use prism_render_wgpu::{OrbitControls, WgpuRenderer};
use prism_tools::AnimationInspector;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "prism-desktop", about = "Interactive crystal cube scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON animation config overriding the defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Equirectangular environment map (.hdr, .exr, .png or .jpg)
    #[arg(long)]
    env_map: Option<PathBuf>,
}

/// Pixels a press may travel and still count as a click.
const CLICK_SLOP: f32 = 4.0;
/// Pixels per wheel line.
const LINE_HEIGHT: f32 = 40.0;

fn action_for_key(key: KeyCode) -> Action {
    match key {
        KeyCode::ArrowRight => Action::RotateNext,
        KeyCode::ArrowLeft => Action::RotatePrevious,
        KeyCode::KeyF | KeyCode::Enter => Action::FlyToTarget,
        KeyCode::KeyT => Action::StartTransition,
        KeyCode::F1 => Action::TogglePanel,
        _ => Action::Noop,
    }
}

/// Application state.
struct AppState {
    scenes: SceneSet,
    animation: AnimationState,
    picker: HitTester,
    pointer: PointerState,
    scroll: ScrollTimeline,
    orbit: OrbitControls,
    viewport: Viewport,
    modifiers: ModifiersState,
    show_panel: bool,
    // Press bookkeeping for click-vs-drag and orbit-vs-grab
    press_at: Option<Vec2>,
    press_hit: bool,
    orbit_drag: bool,
    // Environment loading
    env_load: Option<EnvironmentLoad>,
    environment: Option<EnvironmentMap>,
    env_dirty: bool,
    exposure: f32,
    progress: LoadingProgress,
    last_frame: Instant,
}

impl AppState {
    fn new(config: AnimationConfig, env_map: Option<PathBuf>) -> Self {
        let mut scenes = SceneSet::new();
        let crystal_room = Scene::crystal_room();
        let picker = HitTester::for_scene(Projection::default(), &crystal_room);
        let crystal = scenes.insert(crystal_room);
        let beyond = scenes.insert(Scene::empty_room());

        let mut progress = LoadingProgress::new();
        let env_load = env_map.and_then(|path| {
            progress.start(1);
            match EnvironmentLoad::spawn(path) {
                Ok(load) => Some(load),
                Err(e) => {
                    tracing::error!("could not start environment load: {e}");
                    progress.item_failed();
                    None
                }
            }
        });

        Self {
            scenes,
            animation: AnimationState::new(config, crystal, Some(beyond)),
            picker,
            pointer: PointerState::new(),
            scroll: ScrollTimeline::default(),
            orbit: OrbitControls::default(),
            viewport: Viewport::new(1280.0, 720.0),
            modifiers: ModifiersState::empty(),
            show_panel: false,
            press_at: None,
            press_hit: false,
            orbit_drag: false,
            env_load,
            environment: None,
            env_dirty: false,
            exposure: 1.0,
            progress,
            last_frame: Instant::now(),
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width as f32, height as f32);
        self.picker.projection.set_viewport(width, height);
    }

    fn camera(&self) -> PerspectiveCamera {
        self.picker.camera(self.animation.camera())
    }

    fn pointer_on_object(&self) -> bool {
        self.animation.is_interactive()
            && self
                .picker
                .pick(
                    self.animation.camera(),
                    self.pointer.ndc(),
                    self.animation.object(),
                )
                .is_some()
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::TogglePanel => self.show_panel = !self.show_panel,
            Action::Scroll(px) => self.scroll.on_wheel(px),
            Action::Noop => {}
            other => {
                if !self.animation.apply_action(other) {
                    tracing::debug!(action = ?other, "action had no effect");
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.apply(action_for_key(key));
        }
    }

    fn cursor_moved(&mut self, position: Vec2) {
        let previous = self.pointer.screen();
        self.pointer.on_move(position, self.viewport);
        if self.orbit_drag {
            let d = position - previous;
            self.orbit.rotate(d.x, d.y);
        }
    }

    fn mouse_button(&mut self, pressed: bool) {
        let at = self.pointer.screen();
        if pressed {
            self.press_hit = self.pointer_on_object();
            self.press_at = Some(at);
            self.orbit_drag = !self.press_hit;
            self.pointer.on_press(at, self.viewport);
        } else {
            self.pointer.on_release();
            self.orbit_drag = false;
            let clicked = self
                .press_at
                .take()
                .is_some_and(|start| start.distance(at) <= CLICK_SLOP);
            if clicked && self.press_hit {
                self.apply(Action::FlyToTarget);
            }
            self.press_hit = false;
        }
    }

    fn wheel(&mut self, delta: MouseScrollDelta) {
        let px = match delta {
            MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT,
            MouseScrollDelta::PixelDelta(p) => -p.y as f32,
        };
        if self.modifiers.control_key() {
            self.orbit.zoom(-px / LINE_HEIGHT);
        } else {
            self.apply(Action::Scroll(px));
        }
    }

    fn poll_environment(&mut self) {
        let Some(load) = &mut self.env_load else {
            return;
        };
        match load.poll() {
            Some(Ok(env)) => {
                self.environment = Some(env);
                self.env_dirty = true;
                self.progress.item_loaded();
                self.env_load = None;
            }
            Some(Err(_)) => {
                // Already logged by the loader; render on without reflections.
                self.progress.item_failed();
                self.env_load = None;
            }
            None => {}
        }
    }

    fn update(&mut self, dt: std::time::Duration) {
        self.poll_environment();

        self.orbit.enabled = !self.animation.is_grabbing() && !self.animation.is_busy();
        self.orbit.update(self.animation.camera_mut());

        let frame = FrameInput {
            pointer: self.pointer.take_sample(),
            scroll_rotation: self.scroll.take_rotation_delta(),
        };
        self.animation.step(&frame, &self.picker, dt);
        for event in self.animation.drain_events() {
            tracing::debug!(?event, "animation event");
            if let AnimationEvent::SceneSwapped { to, .. } = event {
                if let Some(scene) = self.scenes.get(to) {
                    self.picker.retarget(scene);
                }
            }
        }
    }

    fn active_scene_id(&self) -> SceneId {
        self.animation.active_scene()
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.progress.is_done() {
            egui::Window::new("loading")
                .title_bar(false)
                .resizable(false)
                .collapsible(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label("Loading environment...");
                    ui.add(
                        egui::ProgressBar::new(self.progress.percent() / 100.0)
                            .desired_width(240.0)
                            .show_percentage(),
                    );
                });
        }

        if !self.show_panel {
            return;
        }

        let summary = AnimationInspector::summary(&self.animation);
        let active = self.active_scene_id();

        egui::SidePanel::right("controls")
            .default_width(280.0)
            .show(ctx, |ui| {
                ui.heading("Prism");
                ui.separator();
                ui.label(format!("Tick: {}  Phase: {}", summary.tick, summary.phase));
                ui.label(format!(
                    "Scale: {:.3}  Opacity: {:.2}",
                    summary.scale, summary.opacity
                ));
                ui.label(format!(
                    "Flight: {:.0}%  Transition: {:.0}%",
                    summary.flight_progress * 100.0,
                    summary.transition_progress * 100.0
                ));
                ui.label(format!(
                    "Eye: ({:.1}, {:.1}, {:.1})",
                    summary.eye[0], summary.eye[1], summary.eye[2]
                ));
                ui.add(egui::ProgressBar::new(self.scroll.progress()).text("scroll"));
                ui.separator();

                ui.heading("Actions");
                ui.horizontal(|ui| {
                    if ui.button("<- Rotate").clicked() {
                        self.apply(Action::RotatePrevious);
                    }
                    if ui.button("Rotate ->").clicked() {
                        self.apply(Action::RotateNext);
                    }
                });
                ui.horizontal(|ui| {
                    if ui.button("Fly in (F)").clicked() {
                        self.apply(Action::FlyToTarget);
                    }
                    if ui.button("Transition (T)").clicked() {
                        self.apply(Action::StartTransition);
                    }
                });
                ui.separator();

                ui.heading("Material");
                let target = self
                    .scenes
                    .get_mut(active)
                    .and_then(|scene| scene.target.as_mut());
                match target {
                    Some(object) => {
                        let m = &mut object.material;
                        ui.add(egui::Slider::new(&mut m.metalness, 0.0..=1.0).text("metalness"));
                        ui.add(egui::Slider::new(&mut m.roughness, 0.0..=1.0).text("roughness"));
                        ui.add(egui::Slider::new(&mut m.thickness, -1.0..=5.0).text("thickness"));
                        ui.add(
                            egui::Slider::new(&mut m.env_intensity, 0.0..=3.0)
                                .text("env intensity"),
                        );
                    }
                    None => {
                        ui.label("No object in this scene");
                    }
                }
                ui.separator();

                ui.heading("Environment");
                if self.environment.is_some() {
                    if ui
                        .add(egui::Slider::new(&mut self.exposure, 0.1..=4.0).text("exposure"))
                        .changed()
                    {
                        self.env_dirty = true;
                    }
                } else {
                    ui.label("No environment map");
                }

                ui.separator();
                ui.small("F1: Panel | Drag cube: Spin | Drag space: Orbit | Wheel: Scroll | Ctrl+Wheel: Zoom");
            });
    }
}

struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<WgpuRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Prism")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("prism_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        self.state.resize(config.width, config.height);

        let renderer = WgpuRenderer::new(&device, &queue, surface_format, config.width, config.height);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);
        Ok(())
    }

    fn redraw(&mut self) {
        let now = Instant::now();
        let dt = (now - self.state.last_frame).min(std::time::Duration::from_millis(100));
        self.state.last_frame = now;
        self.state.update(dt);

        let (
            Some(window),
            Some(surface),
            Some(device),
            Some(queue),
            Some(config),
            Some(renderer),
            Some(egui_winit),
            Some(egui_renderer),
        ) = (
            &self.window,
            &self.surface,
            &self.device,
            &self.queue,
            &self.config,
            &mut self.renderer,
            &mut self.egui_winit,
            &mut self.egui_renderer,
        )
        else {
            return;
        };

        if self.state.env_dirty {
            if let Some(env) = &self.state.environment {
                let rgba = env.to_rgba8(self.state.exposure);
                renderer.set_environment(device, queue, env.width, env.height, &rgba);
            }
            self.state.env_dirty = false;
        }

        let output = match surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                surface.configure(device, config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        if let Some(scene) = self.state.scenes.get(self.state.animation.active_scene()) {
            let camera = self.state.camera();
            renderer.render(
                device,
                queue,
                &view,
                &FrameView {
                    scene,
                    camera: &camera,
                    object: self.state.animation.object(),
                    opacity: self.state.animation.opacity(),
                },
            );
        }

        let raw_input = egui_winit.take_egui_input(window);
        let state = &mut self.state;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx);
        });
        egui_winit.handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [config.width, config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        egui_renderer.update_buffers(device, queue, &mut encoder, &paint_jobs, &screen_descriptor);
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }

        output.present();
        window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_gpu(event_loop) {
            tracing::error!("failed to initialize graphics: {e:#}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            let response = egui_winit.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &mut self.config)
                {
                    config.width = new_size.width.max(1);
                    config.height = new_size.height.max(1);
                    surface.configure(device, config);
                    self.state.resize(config.width, config.height);
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(device, config.width, config.height);
                    }
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.state.modifiers = modifiers.state();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.state
                    .handle_key(key, key_state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state
                    .cursor_moved(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: btn_state,
                ..
            } => {
                self.state.mouse_button(btn_state == ElementState::Pressed);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.state.wheel(delta);
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => AnimationConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AnimationConfig::default(),
    };

    tracing::info!("prism-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(AppState::new(config, cli.env_map));
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> AppState {
        AppState::new(AnimationConfig::default(), None)
    }

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(action_for_key(KeyCode::ArrowRight), Action::RotateNext);
        assert_eq!(action_for_key(KeyCode::KeyT), Action::StartTransition);
        assert_eq!(action_for_key(KeyCode::KeyQ), Action::Noop);
    }

    #[test]
    fn click_on_cube_starts_flight() {
        let mut s = app();
        s.cursor_moved(Vec2::new(640.0, 360.0));
        s.mouse_button(true);
        s.mouse_button(false);
        assert!(s.animation.flight().is_active());
    }

    #[test]
    fn press_off_cube_orbits_instead() {
        let mut s = app();
        s.cursor_moved(Vec2::new(10.0, 10.0));
        s.mouse_button(true);
        assert!(s.orbit_drag);
        s.cursor_moved(Vec2::new(60.0, 10.0));
        let eye = s.animation.camera().eye;
        s.update(std::time::Duration::from_millis(16));
        assert_ne!(s.animation.camera().eye, eye);
        s.mouse_button(false);
        assert!(!s.animation.flight().is_active());
    }

    #[test]
    fn f1_toggles_panel() {
        let mut s = app();
        s.handle_key(KeyCode::F1, true);
        assert!(s.show_panel);
        s.handle_key(KeyCode::F1, false);
        assert!(s.show_panel);
        s.handle_key(KeyCode::F1, true);
        assert!(!s.show_panel);
    }

    #[test]
    fn picker_follows_the_active_scene() {
        let mut s = app();
        let start = s.active_scene_id();
        assert!(s.picker.half_extents.is_some());
        s.apply(Action::StartTransition);
        for _ in 0..200 {
            if s.active_scene_id() != start {
                break;
            }
            s.update(std::time::Duration::from_millis(16));
        }
        assert_ne!(s.active_scene_id(), start);
        assert_eq!(s.picker.half_extents, None);
        assert!(!s.pointer_on_object());
    }

    #[test]
    fn no_env_map_means_loaded() {
        assert!(app().progress.is_done());
    }
}
