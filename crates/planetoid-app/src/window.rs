//! Window creation and event handling via winit.
//!
//! [`PlanetoidApp`] implements [`ApplicationHandler`]: it owns the window, the
//! GPU context and renderer, the simulation state and the tuning editor, and
//! drives one simulate-then-render pass per redraw.

use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use planetoid_config::Config;
use planetoid_input::{CursorMode, KeyboardState, MouseState};
use planetoid_planet::{FrameUniform, PlanetRenderOptions, PlanetRenderer, ScatteringUniform};
use planetoid_player::MoveInput;
use planetoid_render::{
    DepthBuffer, FrameEncoder, RenderContext, RenderPassBuilder, SurfaceError,
    init_render_context_blocking,
};
use tracing::{debug, error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::editor::{EditorCommand, PlanetEditor};
use crate::frame_stats::FrameStats;
use crate::game_loop::GameLoop;
use crate::state::SimulationState;

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    let attrs = WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ));
    if config.window.fullscreen {
        attrs.with_fullscreen(Some(Fullscreen::Borderless(None)))
    } else {
        attrs
    }
}

/// Editor key bindings, active only in settings mode.
pub fn editor_command(key: KeyCode) -> Option<EditorCommand> {
    let command = match key {
        KeyCode::ArrowUp => EditorCommand::PreviousTunable,
        KeyCode::ArrowDown => EditorCommand::NextTunable,
        KeyCode::ArrowLeft => EditorCommand::Decrease,
        KeyCode::ArrowRight => EditorCommand::Increase,
        KeyCode::PageUp => EditorCommand::PreviousLayer,
        KeyCode::PageDown => EditorCommand::NextLayer,
        KeyCode::KeyT => EditorCommand::ToggleLayer,
        KeyCode::KeyN => EditorCommand::AddLayer,
        KeyCode::Delete => EditorCommand::DeleteLayer,
        KeyCode::BracketLeft => EditorCommand::MoveLayerUp,
        KeyCode::BracketRight => EditorCommand::MoveLayerDown,
        KeyCode::KeyV => EditorCommand::ToggleAtmosphere,
        KeyCode::KeyL => EditorCommand::ToggleSurfaceLock,
        KeyCode::KeyG => EditorCommand::ToggleAutoRegenerate,
        KeyCode::KeyR => EditorCommand::Regenerate,
        KeyCode::F5 => EditorCommand::Save,
        KeyCode::F9 => EditorCommand::Load,
        _ => return None,
    };
    Some(command)
}

/// Whether holding the key should keep firing `command`.
fn repeats(command: EditorCommand) -> bool {
    matches!(command, EditorCommand::Increase | EditorCommand::Decrease)
}

pub struct PlanetoidApp {
    config: Config,
    window: Option<Arc<Window>>,
    gpu: Option<RenderContext>,
    depth: Option<DepthBuffer>,
    renderer: Option<PlanetRenderer>,
    state: SimulationState,
    editor: PlanetEditor,
    keyboard: KeyboardState,
    mouse: MouseState,
    game_loop: GameLoop,
    stats: FrameStats,
    last_frame: Instant,
    title_dirty: bool,
}

impl PlanetoidApp {
    pub fn new(config: Config, state: SimulationState) -> Self {
        let editor = PlanetEditor::new(
            config.planet.save_folder.clone(),
            config.planet.save_file.clone(),
        );
        Self {
            config,
            window: None,
            gpu: None,
            depth: None,
            renderer: None,
            state,
            editor,
            keyboard: KeyboardState::new(),
            mouse: MouseState::new(),
            game_loop: GameLoop::new(),
            stats: FrameStats::new(),
            last_frame: Instant::now(),
            title_dirty: true,
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    fn initialize_rendering(&mut self, gpu: &RenderContext) -> bool {
        let options = PlanetRenderOptions {
            shader_dir: self.config.render.shader_dir.clone(),
            cpu_displacement: self.config.render.cpu_displacement,
        };
        match PlanetRenderer::new(&gpu.device, gpu.surface_format, &options) {
            Ok(renderer) => self.renderer = Some(renderer),
            Err(e) => {
                error!("Planet shaders failed: {e}");
                return false;
            }
        }
        self.depth = Some(DepthBuffer::new(
            &gpu.device,
            gpu.surface_config.width,
            gpu.surface_config.height,
        ));
        self.state.request_rebuild();
        true
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        self.keyboard.process_event(event);
        if event.state != ElementState::Pressed {
            return;
        }
        let PhysicalKey::Code(key) = event.physical_key else {
            return;
        };

        if key == KeyCode::Escape && !event.repeat {
            self.toggle_settings_mode();
            return;
        }
        if !self.state.settings_mode {
            return;
        }
        let Some(command) = editor_command(key) else {
            return;
        };
        if event.repeat && !repeats(command) {
            return;
        }
        if self.editor.apply(command, &mut self.state) {
            debug!(?command, "Editor command applied");
            self.title_dirty = true;
        }
    }

    fn toggle_settings_mode(&mut self) {
        let settings = self.state.toggle_settings_mode();
        let mode = if settings {
            CursorMode::Free
        } else {
            CursorMode::Captured
        };
        match &self.window {
            Some(window) => self.mouse.set_mode(window, mode),
            None => self.mouse.set_mode_flag(mode),
        }
        self.title_dirty = true;
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(width, height);
            if let Some(depth) = &mut self.depth {
                depth.resize(&gpu.device, width, height);
            }
            info!("Window resized to {width}x{height}");
        }
    }

    fn update(&mut self) {
        let now = Instant::now();
        if self.stats.record(now.duration_since(self.last_frame)) && self.config.debug.show_fps {
            self.title_dirty = true;
        }
        self.last_frame = now;

        let look = self.mouse.take_delta();
        if !self.state.settings_mode && look != Vec2::ZERO {
            self.state.camera.look(look);
        }

        let input = MoveInput::from_keyboard(&self.keyboard);
        let state = &mut self.state;
        self.game_loop.tick(|_| state.step(input));
    }

    fn render(&mut self) {
        let (Some(gpu), Some(depth), Some(renderer)) =
            (self.gpu.as_ref(), self.depth.as_ref(), self.renderer.as_mut())
        else {
            return;
        };

        if self.state.take_rebuild() {
            renderer.rebuild(&gpu.device, &self.state.shape, self.state.atmosphere.thickness);
            self.state.rebuilt();
        }

        let view_proj = self.state.view_proj(
            self.config.render.fov_y_degrees,
            gpu.aspect_ratio(),
            self.config.render.near_plane,
        );
        let frame = FrameUniform::new(view_proj, self.state.model_matrix());
        let scattering = ScatteringUniform::from(&self.state.scattering());
        renderer.update(&gpu.queue, &frame, &scattering);

        let surface_texture = match gpu.get_current_texture() {
            Ok(texture) => texture,
            Err(SurfaceError::Timeout) => {
                debug!("Surface timeout, skipping frame");
                return;
            }
            Err(e) => {
                warn!("Failed to acquire surface texture: {e}");
                return;
            }
        };

        let mut encoder = FrameEncoder::new(&gpu.device, &gpu.queue, surface_texture);
        let planet_pass = RenderPassBuilder::new()
            .clear_color(self.config.render.clear_color)
            .label("planet-pass");
        if let Some(mut pass) = encoder.begin_render_pass(&planet_pass, depth) {
            renderer.draw_planet(&mut pass);
        }
        if self.state.atmosphere_enabled {
            let atmosphere_pass = RenderPassBuilder::new()
                .load_existing()
                .label("atmosphere-pass");
            if let Some(mut pass) = encoder.begin_render_pass(&atmosphere_pass, depth) {
                renderer.draw_atmosphere(&mut pass);
            }
        }
        encoder.submit();
        gpu.errors.end_frame();
    }

    fn title(&self) -> String {
        let mut title = self.config.window.title.clone();
        if self.config.debug.show_fps {
            title.push_str(" | ");
            title.push_str(&self.stats.summary());
        }
        if self.state.settings_mode {
            title.push_str(" | ");
            title.push_str(&self.editor.describe(&self.state));
        }
        title
    }

    fn refresh_title(&mut self) {
        if !self.title_dirty {
            return;
        }
        if let Some(window) = &self.window {
            window.set_title(&self.title());
        }
        self.title_dirty = false;
    }
}

impl ApplicationHandler for PlanetoidApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attrs = window_attributes_from_config(&self.config);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .expect("Failed to create window"),
        );

        let gpu = match init_render_context_blocking(window.clone(), self.config.window.vsync) {
            Ok(gpu) => gpu,
            Err(e) => {
                error!("GPU initialization failed: {e}");
                event_loop.exit();
                return;
            }
        };
        if !self.initialize_rendering(&gpu) {
            event_loop.exit();
            return;
        }
        info!(
            adapter = %gpu.adapter.get_info().name,
            format = ?gpu.surface_format,
            "Rendering initialized"
        );
        self.gpu = Some(gpu);

        self.mouse.set_mode(&window, CursorMode::Captured);
        self.last_frame = Instant::now();
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(
                    gpu_errors = self.gpu.as_ref().map_or(0, |gpu| gpu.errors.total()),
                    "Close requested, shutting down"
                );
                event_loop.exit();
            }
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::Focused(false) => self.keyboard.release_all(),
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(&event),
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse.on_cursor_moved(position.x, position.y);
            }
            WindowEvent::CursorEntered { .. } => self.mouse.on_cursor_entered(),
            WindowEvent::CursorLeft { .. } => self.mouse.on_cursor_left(),
            WindowEvent::RedrawRequested => {
                self.update();
                self.render();
                self.refresh_title();
                self.keyboard.clear_transients();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.mouse.on_raw_motion(delta.0, delta.1);
        }
    }
}

/// Creates an event loop and runs `app` until the window closes.
#[instrument(skip_all)]
pub fn run(mut app: PlanetoidApp) {
    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.run_app(&mut app).expect("Event loop failed");
}
