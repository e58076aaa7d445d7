//! Interactive volumetric cloud viewer
//!
//! Controls:
//!   WASD / Q E    move horizontally / down, up
//!   Arrows        wind
//!   Z X           coverage down / up
//!   C V           density down / up
//!   O P           sun azimuth
//!   K L           sun elevation
//!   T             toggle temporal accumulation
//!   F             toggle jitter
//!   R             reset cloud parameters
//!   Escape        exit

mod bindings;
mod config;

use bindings::KeyBindings;
use config::ViewerConfig;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;
use stratus_core::{FrameTiming, KeyboardState, RenderLoop, TickOutcome};
use stratus_render::{CloudRenderer, HistoryTexture};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting Stratus cloud viewer");

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut app = App::new(ViewerConfig::default());
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
        return ExitCode::FAILURE;
    }

    if app.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

struct App {
    config: ViewerConfig,
    state: Option<AppState>,
    failed: bool,
}

struct AppState {
    window: Arc<Window>,
    renderer: CloudRenderer,
    render_loop: RenderLoop<HistoryTexture>,
    bindings: KeyBindings,
    keys: KeyboardState,
    started: Instant,
    last_frame: Instant,
}

impl App {
    fn new(config: ViewerConfig) -> Self {
        Self { config, state: None, failed: false }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, what: &str, err: impl std::fmt::Display) {
        log::error!("{}: {}", what, err);
        self.failed = true;
        event_loop.exit();
    }
}

impl AppState {
    fn create(config: &ViewerConfig, window: Arc<Window>) -> stratus_core::Result<Self> {
        let size = window.inner_size();
        let mut renderer =
            CloudRenderer::new(window.clone(), size.width, size.height, config.renderer.clone())?;
        log::info!("Presenting to {:?}", renderer.surface_format());

        let loop_config = config.loop_config.clone().with_size(size.width, size.height);
        let render_loop = RenderLoop::new(loop_config, &mut renderer)?;

        let now = Instant::now();
        Ok(Self {
            window,
            renderer,
            render_loop,
            bindings: config.bindings.clone(),
            keys: KeyboardState::new(),
            started: now,
            last_frame: now,
        })
    }

    fn tick(&mut self) -> TickOutcome {
        let now = Instant::now();
        let timing = FrameTiming::new(
            (now - self.last_frame).as_secs_f32(),
            (now - self.started).as_secs_f32(),
        );
        self.last_frame = now;

        let input = self.keys.snapshot();
        self.render_loop.tick(&mut self.renderer, &input, timing)
    }

    fn key_event(&mut self, event: &KeyEvent) {
        let PhysicalKey::Code(code) = event.physical_key else { return };
        let Some(action) = self.bindings.action(code) else { return };
        match event.state {
            ElementState::Pressed => self.keys.press(action),
            ElementState::Released => self.keys.release(action),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(self.config.width, self.config.height));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, "Failed to create window", e),
        };

        match AppState::create(&self.config, window) {
            Ok(state) => self.state = Some(state),
            Err(e) => self.fail(event_loop, "Failed to start renderer", e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else { return };

        match event {
            WindowEvent::CloseRequested => {
                state.keys.request_close();
                if state.tick() == TickOutcome::Stopped {
                    log::info!("Shutting down");
                    event_loop.exit();
                }
            }

            WindowEvent::KeyboardInput { event, .. } => state.key_event(&event),

            WindowEvent::Focused(false) => state.keys.release_all(),

            WindowEvent::Resized(size) if size.width > 0 && size.height > 0 => {
                let resized =
                    state.render_loop.resize(&mut state.renderer, size.width, size.height);
                if let Err(e) = resized {
                    if e.is_fatal() {
                        return self.fail(event_loop, "Resize failed", e);
                    }
                    log::warn!("Resize failed: {}", e);
                }
            }

            WindowEvent::RedrawRequested => {
                if state.tick() == TickOutcome::Stopped {
                    log::info!("Shutting down");
                    event_loop.exit();
                } else {
                    state.window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }
}
