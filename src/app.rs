use std::sync::Arc;

use anyhow::Context;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::{
    config::AppConfig,
    error::FrameError,
    gfx::{rendering::RenderEngine, scene::Scene},
    house,
    render_loop::{FrameOutcome, RenderLoop},
    viewport::Viewport,
};

/// Owns the event loop and everything the viewer needs while it runs.
pub struct LighthouseApp {
    event_loop: Option<EventLoop<()>>,
    state: AppState,
}

/// Scene, viewport and render loop, created in `resumed` and dropped with the app.
struct AppState {
    config: AppConfig,
    window: Option<Arc<Window>>,
    scene: Scene,
    viewport: Option<Viewport<RenderEngine>>,
    render_loop: RenderLoop,
    fatal_error: Option<anyhow::Error>,
}

impl LighthouseApp {
    /// Creates the app with the lighthouse scene.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        Self::with_scene(config, house::build_house_scene())
    }

    /// Creates the app with a caller-built scene.
    pub fn with_scene(config: AppConfig, scene: Scene) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;

        Ok(Self {
            event_loop: Some(event_loop),
            state: AppState {
                config,
                window: None,
                scene,
                viewport: None,
                render_loop: RenderLoop::new(),
                fatal_error: None,
            },
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.state.scene
    }

    /// Runs until the window is closed (consumes self and starts the event loop)
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::Wait);

        event_loop
            .run_app(&mut self.state)
            .context("event loop terminated abnormally")?;

        match self.state.fatal_error.take() {
            Some(err) => Err(err),
            None => {
                log::info!(
                    "Exiting after {} frames",
                    self.state.render_loop.frame_count()
                );
                Ok(())
            }
        }
    }
}

impl AppState {
    fn start(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_config = &self.config.window;
        let attributes = Window::default_attributes()
            .with_title(window_config.title.clone())
            .with_inner_size(PhysicalSize::new(window_config.width, window_config.height))
            .with_maximized(window_config.maximized);
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("failed to create window")?,
        );

        let PhysicalSize { width, height } = window.inner_size();
        let renderer = pollster::block_on(RenderEngine::new(
            window.clone(),
            width,
            height,
            &self.config.render,
        ))
        .context("failed to initialize renderer")?;

        if self.scene.is_empty() {
            house::assemble(&mut self.scene);
        }
        renderer.prepare_scene(&mut self.scene);

        self.viewport = Some(Viewport::new(renderer, &self.config.camera));
        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{:#}", err);
        self.render_loop.handle().stop();
        self.fatal_error = Some(err);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(viewport)) = (self.window.as_ref(), self.viewport.as_mut()) else {
            return;
        };

        match self.render_loop.tick(window.as_ref(), &self.scene, viewport) {
            FrameOutcome::Stopped => event_loop.exit(),
            FrameOutcome::Skipped(err @ FrameError::OutOfMemory) => {
                self.fail(event_loop, anyhow::Error::new(err).context("rendering failed"));
            }
            FrameOutcome::Presented | FrameOutcome::Skipped(_) => {}
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.start(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                self.render_loop.handle().stop();
                event_loop.exit();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(viewport) = self.viewport.as_mut() {
                    viewport.resize(width, height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            other => {
                if let Some(viewport) = self.viewport.as_mut() {
                    viewport.handle_window_event(&other);
                }
            }
        }
    }
}
