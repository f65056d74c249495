use std::sync::Arc;

use anyhow::{anyhow, Context, Result};

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppCtx, AppHost, Event};
use crate::input::translate_window_event;

/// Window and process configuration for [`Runtime::run`].
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Process arguments forwarded to `App::init`, without the program name.
    pub args: Vec<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "vela".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            args: Vec::new(),
        }
    }
}

impl RuntimeConfig {
    /// Default window with the title set and arguments taken from the process.
    pub fn from_env(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            args: std::env::args().skip(1).collect(),
            ..Self::default()
        }
    }
}

/// Entry point for the platform loop.
pub struct Runtime;

impl Runtime {
    /// Opens the window, runs `app` until it stops updating and returns its exit code.
    pub fn run(config: RuntimeConfig, app: Box<dyn App>) -> Result<i32> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = RuntimeState::new(config, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.error.take() {
            Some(err) => Err(err),
            None => Ok(state.exit_code),
        }
    }
}

struct Running {
    window: Arc<Window>,
    host: AppHost,
}

struct RuntimeState {
    config: RuntimeConfig,
    /// Moved into the host once the window exists.
    app: Option<Box<dyn App>>,
    running: Option<Running>,
    exit_code: i32,
    error: Option<anyhow::Error>,
}

impl RuntimeState {
    fn new(config: RuntimeConfig, app: Box<dyn App>) -> Self {
        Self {
            config,
            app: Some(app),
            running: None,
            exit_code: 0,
            error: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let app = self.app.take().ok_or_else(|| anyhow!("application already started"))?;

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let size = window.inner_size();
        let mut host = AppHost::new(app, AppCtx::new(window.clone()));
        host.init(&self.config.args, size.width.max(1), size.height.max(1))
            .with_context(|| format!("failed to initialize `{}`", self.config.title))?;

        window.request_redraw();
        self.running = Some(Running { window, host });
        Ok(())
    }

    fn finish(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut running) = self.running.take() {
            self.exit_code = running.host.shutdown().unwrap_or(0);
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for RuntimeState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() || self.error.is_some() {
            return;
        }
        if let Err(err) = self.start(event_loop) {
            log::error!("{err:#}");
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw: every tick renders a frame.
        if let Some(running) = self.running.as_ref() {
            running.window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(running) = self.running.as_mut() else {
            return;
        };
        if running.window.id() != window_id {
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                running.host.ctx_mut().push_event(Event::Exit);
                running.window.request_redraw();
            }

            WindowEvent::Resized(size) => {
                running.host.ctx_mut().push_event(Event::Resize {
                    width: size.width,
                    height: size.height,
                });
                running.window.request_redraw();
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let size = running.window.inner_size();
                running.host.ctx_mut().push_event(Event::Resize {
                    width: size.width,
                    height: size.height,
                });
            }

            WindowEvent::RedrawRequested => {
                if !running.host.update() {
                    self.finish(event_loop);
                }
            }

            _ => {
                if let Some(ev) = translate_window_event(&event) {
                    running.host.ctx_mut().push_event(Event::Input(ev));
                }
            }
        }
    }

    fn exiting(&mut self, event_loop: &ActiveEventLoop) {
        self.finish(event_loop);
    }
}
