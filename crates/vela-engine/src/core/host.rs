use anyhow::bail;

use super::{App, AppCtx};

/// Lifecycle of a hosted application.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Lifecycle {
    Uninitialized,
    Running,
    ShutDown,
}

/// Owns an application and enforces `init` → `update`* → `shutdown`.
pub struct AppHost {
    app: Box<dyn App>,
    ctx: AppCtx,
    state: Lifecycle,
}

impl AppHost {
    pub fn new(app: Box<dyn App>, ctx: AppCtx) -> Self {
        Self { app, ctx, state: Lifecycle::Uninitialized }
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub fn app(&self) -> &dyn App {
        self.app.as_ref()
    }

    pub fn ctx(&self) -> &AppCtx {
        &self.ctx
    }

    pub fn ctx_mut(&mut self) -> &mut AppCtx {
        &mut self.ctx
    }

    /// Initializes the application. On failure the renderer is shut down and
    /// the host cannot be used again.
    pub fn init(&mut self, args: &[String], width: u32, height: u32) -> anyhow::Result<()> {
        if self.state != Lifecycle::Uninitialized {
            bail!("application `{}` already initialized", self.app.info().name);
        }

        log::info!("init `{}` ({width}x{height})", self.app.info().name);
        if let Err(err) = self.app.init(&mut self.ctx, args, width, height) {
            self.ctx.gfx.shutdown();
            self.state = Lifecycle::ShutDown;
            return Err(err);
        }
        self.state = Lifecycle::Running;
        Ok(())
    }

    /// Runs one tick. Returns `false` when not running or when the
    /// application asked to exit.
    pub fn update(&mut self) -> bool {
        if self.state != Lifecycle::Running {
            return false;
        }
        self.app.update(&mut self.ctx)
    }

    /// Shuts the application down. Returns `None` when it was not running.
    pub fn shutdown(&mut self) -> Option<i32> {
        if self.state != Lifecycle::Running {
            return None;
        }
        let code = self.app.shutdown(&mut self.ctx);
        self.state = Lifecycle::ShutDown;
        log::info!("`{}` exited with code {code}", self.app.info().name);
        Some(code)
    }
}
