use super::ctx::AppCtx;

/// Static description shown by example dialogs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub name: String,
    pub description: String,
    pub url: String,
}

impl AppInfo {
    pub fn new(name: impl Into<String>, description: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            url: url.into(),
        }
    }
}

/// Application lifecycle driven by the runtime.
///
/// `init` runs once, `update` once per tick until it returns `false`, then
/// `shutdown` once. See [`AppHost`](super::AppHost) for the guarded sequence.
pub trait App {
    fn info(&self) -> &AppInfo;

    /// Sets up the renderer and resources. An error is fatal to the process.
    fn init(&mut self, ctx: &mut AppCtx, args: &[String], width: u32, height: u32) -> anyhow::Result<()>;

    /// Runs one tick. Returns `false` once exit was requested.
    fn update(&mut self, ctx: &mut AppCtx) -> bool;

    /// Releases resources and shuts the renderer down. Returns the exit code.
    fn shutdown(&mut self, ctx: &mut AppCtx) -> i32;
}
