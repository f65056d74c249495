//! Application lifecycle contract.
//!
//! The runtime owns an [`AppHost`], which drives an [`App`] through
//! `init` → `update`* → `shutdown` and hands it an [`AppCtx`] with the
//! renderer, the window and the queued events.

mod app;
mod ctx;
mod host;

pub use app::{App, AppInfo};
pub use ctx::{AppCtx, Event, RunConfig};
pub use host::{AppHost, Lifecycle};
