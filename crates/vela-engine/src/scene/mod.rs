//! Overlay draw stream.
//!
//! Debug text and the UI record commands here; the wgpu backend replays them
//! after all views, ordered by z-index then insertion, each with an optional
//! scissor rect.

mod cmd;
mod list;
mod z_index;

pub use cmd::{DrawCmd, RectCmd, TextCmd};
pub use list::{DrawItem, DrawList, SortKey};
pub use z_index::ZIndex;
