//! Vela UI: immediate-mode debug UI on top of `vela-engine`.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use vela_ui::{Cond, Ui, UiInput};
//!
//! let mut ui = Ui::new(font);
//!
//! // Every frame:
//! ui.begin_frame(UiInput::new(&mouse, width, height), ctx.gfx.fonts());
//! ui.set_next_window_pos(10.0, 50.0, Cond::FirstUseEver);
//! ui.begin("Settings");
//! ui.checkbox("Write R", &mut write_r);
//! ui.combo("Primitive topology", &mut topology, &["Triangle List", "Line List"]);
//! ui.end();
//! ui.end_frame(&mut ctx.gfx);
//! ```
//!
//! Geometry is queued on the renderer overlay and drawn after all views.

mod input;
mod metrics;
mod painter;
mod style;
mod ui;

pub use input::{UiButtons, UiInput};
pub use style::Style;
pub use ui::{visible_label, Cond, Ui};
