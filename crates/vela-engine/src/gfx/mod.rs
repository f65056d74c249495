//! Immediate-mode renderer API.
//!
//! The application sets per-view state (clear, viewport, camera), records draw
//! calls against typed resource handles and ends each frame with
//! [`Gfx::frame`]. Views execute in ascending id order; draws within a view
//! keep submission order. Debug text and the UI overlay are drawn last.

mod backend;
mod context;
mod debug_text;
mod error;
mod flags;
mod frame;
mod handle;
mod layout;
mod shader;
mod types;
mod view;

pub use context::Gfx;
pub use debug_text::{Cell, TextVideoMem, CELL_HEIGHT, CELL_WIDTH, PALETTE};
pub use error::GfxError;
pub use flags::{ClearFlags, CullMode, DebugFlags, DepthTest, ResetFlags, StateFlags, Topology};
pub use frame::{Frame, FrameView, RenderDraw};
pub use handle::{
    Handle, HandleAlloc, IndexBufferHandle, ProgramHandle, VertexBufferHandle, MAX_HANDLES,
};
pub use layout::{Attrib, AttribDecl, AttribType, VertexLayout, VertexLayoutBuilder};
pub use shader::{ShaderLibrary, ShaderSource, ShaderStage};
pub use types::{
    Caps, Init, PciId, PlatformData, RendererType, Resolution, Stats, MAX_DRAW_CALLS, MAX_VIEWS,
};
pub use view::{View, ViewClear, ViewId, ViewRect};
