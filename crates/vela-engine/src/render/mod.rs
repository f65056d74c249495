//! Overlay rendering.
//!
//! Renderers consume `scene` draw lists (UI widgets, debug text) and draw them
//! on top of the frame's view passes. Each renderer owns its GPU resources.
//!
//! Convention:
//! - CPU geometry is in backbuffer pixels (top-left origin, +Y down).
//! - Vertex shader converts to NDC using a viewport uniform.

mod ctx;
mod overlay;
pub mod shapes;

pub use ctx::{RenderCtx, RenderTarget};
pub use overlay::OverlayRenderer;
