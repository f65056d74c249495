use crate::math::Mat4;
use crate::scene::DrawList;

use super::{
    DebugFlags, IndexBufferHandle, ProgramHandle, Resolution, StateFlags, VertexBufferHandle,
    View, ViewId,
};

/// One submitted draw call, resolved against its resources.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderDraw {
    pub view: ViewId,
    pub program: ProgramHandle,
    pub state: StateFlags,
    /// Model matrix.
    pub transform: Mat4,
    pub vertex_buffer: VertexBufferHandle,
    pub num_vertices: u32,
    pub index_buffer: Option<IndexBufferHandle>,
    pub num_indices: u32,
}

/// A view that takes part in the frame (touched or drawn into).
#[derive(Debug, Clone, PartialEq)]
pub struct FrameView {
    pub id: ViewId,
    pub view: View,
}

/// Everything recorded between two `Gfx::frame` calls.
///
/// Handed to the backend for execution, then kept as `Gfx::last_frame`.
#[derive(Debug, Default)]
pub struct Frame {
    /// Number of frames submitted so far, this one included.
    pub frame_number: u32,
    pub resolution: Resolution,
    pub debug: DebugFlags,
    /// Ascending by view id.
    pub views: Vec<FrameView>,
    /// Grouped by view (ascending), submission order within a view.
    pub draws: Vec<RenderDraw>,
    /// UI and debug text, drawn after all views.
    pub overlay: DrawList,
}

impl Frame {
    /// Draws submitted to `view` in execution order.
    pub fn draws_for(&self, view: ViewId) -> impl Iterator<Item = (usize, &RenderDraw)> {
        self.draws
            .iter()
            .enumerate()
            .filter(move |(_, d)| d.view == view)
    }
}
