use crate::gfx::{
    Caps, Frame, GfxError, Handle, IndexBufferHandle, ProgramHandle, Resolution, ShaderSource,
    VertexBufferHandle, VertexLayout,
};
use crate::text::FontSystem;

use super::RendererBackend;

/// Backend that executes nothing. Used headless and in tests.
pub(crate) struct NoopBackend {
    caps: Caps,
}

impl NoopBackend {
    pub(crate) fn new() -> Self {
        log::info!("renderer: noop backend");
        Self { caps: Caps::noop() }
    }
}

impl RendererBackend for NoopBackend {
    fn caps(&self) -> &Caps {
        &self.caps
    }

    fn reset(&mut self, _resolution: &Resolution) {}

    fn create_vertex_buffer(
        &mut self,
        _handle: VertexBufferHandle,
        _data: &[u8],
        _layout: &VertexLayout,
    ) -> Result<(), GfxError> {
        Ok(())
    }

    fn create_index_buffer(
        &mut self,
        _handle: IndexBufferHandle,
        _indices: &[u16],
    ) -> Result<(), GfxError> {
        Ok(())
    }

    fn create_program(
        &mut self,
        _handle: ProgramHandle,
        _vs: &ShaderSource,
        _fs: &ShaderSource,
    ) -> Result<(), GfxError> {
        Ok(())
    }

    fn destroy(&mut self, _handle: Handle) {}

    fn submit(&mut self, frame: &mut Frame, _fonts: &FontSystem) -> Result<(), GfxError> {
        log::trace!(
            "noop frame {}: {} views, {} draws, {} overlay items",
            frame.frame_number,
            frame.views.len(),
            frame.draws.len(),
            frame.overlay.len(),
        );
        Ok(())
    }
}
