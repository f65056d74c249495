//! Backend seam between the `Gfx` front end and a GPU API.

mod noop;
mod gpu;

use crate::text::FontSystem;

use super::{
    Caps, Frame, GfxError, Handle, IndexBufferHandle, Init, ProgramHandle, RendererType,
    Resolution, ShaderSource, VertexBufferHandle, VertexLayout,
};

/// Executes frames and owns GPU-side resources.
///
/// The front end validates handles and arguments before calling in, so
/// backends may assume every handle they receive is live.
pub(crate) trait RendererBackend {
    fn caps(&self) -> &Caps;

    /// Applies a new backbuffer size or reset flags.
    fn reset(&mut self, resolution: &Resolution);

    fn create_vertex_buffer(
        &mut self,
        handle: VertexBufferHandle,
        data: &[u8],
        layout: &VertexLayout,
    ) -> Result<(), GfxError>;

    fn create_index_buffer(
        &mut self,
        handle: IndexBufferHandle,
        indices: &[u16],
    ) -> Result<(), GfxError>;

    fn create_program(
        &mut self,
        handle: ProgramHandle,
        vs: &ShaderSource,
        fs: &ShaderSource,
    ) -> Result<(), GfxError>;

    fn destroy(&mut self, handle: Handle);

    /// Executes and presents `frame`.
    ///
    /// Transient surface problems skip the frame and return `Ok`; an `Err`
    /// means the device is lost.
    fn submit(&mut self, frame: &mut Frame, fonts: &FontSystem) -> Result<(), GfxError>;
}

/// Creates the backend requested by `init`.
pub(crate) fn create(init: &Init) -> Result<Box<dyn RendererBackend>, GfxError> {
    if init.renderer_type == RendererType::Noop {
        return Ok(Box::new(noop::NoopBackend::new()));
    }
    let window = init
        .platform_data
        .window
        .clone()
        .ok_or(GfxError::MissingWindow)?;
    Ok(Box::new(gpu::WgpuBackend::new(init, window)?))
}
