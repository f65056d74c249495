//! The renderer front end.
//!
//! `Gfx` accumulates per-view state and draw calls on the calling thread and
//! hands one [`Frame`] per `frame()` call to the active backend.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::time::Duration;

use bytemuck::Pod;

use crate::math::{Mat4, IDENTITY};
use crate::scene::{DrawList, ZIndex};
use crate::text::{FontId, FontLoadError, FontSystem};
use crate::time::FrameClock;

use super::backend::{self, RendererBackend};
use super::debug_text::{TextVideoMem, CELL_WIDTH};
use super::{
    Caps, ClearFlags, DebugFlags, Frame, FrameView, GfxError, Handle, HandleAlloc,
    IndexBufferHandle, Init, ProgramHandle, RenderDraw, RendererType, ResetFlags, Resolution,
    ShaderLibrary, ShaderSource, ShaderStage, StateFlags, Stats, VertexBufferHandle,
    VertexLayout, View, ViewId, MAX_DRAW_CALLS, MAX_HANDLES, MAX_VIEWS,
};

/// Attribute of the stats block: white on dark gray.
const STATS_ATTR: u8 = 0x8f;

// ── resource tables ───────────────────────────────────────────────────────

/// Handle allocator plus per-handle metadata.
struct ResourceTable<T> {
    alloc: HandleAlloc,
    entries: Vec<Option<T>>,
}

impl<T> ResourceTable<T> {
    fn new() -> Self {
        Self { alloc: HandleAlloc::new(MAX_HANDLES), entries: Vec::new() }
    }

    fn insert(&mut self, value: T) -> Option<u16> {
        let idx = self.alloc.alloc()?;
        let slot = idx as usize;
        if self.entries.len() <= slot {
            self.entries.resize_with(slot + 1, || None);
        }
        self.entries[slot] = Some(value);
        Some(idx)
    }

    fn get(&self, idx: u16) -> Option<&T> {
        self.entries.get(idx as usize)?.as_ref()
    }

    fn remove(&mut self, idx: u16) -> Option<T> {
        if !self.alloc.free(idx) {
            return None;
        }
        self.entries.get_mut(idx as usize)?.take()
    }

    fn live(&self) -> impl Iterator<Item = u16> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_some())
            .map(|(i, _)| i as u16)
    }

    fn len(&self) -> usize {
        self.alloc.len()
    }
}

struct VertexBufferInfo {
    num_vertices: u32,
}

struct IndexBufferInfo {
    num_indices: u32,
}

struct ProgramInfo {
    name: String,
}

/// State accumulated by `set_*` calls and consumed by `submit`.
#[derive(Debug, Copy, Clone)]
struct DrawState {
    transform: Mat4,
    state: StateFlags,
    vertex_buffer: Option<VertexBufferHandle>,
    index_buffer: Option<IndexBufferHandle>,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: IDENTITY,
            state: StateFlags::DEFAULT,
            vertex_buffer: None,
            index_buffer: None,
        }
    }
}

// ── Gfx ───────────────────────────────────────────────────────────────────

/// Renderer handle owned by the application.
///
/// Resource creation returns `Result`; per-frame calls never fail: misuse is
/// logged once per kind and the call is ignored.
pub struct Gfx {
    backend: Option<Box<dyn RendererBackend>>,
    caps: Caps,
    resolution: Resolution,
    debug: DebugFlags,

    views: Vec<View>,
    used_views: BTreeSet<ViewId>,
    draw_state: DrawState,
    draws: Vec<RenderDraw>,
    overlay: DrawList,

    text: TextVideoMem,
    debug_font: Option<(FontId, f32)>,
    fonts: FontSystem,
    shaders: ShaderLibrary,

    vertex_buffers: ResourceTable<VertexBufferInfo>,
    index_buffers: ResourceTable<IndexBufferInfo>,
    programs: ResourceTable<ProgramInfo>,

    stats: Stats,
    clock: FrameClock,
    frame_count: u32,
    last_frame: Frame,
    device_lost: bool,
    warned: HashSet<&'static str>,
}

impl Default for Gfx {
    fn default() -> Self {
        Self::new()
    }
}

impl Gfx {
    pub fn new() -> Self {
        let resolution = Resolution::default();
        Self {
            backend: None,
            caps: Caps::noop(),
            resolution,
            debug: DebugFlags::empty(),
            views: vec![View::default(); MAX_VIEWS as usize],
            used_views: BTreeSet::new(),
            draw_state: DrawState::default(),
            draws: Vec::new(),
            overlay: DrawList::new(),
            text: TextVideoMem::new(resolution.width, resolution.height),
            debug_font: None,
            fonts: FontSystem::new(),
            shaders: ShaderLibrary::builtin(),
            vertex_buffers: ResourceTable::new(),
            index_buffers: ResourceTable::new(),
            programs: ResourceTable::new(),
            stats: Stats::default(),
            clock: FrameClock::with_clamps(Duration::ZERO, Duration::from_secs(60)),
            frame_count: 0,
            last_frame: Frame::default(),
            device_lost: false,
            warned: HashSet::new(),
        }
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    /// Creates the backend selected by `init.renderer_type`.
    pub fn init(&mut self, init: Init) -> Result<(), GfxError> {
        if self.backend.is_some() {
            return Err(GfxError::AlreadyInitialized);
        }

        let backend = backend::create(&init)?;
        self.caps = backend.caps().clone();
        self.backend = Some(backend);
        self.resolution = init.resolution;
        self.text.resize(self.resolution.width, self.resolution.height);
        self.clock.reset();

        log::info!(
            "renderer initialized: {} on {} ({}x{})",
            self.caps.renderer_type,
            self.caps.device_name,
            self.resolution.width,
            self.resolution.height,
        );
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.backend.is_some()
    }

    /// Destroys the backend and every remaining resource. Leaked handles are reported.
    pub fn shutdown(&mut self) {
        let Some(mut backend) = self.backend.take() else {
            return;
        };

        let leaked = self.vertex_buffers.len() + self.index_buffers.len() + self.programs.len();
        if leaked > 0 {
            log::warn!(
                "shutdown with {leaked} live resources ({} vertex buffers, {} index buffers, {} programs)",
                self.vertex_buffers.len(),
                self.index_buffers.len(),
                self.programs.len(),
            );
        }
        for idx in self.vertex_buffers.live() {
            backend.destroy(Handle::VertexBuffer(VertexBufferHandle(idx)));
        }
        for idx in self.index_buffers.live() {
            backend.destroy(Handle::IndexBuffer(IndexBufferHandle(idx)));
        }
        for idx in self.programs.live() {
            backend.destroy(Handle::Program(ProgramHandle(idx)));
        }
        drop(backend);

        *self = Self::new();
        log::info!("renderer shut down");
    }

    /// Active backend type; `Noop` before `init`.
    pub fn renderer_type(&self) -> RendererType {
        self.caps.renderer_type
    }

    pub fn caps(&self) -> &Caps {
        &self.caps
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// True once the backend reported a fatal device or surface error.
    pub fn is_device_lost(&self) -> bool {
        self.device_lost
    }

    // ── global state ──────────────────────────────────────────────────────

    pub fn set_debug(&mut self, flags: DebugFlags) {
        self.debug = flags;
    }

    pub fn debug(&self) -> DebugFlags {
        self.debug
    }

    /// Resizes the backbuffer and applies reset flags (vsync, MSAA).
    pub fn reset(&mut self, width: u32, height: u32, flags: ResetFlags) {
        let resolution = Resolution { width: width.max(1), height: height.max(1), reset: flags };
        if resolution == self.resolution {
            return;
        }
        self.resolution = resolution;
        self.text.resize(resolution.width, resolution.height);
        if let Some(backend) = self.backend.as_mut() {
            backend.reset(&resolution);
        }
        log::debug!("reset {}x{} {:?}", resolution.width, resolution.height, flags);
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    // ── views ─────────────────────────────────────────────────────────────

    pub fn set_view_clear(&mut self, id: ViewId, flags: ClearFlags, rgba: u32, depth: f32, stencil: u8) {
        if let Some(view) = self.view_mut(id) {
            view.clear.flags = flags;
            view.clear.rgba = rgba;
            view.clear.depth = depth;
            view.clear.stencil = stencil;
        }
    }

    /// Sets the view's viewport in backbuffer pixels. Zero size covers the backbuffer.
    pub fn set_view_rect(&mut self, id: ViewId, x: u16, y: u16, width: u16, height: u16) {
        if let Some(view) = self.view_mut(id) {
            view.rect = super::ViewRect { x, y, width, height };
        }
    }

    pub fn set_view_transform(&mut self, id: ViewId, view: &Mat4, proj: &Mat4) {
        if let Some(v) = self.view_mut(id) {
            v.view = *view;
            v.proj = *proj;
        }
    }

    /// Marks the view as used this frame so it is cleared even without draws.
    pub fn touch(&mut self, id: ViewId) {
        if self.view_mut(id).is_some() {
            self.used_views.insert(id);
        }
    }

    fn view_mut(&mut self, id: ViewId) -> Option<&mut View> {
        if id >= MAX_VIEWS {
            self.warn_once("view-range", format_args!("view {id} out of range (max {MAX_VIEWS})"));
            return None;
        }
        self.views.get_mut(id as usize)
    }

    // ── draw state ────────────────────────────────────────────────────────

    /// Model matrix for the next submit.
    pub fn set_transform(&mut self, mtx: &Mat4) {
        self.draw_state.transform = *mtx;
    }

    pub fn set_vertex_buffer(&mut self, handle: VertexBufferHandle) {
        self.draw_state.vertex_buffer = Some(handle);
    }

    pub fn set_index_buffer(&mut self, handle: IndexBufferHandle) {
        self.draw_state.index_buffer = Some(handle);
    }

    pub fn set_state(&mut self, state: StateFlags) {
        self.draw_state.state = state;
    }

    /// Records a draw into `view` with the accumulated state, then resets that state.
    ///
    /// Draws with missing or stale resources are dropped with a warning.
    pub fn submit(&mut self, view: ViewId, program: ProgramHandle) {
        let state = std::mem::take(&mut self.draw_state);

        if self.backend.is_none() {
            self.warn_once("submit-uninit", format_args!("submit before init; draw dropped"));
            return;
        }
        if view >= MAX_VIEWS {
            self.warn_once("view-range", format_args!("view {view} out of range (max {MAX_VIEWS})"));
            return;
        }
        if self.draws.len() >= MAX_DRAW_CALLS as usize {
            self.warn_once("draw-limit", format_args!("more than {MAX_DRAW_CALLS} draws in one frame; extra draws dropped"));
            return;
        }
        if self.programs.get(program.idx()).is_none() {
            self.warn_once("submit-program", format_args!("submit with invalid program {program:?}; draw dropped"));
            return;
        }
        let Some(vertex_buffer) = state.vertex_buffer else {
            self.warn_once("submit-vb", format_args!("submit without vertex buffer; draw dropped"));
            return;
        };
        let Some(vb) = self.vertex_buffers.get(vertex_buffer.idx()) else {
            self.warn_once("submit-vb", format_args!("submit with invalid vertex buffer {vertex_buffer:?}; draw dropped"));
            return;
        };
        let num_vertices = vb.num_vertices;

        let num_indices = match state.index_buffer {
            None => 0,
            Some(ib) => match self.index_buffers.get(ib.idx()) {
                Some(info) => info.num_indices,
                None => {
                    self.warn_once("submit-ib", format_args!("submit with invalid index buffer {ib:?}; draw dropped"));
                    return;
                }
            },
        };

        self.draws.push(RenderDraw {
            view,
            program,
            state: state.state,
            transform: state.transform,
            vertex_buffer,
            num_vertices,
            index_buffer: state.index_buffer,
            num_indices,
        });
        self.used_views.insert(view);
    }

    /// Ends the frame: executes all recorded views, draws and overlays.
    ///
    /// Returns the number of frames submitted so far (the first frame is 1).
    pub fn frame(&mut self) -> u32 {
        if self.backend.is_none() {
            self.warn_once("frame-uninit", format_args!("frame before init"));
        }

        self.frame_count = self.frame_count.wrapping_add(1);
        let dt = self.clock.tick().dt;

        // Stable: submission order is kept within each view.
        self.draws.sort_by_key(|d| d.view);
        let views: Vec<FrameView> = self
            .used_views
            .iter()
            .map(|&id| FrameView { id, view: self.views[id as usize] })
            .collect();

        self.stats = Stats {
            frame_number: self.frame_count,
            cpu_time_frame_ms: dt * 1000.0,
            num_draws: self.draws.len() as u32,
            num_views: views.len() as u32,
            width: self.resolution.width,
            height: self.resolution.height,
            text_width: self.text.width(),
            text_height: self.text.height(),
            num_vertex_buffers: self.vertex_buffers.len() as u32,
            num_index_buffers: self.index_buffers.len() as u32,
            num_programs: self.programs.len() as u32,
        };

        let mut overlay = DrawList::new();
        overlay.append(&self.overlay, 0);
        if self.debug.contains(DebugFlags::STATS) {
            self.stats_text().to_draw_list(&mut overlay, self.debug_font, ZIndex::DEBUG_TEXT);
        } else if self.debug.contains(DebugFlags::TEXT) {
            self.text.to_draw_list(&mut overlay, self.debug_font, ZIndex::DEBUG_TEXT);
        }

        let mut frame = Frame {
            frame_number: self.frame_count,
            resolution: self.resolution,
            debug: self.debug,
            views,
            draws: std::mem::take(&mut self.draws),
            overlay,
        };

        if let Some(backend) = self.backend.as_mut() {
            if !self.device_lost {
                if let Err(err) = backend.submit(&mut frame, &self.fonts) {
                    log::error!("frame {} failed: {err}", self.frame_count);
                    self.device_lost = true;
                }
            }
        }

        self.last_frame = frame;
        self.used_views.clear();
        self.overlay.clear();
        self.draw_state = DrawState::default();
        self.frame_count
    }

    /// The most recently submitted frame.
    pub fn last_frame(&self) -> &Frame {
        &self.last_frame
    }

    /// Queues 2D overlay items (UI) for the current frame.
    pub fn submit_overlay(&mut self, list: &DrawList) {
        self.overlay.append(list, 0);
    }

    // ── resources ─────────────────────────────────────────────────────────

    /// Uploads static vertex data described by `layout`.
    pub fn create_vertex_buffer<T: Pod>(
        &mut self,
        vertices: &[T],
        layout: &VertexLayout,
    ) -> Result<VertexBufferHandle, GfxError> {
        let backend = self.backend.as_mut().ok_or(GfxError::NotInitialized)?;
        let bytes: &[u8] = bytemuck::cast_slice(vertices);
        if bytes.is_empty() {
            return Err(GfxError::EmptyBuffer);
        }
        let stride = layout.stride();
        if stride == 0 || bytes.len() % stride as usize != 0 {
            return Err(GfxError::LayoutMismatch { len: bytes.len(), stride });
        }

        let num_vertices = (bytes.len() / stride as usize) as u32;
        let idx = self
            .vertex_buffers
            .insert(VertexBufferInfo { num_vertices })
            .ok_or(GfxError::HandlesExhausted)?;
        let handle = VertexBufferHandle(idx);
        if let Err(err) = backend.create_vertex_buffer(handle, bytes, layout) {
            self.vertex_buffers.remove(idx);
            return Err(err);
        }
        log::debug!("vertex buffer {idx}: {num_vertices} vertices, stride {stride}");
        Ok(handle)
    }

    /// Uploads static 16-bit indices.
    pub fn create_index_buffer(&mut self, indices: &[u16]) -> Result<IndexBufferHandle, GfxError> {
        let backend = self.backend.as_mut().ok_or(GfxError::NotInitialized)?;
        if indices.is_empty() {
            return Err(GfxError::EmptyBuffer);
        }

        let idx = self
            .index_buffers
            .insert(IndexBufferInfo { num_indices: indices.len() as u32 })
            .ok_or(GfxError::HandlesExhausted)?;
        let handle = IndexBufferHandle(idx);
        if let Err(err) = backend.create_index_buffer(handle, indices) {
            self.index_buffers.remove(idx);
            return Err(err);
        }
        log::debug!("index buffer {idx}: {} indices", indices.len());
        Ok(handle)
    }

    /// Adds a shader to the library used by [`load_program`](Self::load_program).
    pub fn register_shader(&mut self, shader: ShaderSource) {
        self.shaders.register(shader);
    }

    /// Links the named vertex and fragment shaders into a program.
    pub fn load_program(&mut self, vs_name: &str, fs_name: &str) -> Result<ProgramHandle, GfxError> {
        let backend = self.backend.as_mut().ok_or(GfxError::NotInitialized)?;
        let vs = self.shaders.get(vs_name, ShaderStage::Vertex)?;
        let fs = self.shaders.get(fs_name, ShaderStage::Fragment)?;

        let idx = self
            .programs
            .insert(ProgramInfo { name: format!("{vs_name}+{fs_name}") })
            .ok_or(GfxError::HandlesExhausted)?;
        let handle = ProgramHandle(idx);
        if let Err(err) = backend.create_program(handle, vs, fs) {
            self.programs.remove(idx);
            return Err(err);
        }
        log::debug!("program {idx}: {vs_name} + {fs_name}");
        Ok(handle)
    }

    /// Releases a resource. Unknown or already destroyed handles are logged and ignored.
    pub fn destroy(&mut self, handle: impl Into<Handle>) {
        let handle = handle.into();
        let removed = match handle {
            Handle::VertexBuffer(h) => self.vertex_buffers.remove(h.idx()).is_some(),
            Handle::IndexBuffer(h) => self.index_buffers.remove(h.idx()).is_some(),
            Handle::Program(h) => match self.programs.remove(h.idx()) {
                Some(info) => {
                    log::debug!("program {} ({}) destroyed", h.idx(), info.name);
                    true
                }
                None => false,
            },
        };
        if !removed {
            log::warn!("destroy: invalid handle {handle:?}");
            return;
        }
        if let Some(backend) = self.backend.as_mut() {
            backend.destroy(handle);
        }
    }

    pub fn is_valid(&self, handle: impl Into<Handle>) -> bool {
        match handle.into() {
            Handle::VertexBuffer(h) => self.vertex_buffers.get(h.idx()).is_some(),
            Handle::IndexBuffer(h) => self.index_buffers.get(h.idx()).is_some(),
            Handle::Program(h) => self.programs.get(h.idx()).is_some(),
        }
    }

    // ── debug text ────────────────────────────────────────────────────────

    pub fn dbg_text_clear(&mut self, attr: u8) {
        self.text.clear(attr);
    }

    /// Prints at character cell (`x`, `y`). See [`TextVideoMem::print`] for escapes.
    pub fn dbg_text_print(&mut self, x: u16, y: u16, attr: u8, text: &str) {
        self.text.print(x, y, attr, text);
    }

    /// Copies a block of (char, attr) byte pairs; `pitch` is in bytes.
    pub fn dbg_text_image(&mut self, x: u16, y: u16, width: u16, height: u16, data: &[u8], pitch: usize) {
        self.text.image(x, y, width, height, data, pitch);
    }

    pub fn dbg_text(&self) -> &TextVideoMem {
        &self.text
    }

    // ── fonts ─────────────────────────────────────────────────────────────

    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        self.fonts.load_font(bytes)
    }

    /// Sets the font used to draw debug text glyphs, sized to the cell width.
    ///
    /// Without one only debug text backgrounds are drawn.
    pub fn set_debug_font(&mut self, font: Option<FontId>) {
        self.debug_font = font.and_then(|id| {
            let size = self.fonts.size_for_advance(id, CELL_WIDTH as f32)?;
            Some((id, size))
        });
    }

    pub fn fonts(&self) -> &FontSystem {
        &self.fonts
    }

    // ── helpers ───────────────────────────────────────────────────────────

    fn stats_text(&self) -> TextVideoMem {
        let mut mem = TextVideoMem::new(self.resolution.width, self.resolution.height);
        let s = &self.stats;
        let fps = if s.cpu_time_frame_ms > 0.0 { 1000.0 / s.cpu_time_frame_ms } else { 0.0 };
        let lines = [
            format!(" Renderer: {} ({}) ", self.caps.renderer_type, self.caps.device_name),
            format!(" Frame: {:7.3} ms, {:6.1} FPS ", s.cpu_time_frame_ms, fps),
            format!(" Draws: {}, views: {} ", s.num_draws, s.num_views),
            format!(
                " Backbuffer: {}W x {}H, text {}W x {}H ",
                s.width, s.height, s.text_width, s.text_height
            ),
            format!(
                " Resources: {} VB, {} IB, {} programs ",
                s.num_vertex_buffers, s.num_index_buffers, s.num_programs
            ),
        ];
        for (y, line) in lines.iter().enumerate() {
            mem.print(0, y as u16, STATS_ATTR, line);
        }
        mem
    }

    fn warn_once(&mut self, key: &'static str, msg: fmt::Arguments<'_>) {
        if self.warned.insert(key) {
            log::warn!("{msg}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{Attrib, AttribType};
    use crate::scene::DrawCmd;

    fn headless() -> Gfx {
        let mut gfx = Gfx::new();
        gfx.init(Init { renderer_type: RendererType::Noop, ..Init::default() })
            .unwrap();
        gfx
    }

    fn layout() -> VertexLayout {
        VertexLayout::builder()
            .add(Attrib::Position, 3, AttribType::Float, false)
            .end()
            .unwrap()
    }

    fn triangle(gfx: &mut Gfx) -> (VertexBufferHandle, ProgramHandle) {
        let verts: [[f32; 3]; 3] = [[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let vb = gfx.create_vertex_buffer(&verts, &layout()).unwrap();
        let prog = gfx.load_program("vs_cubes", "fs_cubes").unwrap();
        (vb, prog)
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn init_twice_fails() {
        let mut gfx = headless();
        let again = gfx.init(Init { renderer_type: RendererType::Noop, ..Init::default() });
        assert_eq!(again, Err(GfxError::AlreadyInitialized));
    }

    #[test]
    fn gpu_backend_needs_window() {
        let mut gfx = Gfx::new();
        assert_eq!(gfx.init(Init::default()), Err(GfxError::MissingWindow));
        assert!(!gfx.is_initialized());
    }

    #[test]
    fn resources_need_init() {
        let mut gfx = Gfx::new();
        assert_eq!(gfx.create_index_buffer(&[0, 1, 2]), Err(GfxError::NotInitialized));
    }

    #[test]
    fn shutdown_resets_state() {
        let mut gfx = headless();
        triangle(&mut gfx);
        gfx.frame();
        gfx.shutdown();
        assert!(!gfx.is_initialized());
        assert_eq!(gfx.renderer_type(), RendererType::Noop);
        assert_eq!(gfx.stats().frame_number, 0);
    }

    // ── resources ─────────────────────────────────────────────────────────

    #[test]
    fn vertex_data_must_match_stride() {
        let mut gfx = headless();
        let bad = [0.0f32; 4];
        assert_eq!(
            gfx.create_vertex_buffer(&bad, &layout()),
            Err(GfxError::LayoutMismatch { len: 16, stride: 12 })
        );
        let empty: [f32; 0] = [];
        assert_eq!(gfx.create_vertex_buffer(&empty, &layout()), Err(GfxError::EmptyBuffer));
    }

    #[test]
    fn unknown_shader_is_an_error() {
        let mut gfx = headless();
        assert_eq!(
            gfx.load_program("vs_missing", "fs_cubes"),
            Err(GfxError::ShaderNotFound("vs_missing".to_string()))
        );
    }

    #[test]
    fn destroyed_handles_are_invalid_and_recycled() {
        let mut gfx = headless();
        let ib = gfx.create_index_buffer(&[0, 1, 2]).unwrap();
        assert!(gfx.is_valid(ib));
        gfx.destroy(ib);
        assert!(!gfx.is_valid(ib));
        gfx.destroy(ib); // logged, ignored
        let again = gfx.create_index_buffer(&[0, 1, 2]).unwrap();
        assert_eq!(again, ib);
    }

    // ── submission ────────────────────────────────────────────────────────

    #[test]
    fn frame_numbers_start_at_one() {
        let mut gfx = headless();
        assert_eq!(gfx.frame(), 1);
        assert_eq!(gfx.frame(), 2);
        assert_eq!(gfx.last_frame().frame_number, 2);
    }

    #[test]
    fn draws_are_grouped_by_view_in_submission_order() {
        let mut gfx = headless();
        let (vb, prog) = triangle(&mut gfx);

        for (view, x) in [(1, 1.0), (0, 2.0), (1, 3.0)] {
            let mut mtx = IDENTITY;
            mtx[12] = x;
            gfx.set_transform(&mtx);
            gfx.set_vertex_buffer(vb);
            gfx.submit(view, prog);
        }
        gfx.frame();

        let frame = gfx.last_frame();
        let order: Vec<(ViewId, f32)> = frame.draws.iter().map(|d| (d.view, d.transform[12])).collect();
        assert_eq!(order, vec![(0, 2.0), (1, 1.0), (1, 3.0)]);
        assert_eq!(frame.views.iter().map(|v| v.id).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(frame.draws[0].num_vertices, 3);
        assert_eq!(gfx.stats().num_draws, 3);
    }

    #[test]
    fn submit_resets_draw_state() {
        let mut gfx = headless();
        let (vb, prog) = triangle(&mut gfx);
        gfx.set_vertex_buffer(vb);
        gfx.set_state(StateFlags::WRITE_RGB);
        gfx.submit(0, prog);
        gfx.submit(0, prog); // no vertex buffer bound: dropped
        gfx.frame();

        let draws = &gfx.last_frame().draws;
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].state, StateFlags::WRITE_RGB);
    }

    #[test]
    fn index_count_comes_from_buffer() {
        let mut gfx = headless();
        let (vb, prog) = triangle(&mut gfx);
        let ib = gfx.create_index_buffer(&[0, 1, 2, 2, 1, 0]).unwrap();
        gfx.set_vertex_buffer(vb);
        gfx.set_index_buffer(ib);
        gfx.submit(0, prog);
        gfx.frame();
        let draw = &gfx.last_frame().draws[0];
        assert_eq!(draw.index_buffer, Some(ib));
        assert_eq!(draw.num_indices, 6);
    }

    #[test]
    fn touched_view_without_draws_is_in_frame() {
        let mut gfx = headless();
        gfx.set_view_clear(3, ClearFlags::COLOR, 0x303030ff, 1.0, 0);
        gfx.touch(3);
        gfx.frame();
        let views = &gfx.last_frame().views;
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].view.clear.rgba, 0x303030ff);
        gfx.frame();
        assert!(gfx.last_frame().views.is_empty());
    }

    // ── debug text ────────────────────────────────────────────────────────

    #[test]
    fn text_grid_follows_reset() {
        let mut gfx = headless();
        gfx.reset(800, 600, ResetFlags::VSYNC);
        gfx.frame();
        assert_eq!((gfx.stats().text_width, gfx.stats().text_height), (100, 37));
        assert_eq!(gfx.resolution().reset, ResetFlags::VSYNC);
    }

    #[test]
    fn stats_overlay_replaces_text() {
        let mut gfx = headless();
        gfx.dbg_text_print(0, 0, 0x0f, "plain");

        gfx.set_debug(DebugFlags::TEXT);
        gfx.frame();
        // No background color and no font: nothing to draw.
        assert!(gfx.last_frame().overlay.is_empty());

        gfx.set_debug(DebugFlags::STATS);
        gfx.frame();
        let rects = gfx
            .last_frame()
            .overlay
            .items()
            .iter()
            .filter(|i| matches!(i.cmd, DrawCmd::Rect(_)))
            .count();
        assert_eq!(rects, 5);
    }

    #[test]
    fn ui_overlay_is_per_frame() {
        let mut gfx = headless();
        let mut list = DrawList::new();
        list.push_rect(ZIndex(0), crate::coords::Rect::new(0.0, 0.0, 4.0, 4.0), crate::paint::Color::from_rgba_u32(0xffffffff));
        gfx.submit_overlay(&list);
        gfx.frame();
        assert_eq!(gfx.last_frame().overlay.len(), 1);
        gfx.frame();
        assert!(gfx.last_frame().overlay.is_empty());
    }
}
