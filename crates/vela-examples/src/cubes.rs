//! Rendering a simple static mesh: an 11×11 grid of spinning cubes.

use anyhow::Context;
use bytemuck::{Pod, Zeroable};

use vela_engine::core::{App, AppCtx, AppInfo, RunConfig};
use vela_engine::gfx::{
    Attrib, AttribType, ClearFlags, DebugFlags, Gfx, GfxError, IndexBufferHandle, ProgramHandle,
    StateFlags, VertexBufferHandle, VertexLayout,
};
use vela_engine::input::MouseState;
use vela_engine::math::{mtx_look_at, mtx_proj, mtx_rotate_xy};
use vela_engine::time::FrameClock;
use vela_ui::{Cond, Ui, UiInput};

use crate::common::{self, Args};

const CLEAR_RGBA: u32 = 0x303030ff;
const GRID: u32 = 11;

/// Cube corner: position and packed ABGR color.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PosColorVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub abgr: u32,
}

impl PosColorVertex {
    const fn new(x: f32, y: f32, z: f32, abgr: u32) -> Self {
        Self { x, y, z, abgr }
    }

    pub fn layout() -> Result<VertexLayout, GfxError> {
        VertexLayout::builder()
            .add(Attrib::Position, 3, AttribType::Float, false)
            .add(Attrib::Color0, 4, AttribType::Uint8, true)
            .end()
    }
}

#[rustfmt::skip]
pub const CUBE_VERTICES: [PosColorVertex; 8] = [
    PosColorVertex::new(-1.0,  1.0,  1.0, 0xff000000),
    PosColorVertex::new( 1.0,  1.0,  1.0, 0xff0000ff),
    PosColorVertex::new(-1.0, -1.0,  1.0, 0xff00ff00),
    PosColorVertex::new( 1.0, -1.0,  1.0, 0xff00ffff),
    PosColorVertex::new(-1.0,  1.0, -1.0, 0xffff0000),
    PosColorVertex::new( 1.0,  1.0, -1.0, 0xffff00ff),
    PosColorVertex::new(-1.0, -1.0, -1.0, 0xffffff00),
    PosColorVertex::new( 1.0, -1.0, -1.0, 0xffffffff),
];

#[rustfmt::skip]
pub const CUBE_TRI_LIST: [u16; 36] = [
    0, 1, 2,
    1, 3, 2,
    4, 6, 5,
    5, 6, 7,
    0, 2, 4,
    4, 2, 6,
    1, 5, 3,
    5, 7, 3,
    0, 4, 1,
    4, 5, 1,
    2, 3, 6,
    6, 3, 7,
];

pub const CUBE_TRI_STRIP: [u16; 14] = [0, 1, 2, 3, 7, 1, 5, 0, 4, 2, 6, 7, 4, 5];

#[rustfmt::skip]
pub const CUBE_LINE_LIST: [u16; 24] = [
    0, 1,
    0, 2,
    0, 4,
    1, 3,
    1, 5,
    2, 3,
    2, 6,
    3, 7,
    4, 5,
    4, 6,
    5, 7,
    6, 7,
];

#[rustfmt::skip]
pub const CUBE_LINE_STRIP: [u16; 17] = [
    0, 2, 3, 1, 5, 7, 6, 4,
    0, 2, 6, 4, 5, 7, 3, 1,
    0,
];

pub const CUBE_POINTS: [u16; 8] = [0, 1, 2, 3, 4, 5, 6, 7];

pub const TOPOLOGY_NAMES: [&str; 5] = [
    "Triangle List",
    "Triangle Strip",
    "Lines",
    "Line Strip",
    "Points",
];

pub const TOPOLOGY_STATE: [StateFlags; 5] = [
    StateFlags::empty(),
    StateFlags::PT_TRISTRIP,
    StateFlags::PT_LINES,
    StateFlags::PT_LINESTRIP,
    StateFlags::PT_POINTS,
];

const _: () = assert!(TOPOLOGY_NAMES.len() == TOPOLOGY_STATE.len());

/// Channels written by the cubes, toggled from the settings window.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WriteMask {
    pub r: bool,
    pub g: bool,
    pub b: bool,
    pub a: bool,
}

impl Default for WriteMask {
    fn default() -> Self {
        Self { r: true, g: true, b: true, a: true }
    }
}

/// Render state for the cubes: the selected channel writes and topology on
/// top of depth write, depth test, culling and MSAA.
pub fn cube_state(mask: WriteMask, topology: usize) -> StateFlags {
    let mut state = StateFlags::WRITE_Z
        | StateFlags::DEPTH_TEST_LESS
        | StateFlags::CULL_CW
        | StateFlags::MSAA
        | TOPOLOGY_STATE.get(topology).copied().unwrap_or(StateFlags::empty());
    state.set(StateFlags::WRITE_R, mask.r);
    state.set(StateFlags::WRITE_G, mask.g);
    state.set(StateFlags::WRITE_B, mask.b);
    state.set(StateFlags::WRITE_A, mask.a);
    state
}

/// GPU resources created in `init`.
#[derive(Debug)]
struct Resources {
    vbh: VertexBufferHandle,
    ibh: [IndexBufferHandle; 5],
    program: ProgramHandle,
}

impl Resources {
    fn create(gfx: &mut Gfx) -> Result<Self, GfxError> {
        let layout = PosColorVertex::layout()?;
        let vbh = gfx.create_vertex_buffer(&CUBE_VERTICES, &layout)?;

        // Indexed by topology, in `TOPOLOGY_NAMES` order.
        let ibh = [
            gfx.create_index_buffer(&CUBE_TRI_LIST)?,
            gfx.create_index_buffer(&CUBE_TRI_STRIP)?,
            gfx.create_index_buffer(&CUBE_LINE_LIST)?,
            gfx.create_index_buffer(&CUBE_LINE_STRIP)?,
            gfx.create_index_buffer(&CUBE_POINTS)?,
        ];

        let program = gfx.load_program("vs_cubes", "fs_cubes")?;
        Ok(Self { vbh, ibh, program })
    }

    fn destroy(self, gfx: &mut Gfx) {
        for ibh in self.ibh {
            gfx.destroy(ibh);
        }
        gfx.destroy(self.vbh);
        gfx.destroy(self.program);
    }
}

pub struct Cubes {
    info: AppInfo,
    config: RunConfig,
    mouse: MouseState,
    ui: Option<Ui>,
    resources: Option<Resources>,
    clock: FrameClock,
    pub topology: usize,
    pub write: WriteMask,
}

impl Cubes {
    pub fn new() -> Self {
        Self {
            info: AppInfo::new(
                "01-cubes",
                "Rendering simple static mesh.",
                "https://bkaradzic.github.io/bgfx/examples.html#cubes",
            ),
            config: RunConfig::new(0, 0),
            mouse: MouseState::default(),
            ui: None,
            resources: None,
            clock: FrameClock::new(),
            topology: 0,
            write: WriteMask::default(),
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Selected topology, clamped to the table.
    fn pt(&self) -> usize {
        self.topology.min(TOPOLOGY_NAMES.len() - 1)
    }

    /// Index buffer drawn for the current topology.
    pub fn index_buffer(&self) -> Option<IndexBufferHandle> {
        self.resources.as_ref().map(|r| r.ibh[self.pt()])
    }

    fn settings(&mut self, ui: &mut Ui) {
        let (w, h) = (self.config.width as f32, self.config.height as f32);
        ui.set_next_window_pos(w - w / 5.0 - 10.0, 10.0, Cond::FirstUseEver);
        ui.set_next_window_size(w / 5.0, h / 3.5, Cond::FirstUseEver);
        ui.begin("Settings");

        ui.checkbox("Write R", &mut self.write.r);
        ui.checkbox("Write G", &mut self.write.g);
        ui.checkbox("Write B", &mut self.write.b);
        ui.checkbox("Write A", &mut self.write.a);

        ui.text("Primitive topology:");
        ui.combo("##topology", &mut self.topology, &TOPOLOGY_NAMES);

        ui.end();
    }

    /// Sets up view 0 and submits the cube grid at `time` seconds.
    fn submit_scene(&self, gfx: &mut Gfx, time: f32) {
        let Some(res) = self.resources.as_ref() else {
            return;
        };
        let RunConfig { width, height, .. } = self.config;

        let view = mtx_look_at([0.0, 0.0, -35.0], [0.0, 0.0, 0.0]);
        let proj = mtx_proj(
            60.0,
            width as f32 / height as f32,
            0.1,
            100.0,
            gfx.caps().homogeneous_depth,
        );
        gfx.set_view_transform(0, &view, &proj);
        gfx.set_view_rect(0, 0, 0, width as u16, height as u16);

        // Clears view 0 even when nothing is drawn into it.
        gfx.touch(0);

        let pt = self.pt();
        let ibh = res.ibh[pt];
        let state = cube_state(self.write, pt);

        for yy in 0..GRID {
            for xx in 0..GRID {
                let mut mtx = mtx_rotate_xy(time + xx as f32 * 0.21, time + yy as f32 * 0.37);
                mtx[12] = -15.0 + xx as f32 * 3.0;
                mtx[13] = -15.0 + yy as f32 * 3.0;
                mtx[14] = 0.0;

                gfx.set_transform(&mtx);
                gfx.set_vertex_buffer(res.vbh);
                gfx.set_index_buffer(ibh);
                gfx.set_state(state);
                gfx.submit(0, res.program);
            }
        }
    }
}

impl Default for Cubes {
    fn default() -> Self {
        Self::new()
    }
}

impl App for Cubes {
    fn info(&self) -> &AppInfo {
        &self.info
    }

    fn init(&mut self, ctx: &mut AppCtx, args: &[String], width: u32, height: u32) -> anyhow::Result<()> {
        let args = Args::parse(args);
        self.config = RunConfig::new(width, height);
        self.config.debug = DebugFlags::empty();

        ctx.gfx
            .init(args.init(&self.config, ctx.platform_data()))
            .context("failed to initialize renderer")?;
        ctx.gfx.set_debug(self.config.debug);
        ctx.gfx.set_view_clear(0, ClearFlags::COLOR | ClearFlags::DEPTH, CLEAR_RGBA, 1.0, 0);

        let resources = Resources::create(&mut ctx.gfx).context("failed to create cube resources")?;
        log::debug!("cube resources: {resources:?}");
        self.resources = Some(resources);

        self.clock.reset();

        let font = common::install_fonts(&mut ctx.gfx);
        self.ui = Some(Ui::new(font));
        Ok(())
    }

    fn update(&mut self, ctx: &mut AppCtx) -> bool {
        if ctx.process_events(&mut self.config, &mut self.mouse) {
            return false;
        }

        if let Some(mut ui) = self.ui.take() {
            let input = UiInput::new(&self.mouse, self.config.width, self.config.height);
            ui.begin_frame(input, ctx.gfx.fonts());
            common::show_example_dialog(&mut ui, &self.info, &ctx.gfx);
            self.settings(&mut ui);
            ui.end_frame(&mut ctx.gfx);
            self.ui = Some(ui);
        }

        let time = self.clock.elapsed();
        self.submit_scene(&mut ctx.gfx, time);

        ctx.gfx.frame();
        true
    }

    fn shutdown(&mut self, ctx: &mut AppCtx) -> i32 {
        self.ui = None;
        if let Some(resources) = self.resources.take() {
            resources.destroy(&mut ctx.gfx);
        }
        ctx.gfx.shutdown();
        0
    }
}
