//! Renderer initialization and debug text.

use anyhow::Context;

use vela_engine::core::{App, AppCtx, AppInfo, RunConfig};
use vela_engine::gfx::{ClearFlags, Stats};
use vela_engine::input::MouseState;
use vela_ui::{Ui, UiInput};

use crate::common::{self, Args, LOGO_HEIGHT, LOGO_PITCH, LOGO_WIDTH};

const CLEAR_RGBA: u32 = 0x303030ff;

const ANSI_LINE: &str = "Color can be changed with ANSI \x1b[9;me\x1b[10;ms\x1b[11;mc\x1b[12;ma\x1b[13;mp\x1b[14;me\x1b[0m code too.";
const PALETTE_LOW: &str = "\x1b[;0m    \x1b[;1m    \x1b[; 2m    \x1b[; 3m    \x1b[; 4m    \x1b[; 5m    \x1b[; 6m    \x1b[; 7m    \x1b[0m";
const PALETTE_HIGH: &str = "\x1b[;8m    \x1b[;9m    \x1b[;10m    \x1b[;11m    \x1b[;12m    \x1b[;13m    \x1b[;14m    \x1b[;15m    \x1b[0m";

pub struct HelloWorld {
    info: AppInfo,
    config: RunConfig,
    mouse: MouseState,
    logo: Vec<u8>,
    ui: Option<Ui>,
}

impl HelloWorld {
    pub fn new() -> Self {
        Self {
            info: AppInfo::new(
                "00-helloworld",
                "Initialization and debug text.",
                "https://bkaradzic.github.io/bgfx/examples.html#helloworld",
            ),
            config: RunConfig::new(0, 0),
            mouse: MouseState::default(),
            logo: common::logo(),
            ui: None,
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }
}

impl Default for HelloWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Logo cell position: centered, but never left of or above the grid origin.
fn logo_origin(stats: &Stats) -> (u16, u16) {
    (
        (stats.text_width / 2).max(LOGO_WIDTH / 2) - LOGO_WIDTH / 2,
        (stats.text_height / 2).max(LOGO_HEIGHT / 2) - LOGO_HEIGHT / 2,
    )
}

impl App for HelloWorld {
    fn info(&self) -> &AppInfo {
        &self.info
    }

    fn init(&mut self, ctx: &mut AppCtx, args: &[String], width: u32, height: u32) -> anyhow::Result<()> {
        let args = Args::parse(args);
        self.config = RunConfig::new(width, height);

        ctx.gfx
            .init(args.init(&self.config, ctx.platform_data()))
            .context("failed to initialize renderer")?;
        ctx.gfx.set_debug(self.config.debug);
        ctx.gfx.set_view_clear(0, ClearFlags::COLOR | ClearFlags::DEPTH, CLEAR_RGBA, 1.0, 0);

        let font = common::install_fonts(&mut ctx.gfx);
        self.ui = Some(Ui::new(font));

        log::info!("{} running on {}", self.info.name, ctx.gfx.renderer_type());
        Ok(())
    }

    fn update(&mut self, ctx: &mut AppCtx) -> bool {
        if ctx.process_events(&mut self.config, &mut self.mouse) {
            return false;
        }
        let RunConfig { width, height, .. } = self.config;

        if let Some(ui) = self.ui.as_mut() {
            ui.begin_frame(UiInput::new(&self.mouse, width, height), ctx.gfx.fonts());
            common::show_example_dialog(ui, &self.info, &ctx.gfx);
            ui.end_frame(&mut ctx.gfx);
        }

        ctx.gfx.set_view_rect(0, 0, 0, width as u16, height as u16);
        ctx.gfx.touch(0);

        ctx.gfx.dbg_text_clear(0);

        // Sizes reported for the previous frame.
        let stats = *ctx.gfx.stats();
        let (x, y) = logo_origin(&stats);
        ctx.gfx.dbg_text_image(x, y, LOGO_WIDTH, LOGO_HEIGHT, &self.logo, LOGO_PITCH);

        ctx.gfx.dbg_text_print(0, 1, 0x0f, ANSI_LINE);
        ctx.gfx.dbg_text_print(80, 1, 0x0f, PALETTE_LOW);
        ctx.gfx.dbg_text_print(80, 2, 0x0f, PALETTE_HIGH);
        ctx.gfx.dbg_text_print(
            0,
            2,
            0x0f,
            &format!(
                "Backbuffer {}W x {}H in pixels, debug text {}W x {}H in characters.",
                stats.width, stats.height, stats.text_width, stats.text_height,
            ),
        );

        ctx.gfx.frame();
        true
    }

    fn shutdown(&mut self, ctx: &mut AppCtx) -> i32 {
        self.ui = None;
        ctx.gfx.shutdown();
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_engine::core::Event;

    fn started() -> (HelloWorld, AppCtx) {
        let mut app = HelloWorld::new();
        let mut ctx = AppCtx::headless();
        app.init(&mut ctx, &["--noop".to_string()], 1280, 720).unwrap();
        (app, ctx)
    }

    // ── init ──────────────────────────────────────────────────────────────

    #[test]
    fn init_sets_debug_text_and_vsync() {
        let (app, ctx) = started();
        assert!(ctx.gfx.is_initialized());
        assert_eq!(app.config().width, 1280);
        assert!(ctx.gfx.debug().contains(vela_engine::gfx::DebugFlags::TEXT));
        assert!(app.config().reset.contains(vela_engine::gfx::ResetFlags::VSYNC));
    }

    #[test]
    fn init_without_window_fails_for_gpu_backends() {
        let mut app = HelloWorld::new();
        let mut ctx = AppCtx::headless();
        assert!(app.init(&mut ctx, &[], 1280, 720).is_err());
    }

    // ── update ────────────────────────────────────────────────────────────

    #[test]
    fn second_frame_prints_backbuffer_line() {
        let (mut app, mut ctx) = started();
        assert!(app.update(&mut ctx));
        assert!(app.update(&mut ctx));

        let text = ctx.gfx.dbg_text();
        assert_eq!(text.width(), 160);
        assert_eq!(
            text.row_text(2).split("    ").next().unwrap_or(""),
            "Backbuffer 1280W x 720H in pixels, debug text 160W x 45H in characters.",
        );
        assert!(text.row_text(1).starts_with("Color can be changed with ANSI escape code too."));
    }

    #[test]
    fn ansi_escapes_color_the_word() {
        let (mut app, mut ctx) = started();
        app.update(&mut ctx);

        let text = ctx.gfx.dbg_text();
        let start = "Color can be changed with ANSI ".len() as u16;
        let fg: Vec<u8> = (0..6).map(|i| text.cell(start + i, 1).unwrap().fg()).collect();
        assert_eq!(fg, [9, 10, 11, 12, 13, 14]);
        assert_eq!(text.cell(start + 7, 1).unwrap().attr, 0x0f);
    }

    #[test]
    fn palette_rows_use_every_background() {
        let (mut app, mut ctx) = started();
        app.update(&mut ctx);

        let text = ctx.gfx.dbg_text();
        for (row, first) in [(1u16, 0u8), (2, 8)] {
            for i in 0..8u8 {
                let cell = text.cell(80 + i as u16 * 4, row).unwrap();
                assert_eq!(cell.bg(), first + i);
            }
        }
    }

    #[test]
    fn logo_is_centered() {
        let stats = Stats { text_width: 160, text_height: 45, ..Stats::default() };
        assert_eq!(logo_origin(&stats), (60, 16));
        let tiny = Stats { text_width: 10, text_height: 4, ..Stats::default() };
        assert_eq!(logo_origin(&tiny), (0, 0));
    }

    #[test]
    fn exit_event_stops_updates() {
        let (mut app, mut ctx) = started();
        ctx.push_event(Event::Exit);
        assert!(!app.update(&mut ctx));
        assert_eq!(app.shutdown(&mut ctx), 0);
        assert!(!ctx.gfx.is_initialized());
    }
}
