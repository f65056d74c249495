//! Helpers shared by the example applications.

use vela_engine::core::{AppInfo, RunConfig};
use vela_engine::gfx::{Gfx, Init, PciId, PlatformData, RendererType, Resolution};
use vela_engine::text::FontId;
use vela_ui::{Cond, Ui};

// ── arguments ─────────────────────────────────────────────────────────────

/// Renderer and adapter selection from the command line.
///
/// Unknown arguments are ignored; when a group is given twice the last one wins.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Args {
    pub renderer_type: RendererType,
    pub pci_id: PciId,
}

impl Args {
    pub fn parse(args: &[String]) -> Self {
        let mut out = Self::default();
        for arg in args {
            match arg.as_str() {
                "--noop" => out.renderer_type = RendererType::Noop,
                "--vk" | "--vulkan" => out.renderer_type = RendererType::Vulkan,
                "--mtl" | "--metal" => out.renderer_type = RendererType::Metal,
                "--d3d12" | "--dx12" => out.renderer_type = RendererType::Direct3D12,
                "--gl" => out.renderer_type = RendererType::OpenGl,

                "--amd" => out.pci_id = PciId::Amd,
                "--nvidia" => out.pci_id = PciId::Nvidia,
                "--intel" => out.pci_id = PciId::Intel,
                "--apple" => out.pci_id = PciId::Apple,
                "--sw" | "--software" => out.pci_id = PciId::SoftwareRasterizer,

                other => log::debug!("ignoring argument `{other}`"),
            }
        }
        out
    }

    /// Renderer parameters for the selected backend at the configured size.
    pub fn init(&self, config: &RunConfig, platform_data: PlatformData) -> Init {
        Init {
            renderer_type: self.renderer_type,
            vendor_id: self.pci_id,
            resolution: Resolution {
                width: config.width,
                height: config.height,
                reset: config.reset,
            },
            platform_data,
        }
    }
}

// ── fonts ─────────────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FontKind {
    /// UI text.
    Proportional,
    /// Debug text grid.
    Monospace,
}

impl FontKind {
    fn candidates(self) -> &'static [&'static str] {
        match self {
            FontKind::Proportional => &[
                "/usr/share/fonts/TTF/DejaVuSans.ttf",
                "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
                "/usr/share/fonts/dejavu/DejaVuSans.ttf",
                "/usr/share/fonts/noto/NotoSans-Regular.ttf",
                "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
                "/System/Library/Fonts/Supplemental/Arial.ttf",
                "C:\\Windows\\Fonts\\segoeui.ttf",
            ],
            FontKind::Monospace => &[
                "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
                "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
                "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
                "/usr/share/fonts/noto/NotoSansMono-Regular.ttf",
                "/usr/share/fonts/truetype/noto/NotoSansMono-Regular.ttf",
                "/System/Library/Fonts/Supplemental/Courier New.ttf",
                "C:\\Windows\\Fonts\\consola.ttf",
            ],
        }
    }
}

/// Reads the first system font of `kind` that exists.
pub fn load_font(kind: FontKind) -> Option<Vec<u8>> {
    kind.candidates().iter().find_map(|p| std::fs::read(p).ok())
}

/// Loads the UI and debug text fonts into `gfx`.
///
/// Returns the UI font. Missing fonts are logged; text is then not drawn.
pub fn install_fonts(gfx: &mut Gfx) -> Option<FontId> {
    let mut load = |kind: FontKind| {
        let Some(bytes) = load_font(kind) else {
            log::warn!("no {kind:?} system font found; text will not be drawn");
            return None;
        };
        match gfx.load_font(&bytes) {
            Ok(id) => Some(id),
            Err(err) => {
                log::warn!("failed to load {kind:?} font: {err}");
                None
            }
        }
    };

    let ui_font = load(FontKind::Proportional);
    let debug_font = load(FontKind::Monospace);
    gfx.set_debug_font(debug_font);
    ui_font
}

// ── dialog ────────────────────────────────────────────────────────────────

/// Window describing the running example and the renderer.
pub fn show_example_dialog(ui: &mut Ui, info: &AppInfo, gfx: &Gfx) {
    ui.set_next_window_pos(10.0, 50.0, Cond::FirstUseEver);
    ui.set_next_window_size(300.0, 210.0, Cond::FirstUseEver);
    ui.begin(&format!("{}##example", info.name));

    ui.text(&info.description);
    ui.text(&info.url);
    ui.separator();

    let stats = gfx.stats();
    let fps = if stats.cpu_time_frame_ms > 0.0 {
        1000.0 / stats.cpu_time_frame_ms
    } else {
        0.0
    };
    ui.text(&format!("Renderer: {}", gfx.renderer_type()));
    ui.text(&format!("Frame {:7.3} [ms], {fps:.1} FPS", stats.cpu_time_frame_ms));
    ui.text(&format!("Submitted {} draws in {} views", stats.num_draws, stats.num_views));
    ui.text(&format!("Backbuffer {}x{}", stats.width, stats.height));

    ui.end();
}

// ── logo ──────────────────────────────────────────────────────────────────

pub const LOGO_WIDTH: u16 = 40;
pub const LOGO_HEIGHT: u16 = 12;
/// Bytes per logo row: one (char, attr) pair per cell.
pub const LOGO_PITCH: usize = LOGO_WIDTH as usize * 2;

const LOGO_ART: [&str; 5] = [
    " VV    VV  EEEEEEEE  LL          AAAA   ",
    " VV    VV  EE        LL        AA    AA ",
    " VV    VV  EEEEEE    LL        AAAAAAAA ",
    " VV    VV  EE        LL        AA    AA ",
    "   VVVV    EEEEEEEE  LLLLLLLL  AA    AA ",
];
const LOGO_ART_TOP: usize = 3;
const LOGO_CAPTION: &str = "wgpu renderer - debug text";
const LOGO_CAPTION_ROW: usize = 9;

/// Logo as (char, attr) pairs for `Gfx::dbg_text_image`, [`LOGO_PITCH`] bytes per row.
///
/// Letters are background-colored blanks framed by a dark border.
pub fn logo() -> Vec<u8> {
    let (w, h) = (LOGO_WIDTH as usize, LOGO_HEIGHT as usize);
    let mut cells = vec![(b' ', 0u8); w * h];

    for x in 0..w {
        cells[x] = (b'-', 0x08);
        cells[(h - 1) * w + x] = (b'-', 0x08);
    }

    for (dy, row) in LOGO_ART.iter().enumerate() {
        for (x, ch) in row.bytes().take(w).enumerate() {
            let bg = match ch {
                b'V' => 0x0c,
                b'E' => 0x0e,
                b'L' => 0x0a,
                b'A' => 0x0b,
                _ => continue,
            };
            cells[(LOGO_ART_TOP + dy) * w + x] = (b' ', bg << 4);
        }
    }

    let start = (w - LOGO_CAPTION.len()) / 2;
    for (i, ch) in LOGO_CAPTION.bytes().enumerate() {
        cells[LOGO_CAPTION_ROW * w + start + i] = (ch, 0x07);
    }

    cells.into_iter().flat_map(|(ch, attr)| [ch, attr]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_engine::gfx::{ResetFlags, TextVideoMem};

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    // ── args ──────────────────────────────────────────────────────────────

    #[test]
    fn no_arguments_pick_defaults() {
        assert_eq!(Args::parse(&[]), Args::default());
        assert_eq!(Args::default().renderer_type, RendererType::Auto);
        assert_eq!(Args::default().pci_id, PciId::None);
    }

    #[test]
    fn renderer_and_vendor_flags() {
        let a = Args::parse(&args(&["--vk", "--nvidia"]));
        assert_eq!(a.renderer_type, RendererType::Vulkan);
        assert_eq!(a.pci_id, PciId::Nvidia);

        let a = Args::parse(&args(&["--gl", "--noop", "--sw"]));
        assert_eq!(a.renderer_type, RendererType::Noop);
        assert_eq!(a.pci_id, PciId::SoftwareRasterizer);
    }

    #[test]
    fn unknown_arguments_are_ignored() {
        let a = Args::parse(&args(&["--fullscreen", "scene.bin", "--dx12"]));
        assert_eq!(a.renderer_type, RendererType::Direct3D12);
        assert_eq!(a.pci_id, PciId::None);
    }

    #[test]
    fn init_carries_run_config() {
        let mut config = RunConfig::new(640, 480);
        config.reset = ResetFlags::VSYNC | ResetFlags::MSAA_X4;
        let init = Args::parse(&args(&["--noop"])).init(&config, PlatformData::default());
        assert_eq!(init.renderer_type, RendererType::Noop);
        assert_eq!(init.resolution.width, 640);
        assert_eq!(init.resolution.height, 480);
        assert_eq!(init.resolution.reset, config.reset);
        assert!(init.platform_data.window.is_none());
    }

    // ── logo ──────────────────────────────────────────────────────────────

    #[test]
    fn logo_fills_its_grid() {
        let data = logo();
        assert_eq!(data.len(), LOGO_PITCH * LOGO_HEIGHT as usize);

        let mut mem = TextVideoMem::new(LOGO_WIDTH as u32 * 8, LOGO_HEIGHT as u32 * 16);
        mem.image(0, 0, LOGO_WIDTH, LOGO_HEIGHT, &data, LOGO_PITCH);
        assert_eq!(mem.row_text(0), "-".repeat(LOGO_WIDTH as usize));
        assert_eq!(mem.row_text(LOGO_CAPTION_ROW as u16).trim(), LOGO_CAPTION);

        let letter = mem.cell(1, LOGO_ART_TOP as u16).unwrap();
        assert_eq!(letter.bg(), 0x0c);
    }
}
