use std::fmt;
use std::sync::Arc;

use winit::window::Window;

use super::ResetFlags;

/// Maximum number of views per frame.
pub const MAX_VIEWS: u16 = 256;
/// Maximum number of submitted draws per frame.
pub const MAX_DRAW_CALLS: u32 = 65_535;

/// Rendering backend selection.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum RendererType {
    /// Let the device layer pick the platform's primary API.
    #[default]
    Auto,
    /// No GPU: resources and draws are validated and counted only.
    Noop,
    Vulkan,
    Metal,
    Direct3D12,
    OpenGl,
}

impl RendererType {
    pub fn name(self) -> &'static str {
        match self {
            RendererType::Auto => "Auto",
            RendererType::Noop => "Noop",
            RendererType::Vulkan => "Vulkan",
            RendererType::Metal => "Metal",
            RendererType::Direct3D12 => "Direct3D 12",
            RendererType::OpenGl => "OpenGL",
        }
    }
}

impl fmt::Display for RendererType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// GPU vendor preference, by PCI vendor id.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum PciId {
    /// No preference.
    #[default]
    None,
    /// Force the software/fallback adapter.
    SoftwareRasterizer,
    Amd,
    Apple,
    Intel,
    Nvidia,
}

impl PciId {
    pub fn vendor_id(self) -> u32 {
        match self {
            PciId::None | PciId::SoftwareRasterizer => 0,
            PciId::Amd => 0x1002,
            PciId::Apple => 0x106b,
            PciId::Intel => 0x8086,
            PciId::Nvidia => 0x10de,
        }
    }
}

/// Backbuffer size and configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
    pub reset: ResetFlags,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            reset: ResetFlags::empty(),
        }
    }
}

/// Native handles the backend renders into.
#[derive(Debug, Clone, Default)]
pub struct PlatformData {
    pub window: Option<Arc<Window>>,
}

/// Parameters for `Gfx::init`.
#[derive(Debug, Clone, Default)]
pub struct Init {
    pub renderer_type: RendererType,
    pub vendor_id: PciId,
    pub resolution: Resolution,
    pub platform_data: PlatformData,
}

/// Capabilities of the active backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Caps {
    pub renderer_type: RendererType,
    /// PCI vendor id of the selected adapter (0 when unknown).
    pub vendor_id: u32,
    pub device_name: String,
    /// Clip-space depth is [-1, 1] instead of [0, 1].
    pub homogeneous_depth: bool,
    pub origin_bottom_left: bool,
    pub supports_wireframe: bool,
    pub max_views: u16,
    pub max_draw_calls: u32,
}

impl Caps {
    pub(crate) fn noop() -> Self {
        Self {
            renderer_type: RendererType::Noop,
            vendor_id: 0,
            device_name: "noop".to_string(),
            homogeneous_depth: false,
            origin_bottom_left: false,
            supports_wireframe: false,
            max_views: MAX_VIEWS,
            max_draw_calls: MAX_DRAW_CALLS,
        }
    }
}

/// Per-frame statistics, refreshed by `Gfx::frame`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Stats {
    pub frame_number: u32,
    /// CPU time between the last two `frame` calls.
    pub cpu_time_frame_ms: f32,
    pub num_draws: u32,
    pub num_views: u32,
    /// Backbuffer size in pixels.
    pub width: u32,
    pub height: u32,
    /// Debug text grid size in characters.
    pub text_width: u16,
    pub text_height: u16,
    pub num_vertex_buffers: u32,
    pub num_index_buffers: u32,
    pub num_programs: u32,
}
