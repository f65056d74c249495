use crate::gfx::{Init, PciId, RendererType, ResetFlags};

/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Graphics APIs the instance may use.
    pub backends: wgpu::Backends,

    pub power_preference: wgpu::PowerPreference,

    /// PCI vendor id to prefer over whatever `power_preference` would pick.
    pub vendor_id: Option<u32>,

    /// Ask for the software/fallback adapter.
    pub force_fallback_adapter: bool,

    /// Prefer an sRGB surface format when available.
    ///
    /// Off for the renderer: clear colors and vertex colors are written as-is.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Features the device must have.
    pub required_features: wgpu::Features,

    /// Features enabled only when the adapter supports them.
    pub optional_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface. A hint only.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::PRIMARY,
            power_preference: wgpu::PowerPreference::HighPerformance,
            vendor_id: None,
            force_fallback_adapter: false,
            prefer_srgb: false,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            optional_features: wgpu::Features::POLYGON_MODE_LINE,
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

impl GpuInit {
    /// Maps renderer init parameters onto device selection.
    pub fn from_init(init: &Init) -> Self {
        let backends = match init.renderer_type {
            RendererType::Vulkan => wgpu::Backends::VULKAN,
            RendererType::Metal => wgpu::Backends::METAL,
            RendererType::Direct3D12 => wgpu::Backends::DX12,
            RendererType::OpenGl => wgpu::Backends::GL,
            RendererType::Auto | RendererType::Noop => wgpu::Backends::PRIMARY,
        };
        let power_preference = match init.vendor_id {
            PciId::Intel => wgpu::PowerPreference::LowPower,
            _ => wgpu::PowerPreference::HighPerformance,
        };

        let vendor = init.vendor_id.vendor_id();

        Self {
            backends,
            power_preference,
            vendor_id: (vendor != 0).then_some(vendor),
            force_fallback_adapter: init.vendor_id == PciId::SoftwareRasterizer,
            present_mode: present_mode_for(init.resolution.reset),
            ..Self::default()
        }
    }
}

/// Index of the first adapter from `vendor` that can present to the surface.
///
/// `candidates` pairs each adapter's info with its surface support, in
/// enumeration order.
pub(crate) fn pick_vendor_adapter(
    candidates: &[(wgpu::AdapterInfo, bool)],
    vendor: u32,
) -> Option<usize> {
    candidates
        .iter()
        .position(|(info, supported)| *supported && info.vendor == vendor)
}

/// VSYNC waits for vertical blank; otherwise present as fast as possible.
pub(crate) fn present_mode_for(reset: ResetFlags) -> wgpu::PresentMode {
    if reset.contains(ResetFlags::VSYNC) {
        wgpu::PresentMode::Fifo
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::Resolution;

    #[test]
    fn renderer_type_selects_backend() {
        let init = Init { renderer_type: RendererType::Vulkan, ..Init::default() };
        assert_eq!(GpuInit::from_init(&init).backends, wgpu::Backends::VULKAN);
        assert_eq!(GpuInit::from_init(&Init::default()).backends, wgpu::Backends::PRIMARY);
    }

    fn adapter(name: &str, vendor: u32, device_type: wgpu::DeviceType) -> wgpu::AdapterInfo {
        wgpu::AdapterInfo {
            name: name.to_string(),
            vendor,
            device: 0,
            device_type,
            device_pci_bus_id: String::new(),
            driver: String::new(),
            driver_info: String::new(),
            backend: wgpu::Backend::Vulkan,
            subgroup_min_size: 4,
            subgroup_max_size: 128,
            transient_saves_memory: false,
        }
    }

    #[test]
    fn vendor_maps_to_adapter_options() {
        let sw = Init { vendor_id: PciId::SoftwareRasterizer, ..Init::default() };
        assert!(GpuInit::from_init(&sw).force_fallback_adapter);
        assert_eq!(GpuInit::from_init(&sw).vendor_id, None);

        let intel = Init { vendor_id: PciId::Intel, ..Init::default() };
        assert_eq!(GpuInit::from_init(&intel).power_preference, wgpu::PowerPreference::LowPower);

        let nvidia = Init { vendor_id: PciId::Nvidia, ..Init::default() };
        assert_eq!(GpuInit::from_init(&nvidia).vendor_id, Some(0x10de));
        assert_eq!(GpuInit::from_init(&Init::default()).vendor_id, None);
    }

    #[test]
    fn vendor_adapter_must_present() {
        use wgpu::DeviceType as D;
        let candidates = [
            (adapter("llvmpipe", 0x10005, D::Cpu), true),
            (adapter("GeForce headless", 0x10de, D::DiscreteGpu), false),
            (adapter("Radeon", 0x1002, D::DiscreteGpu), true),
            (adapter("GeForce", 0x10de, D::DiscreteGpu), true),
        ];
        assert_eq!(pick_vendor_adapter(&candidates, PciId::Nvidia.vendor_id()), Some(3));
        assert_eq!(pick_vendor_adapter(&candidates, PciId::Amd.vendor_id()), Some(2));
        assert_eq!(pick_vendor_adapter(&candidates, PciId::Apple.vendor_id()), None);
        assert_eq!(pick_vendor_adapter(&[], PciId::Intel.vendor_id()), None);
    }

    #[test]
    fn vsync_flag_selects_present_mode() {
        let init = Init {
            resolution: Resolution { reset: ResetFlags::VSYNC, ..Resolution::default() },
            ..Init::default()
        };
        assert_eq!(GpuInit::from_init(&init).present_mode, wgpu::PresentMode::Fifo);
        assert_eq!(present_mode_for(ResetFlags::empty()), wgpu::PresentMode::AutoNoVsync);
    }

    #[test]
    fn defaults_skip_srgb() {
        assert!(!GpuInit::default().prefer_srgb);
    }
}
