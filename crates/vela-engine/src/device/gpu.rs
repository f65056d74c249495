use std::sync::Arc;

use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::surface::{
    choose_alpha_mode, choose_present_mode, choose_surface_format, map_surface_error,
    SurfaceErrorAction,
};
use super::{pick_vendor_adapter, GpuInit};

/// Acquired surface texture and the encoder recording the frame into it.
///
/// Hold it only until `Gpu::submit`; the next acquisition waits for it.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// Device, queue and the configured window surface of the GPU backend.
///
/// The surface keeps its own `Arc<Window>`, so `Gpu` borrows nothing.
pub struct Gpu {
    /// Kept alive for the surface.
    _instance: wgpu::Instance,
    surface: wgpu::Surface<'static>,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
    caps: wgpu::SurfaceCapabilities,
    config: wgpu::SurfaceConfiguration,

    /// Current drawable size in physical pixels.
    size: PhysicalSize<u32>,
}

impl Gpu {
    /// Picks an adapter matching `init` and configures a surface for `window`.
    pub async fn new(window: Arc<Window>, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: init.backends,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let preferred = match init.vendor_id {
            Some(vendor) => {
                let adapters = instance.enumerate_adapters(init.backends).await;
                let candidates: Vec<_> = adapters
                    .iter()
                    .map(|a| (a.get_info(), a.is_surface_supported(&surface)))
                    .collect();
                let picked = pick_vendor_adapter(&candidates, vendor);
                if picked.is_none() {
                    log::warn!(
                        "no adapter from vendor {vendor:#06x} among {} can present; using default selection",
                        candidates.len()
                    );
                }
                picked.and_then(|i| adapters.into_iter().nth(i))
            }
            None => None,
        };

        let adapter = match preferred {
            Some(adapter) => adapter,
            None => instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: init.power_preference,
                    compatible_surface: Some(&surface),
                    force_fallback_adapter: init.force_fallback_adapter,
                })
                .await
                .context("failed to find a suitable GPU adapter")?,
        };

        let features = init.required_features | (init.optional_features & adapter.features());
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("vela device"),
                required_features: features,
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let caps = surface.get_capabilities(&adapter);
        let format = choose_surface_format(&caps.formats, init.prefer_srgb)
            .context("no supported surface formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: choose_present_mode(&caps, init.present_mode),
            alpha_mode: choose_alpha_mode(&caps, init.alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };

        surface.configure(&device, &config);

        let info = adapter.get_info();
        log::info!(
            "gpu: {} ({:?}, vendor {:#06x}), surface {:?}, {:?}",
            info.name,
            info.backend,
            info.vendor,
            format,
            config.present_mode,
        );

        Ok(Gpu {
            _instance: instance,
            surface,
            adapter,
            device,
            queue,
            caps,
            config,
            size,
        })
    }

    /// Returns the active surface format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Returns the current drawable size (physical pixels).
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    /// Features enabled on the device.
    pub fn features(&self) -> wgpu::Features {
        self.device.features()
    }

    pub fn limits(&self) -> wgpu::Limits {
        self.device.limits()
    }

    /// Largest sample count not above `requested` that `format` supports.
    pub fn supported_sample_count(&self, format: wgpu::TextureFormat, requested: u32) -> u32 {
        let flags = self.adapter.get_texture_format_features(format).flags;
        [16, 8, 4, 2]
            .into_iter()
            .filter(|&n| n <= requested)
            .find(|&n| flags.sample_count_supported(n))
            .unwrap_or(1)
    }

    /// Switches the present mode, reconfiguring only when it changes.
    pub fn set_present_mode(&mut self, mode: wgpu::PresentMode) {
        let mode = choose_present_mode(&self.caps, mode);
        if self.config.present_mode == mode {
            return;
        }
        self.config.present_mode = mode;
        if self.size.width > 0 && self.size.height > 0 {
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reconfigures the surface after a resize.
    ///
    /// wgpu does not support configuring a surface with a 0x0 size; in that case,
    /// only internal state is updated and configuration is deferred.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.size = new_size;
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        if self.config.width == new_size.width && self.config.height == new_size.height {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Acquires the next surface texture and creates an encoder.
    ///
    /// The returned frame owns the surface texture. Releasing it (after submission)
    /// presents the frame.
    pub fn begin_frame(&self) -> std::result::Result<GpuFrame, SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("vela frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits the recorded commands and presents the frame.
    pub fn submit(&self, frame: GpuFrame) {
        self.queue.submit(std::iter::once(frame.encoder.finish()));
        drop(frame.view);
        frame.surface_texture.present();
    }

    /// Converts a `SurfaceError` into a higher-level action.
    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        map_surface_error(&self.surface, &self.device, &self.config, self.size, err)
    }
}
