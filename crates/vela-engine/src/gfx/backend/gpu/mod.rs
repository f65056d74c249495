//! wgpu-backed renderer.

mod mesh;

use std::sync::Arc;

use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::coords::Viewport;
use crate::device::{present_mode_for, Gpu, GpuInit, SurfaceErrorAction};
use crate::gfx::{
    Caps, ClearFlags, DebugFlags, Frame, FrameView, GfxError, Handle, IndexBufferHandle, Init,
    PciId, ProgramHandle, RendererType, Resolution, ShaderSource, VertexBufferHandle,
    VertexLayout, MAX_DRAW_CALLS, MAX_VIEWS,
};
use crate::paint::Color;
use crate::render::{OverlayRenderer, RenderCtx, RenderTarget};
use crate::text::FontSystem;

use self::mesh::{MeshRenderer, TargetDesc, DEPTH_FORMAT};
use super::RendererBackend;

/// Depth buffer and optional multisampled color target, sized to the surface.
struct RenderTargets {
    width: u32,
    height: u32,
    samples: u32,
    depth: wgpu::TextureView,
    /// Resolved into the surface texture at the end of each view pass.
    msaa_color: Option<wgpu::TextureView>,
}

impl RenderTargets {
    fn new(device: &wgpu::Device, format: wgpu::TextureFormat, width: u32, height: u32, samples: u32) -> Self {
        let size = wgpu::Extent3d { width, height, depth_or_array_layers: 1 };
        let create = |label: &str, format: wgpu::TextureFormat| {
            device
                .create_texture(&wgpu::TextureDescriptor {
                    label: Some(label),
                    size,
                    mip_level_count: 1,
                    sample_count: samples,
                    dimension: wgpu::TextureDimension::D2,
                    format,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                    view_formats: &[],
                })
                .create_view(&wgpu::TextureViewDescriptor::default())
        };

        let depth = create("vela depth", DEPTH_FORMAT);
        let msaa_color = (samples > 1).then(|| create("vela msaa color", format));
        Self { width, height, samples, depth, msaa_color }
    }

    fn matches(&self, width: u32, height: u32, samples: u32) -> bool {
        self.width == width && self.height == height && self.samples == samples
    }
}

pub(crate) struct WgpuBackend {
    window: Arc<Window>,
    gpu: Gpu,
    caps: Caps,
    targets: Option<RenderTargets>,
    meshes: MeshRenderer,
    overlay: OverlayRenderer,
    warned_msaa: bool,
}

impl WgpuBackend {
    pub(crate) fn new(init: &Init, window: Arc<Window>) -> Result<Self, GfxError> {
        let gpu = pollster::block_on(Gpu::new(window.clone(), GpuInit::from_init(init)))
            .map_err(|e| GfxError::Backend(format!("{e:#}")))?;

        let info = gpu.adapter_info();
        let wanted = init.vendor_id.vendor_id();
        if wanted != 0 && wanted != info.vendor {
            log::warn!(
                "requested GPU vendor {:?} ({wanted:#06x}) not selected; using {} ({:#06x})",
                init.vendor_id,
                info.name,
                info.vendor,
            );
        }
        if init.vendor_id == PciId::SoftwareRasterizer && info.device_type != wgpu::DeviceType::Cpu {
            log::warn!("software rasterizer requested; adapter {} is {:?}", info.name, info.device_type);
        }

        let caps = Caps {
            renderer_type: renderer_type_of(info.backend),
            vendor_id: info.vendor,
            device_name: info.name.clone(),
            homogeneous_depth: false,
            origin_bottom_left: false,
            supports_wireframe: gpu.features().contains(wgpu::Features::POLYGON_MODE_LINE),
            max_views: MAX_VIEWS,
            max_draw_calls: MAX_DRAW_CALLS,
        };
        let meshes = MeshRenderer::new(gpu.device());

        let mut backend = Self {
            window,
            gpu,
            caps,
            targets: None,
            meshes,
            overlay: OverlayRenderer::new(),
            warned_msaa: false,
        };
        backend.reset(&init.resolution);
        Ok(backend)
    }

    fn ensure_targets(&mut self, width: u32, height: u32, requested_samples: u32) -> u32 {
        let format = self.gpu.surface_format();
        let samples = self.gpu.supported_sample_count(format, requested_samples);
        if samples != requested_samples && !self.warned_msaa {
            log::warn!("{requested_samples}x MSAA unsupported for {format:?}; using {samples}x");
            self.warned_msaa = true;
        }

        let stale = self
            .targets
            .as_ref()
            .is_none_or(|t| !t.matches(width, height, samples));
        if stale {
            self.targets = Some(RenderTargets::new(self.gpu.device(), format, width, height, samples));
        }
        samples
    }
}

impl RendererBackend for WgpuBackend {
    fn caps(&self) -> &Caps {
        &self.caps
    }

    fn reset(&mut self, resolution: &Resolution) {
        self.gpu.resize(PhysicalSize::new(resolution.width, resolution.height));
        self.gpu.set_present_mode(present_mode_for(resolution.reset));
    }

    fn create_vertex_buffer(
        &mut self,
        handle: VertexBufferHandle,
        data: &[u8],
        layout: &VertexLayout,
    ) -> Result<(), GfxError> {
        self.meshes.create_vertex_buffer(self.gpu.device(), handle, data, layout);
        Ok(())
    }

    fn create_index_buffer(
        &mut self,
        handle: IndexBufferHandle,
        indices: &[u16],
    ) -> Result<(), GfxError> {
        self.meshes.create_index_buffer(self.gpu.device(), handle, indices);
        Ok(())
    }

    fn create_program(
        &mut self,
        handle: ProgramHandle,
        vs: &ShaderSource,
        fs: &ShaderSource,
    ) -> Result<(), GfxError> {
        self.meshes.create_program(self.gpu.device(), handle, vs, fs);
        Ok(())
    }

    fn destroy(&mut self, handle: Handle) {
        match handle {
            Handle::VertexBuffer(h) => self.meshes.destroy_vertex_buffer(h),
            Handle::IndexBuffer(h) => self.meshes.destroy_index_buffer(h),
            Handle::Program(h) => self.meshes.destroy_program(h),
        }
    }

    fn submit(&mut self, frame: &mut Frame, fonts: &FontSystem) -> Result<(), GfxError> {
        let mut gpu_frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                let msg = err.to_string();
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => Err(GfxError::Backend(format!("surface: {msg}"))),
                    action => {
                        log::debug!("frame {} skipped: {msg} ({action:?})", frame.frame_number);
                        Ok(())
                    }
                };
            }
        };

        let width = gpu_frame.surface_texture.texture.width();
        let height = gpu_frame.surface_texture.texture.height();
        let samples = self.ensure_targets(width, height, frame.resolution.reset.msaa_samples());
        let Some(targets) = self.targets.as_ref() else {
            return Ok(());
        };

        let target = TargetDesc {
            format: self.gpu.surface_format(),
            samples,
            wireframe: frame.debug.contains(DebugFlags::WIREFRAME) && self.caps.supports_wireframe,
        };
        self.meshes.prepare(self.gpu.device(), self.gpu.queue(), frame, target);

        let black = FrameView { id: 0, view: Default::default() };
        let views: &[FrameView] = if frame.views.is_empty() {
            std::slice::from_ref(&black)
        } else {
            &frame.views
        };

        for fv in views {
            let clear = fv.view.clear;
            let color_load = if clear.flags.contains(ClearFlags::COLOR) || frame.views.is_empty() {
                wgpu::LoadOp::Clear(Color::from_rgba_u32(clear.rgba).to_wgpu())
            } else {
                wgpu::LoadOp::Load
            };
            let depth_load = if clear.flags.contains(ClearFlags::DEPTH) {
                wgpu::LoadOp::Clear(clear.depth)
            } else {
                wgpu::LoadOp::Load
            };

            let (color_view, resolve_target) = match &targets.msaa_color {
                Some(msaa) => (msaa, Some(&gpu_frame.view)),
                None => (&gpu_frame.view, None),
            };

            let mut rpass = gpu_frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("vela view pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target,
                    ops: wgpu::Operations { load: color_load, store: wgpu::StoreOp::Store },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &targets.depth,
                    depth_ops: Some(wgpu::Operations { load: depth_load, store: wgpu::StoreOp::Store }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            let (x, y, w, h) = fv.view.rect.resolve(width, height);
            if w == 0 || h == 0 {
                continue;
            }
            rpass.set_viewport(x as f32, y as f32, w as f32, h as f32, 0.0, 1.0);
            self.meshes.draw(&mut rpass, frame, fv.id);
        }

        let ctx = RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            Viewport::from_backbuffer(width, height),
        );
        let mut target = RenderTarget::new(&mut gpu_frame.encoder, &gpu_frame.view);
        self.overlay.render(&ctx, &mut target, &mut frame.overlay, fonts);

        self.window.pre_present_notify();
        self.gpu.submit(gpu_frame);
        Ok(())
    }
}

fn renderer_type_of(backend: wgpu::Backend) -> RendererType {
    match backend {
        wgpu::Backend::Vulkan => RendererType::Vulkan,
        wgpu::Backend::Metal => RendererType::Metal,
        wgpu::Backend::Dx12 => RendererType::Direct3D12,
        wgpu::Backend::Gl => RendererType::OpenGl,
        _ => RendererType::Auto,
    }
}
