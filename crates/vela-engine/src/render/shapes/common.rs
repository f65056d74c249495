//! Shared GPU types and utilities used by the overlay renderers.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::{Rect, Viewport};
use crate::render::RenderCtx;

// ── blend ─────────────────────────────────────────────────────────────────

pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── viewport uniform ──────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct ViewportUniform {
    pub viewport: [f32; 2],
    pub _pad: [f32; 2], // 16-byte alignment
}

impl ViewportUniform {
    pub(super) fn new(viewport: Viewport) -> Self {
        Self {
            viewport: [viewport.width.max(1.0), viewport.height.max(1.0)],
            _pad: [0.0; 2],
        }
    }
}

/// Minimum binding size for the viewport uniform buffer.
pub(super) const VIEWPORT_UBO_SIZE: Option<NonZeroU64> =
    NonZeroU64::new(std::mem::size_of::<ViewportUniform>() as u64);

// ── quad vertex ───────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct QuadVertex {
    pub pos: [f32; 2], // 0..1
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [0.0, 1.0] },
];

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Unit quad shared by every instanced overlay draw.
pub(super) struct QuadGeometry {
    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
}

impl QuadGeometry {
    pub(super) fn new(device: &wgpu::Device, label: &str) -> Self {
        let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} quad vbo")),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} quad ibo")),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self { vbo, ibo }
    }

    pub(super) fn bind(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_vertex_buffer(0, self.vbo.slice(..));
        rpass.set_index_buffer(self.ibo.slice(..), wgpu::IndexFormat::Uint16);
    }
}

// ── instance buffer ───────────────────────────────────────────────────────

/// Growable per-instance vertex buffer (capacity doubles, never shrinks).
pub(super) struct InstanceBuffer {
    label: &'static str,
    buffer: Option<wgpu::Buffer>,
    capacity_bytes: u64,
}

impl InstanceBuffer {
    pub(super) const fn new(label: &'static str) -> Self {
        Self { label, buffer: None, capacity_bytes: 0 }
    }

    /// Uploads `data`, reallocating when it does not fit.
    pub(super) fn upload<T: Pod>(&mut self, ctx: &RenderCtx<'_>, data: &[T]) {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        if bytes.is_empty() {
            return;
        }
        let needed = bytes.len() as u64;
        if self.buffer.is_none() || needed > self.capacity_bytes {
            let size = needed.next_power_of_two().max(4096);
            self.buffer = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(self.label),
                size,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.capacity_bytes = size;
        }
        if let Some(buffer) = &self.buffer {
            ctx.queue.write_buffer(buffer, 0, bytes);
        }
    }

    pub(super) fn bind(&self, rpass: &mut wgpu::RenderPass<'_>) -> bool {
        let Some(buffer) = &self.buffer else { return false };
        rpass.set_vertex_buffer(1, buffer.slice(..));
        true
    }
}

// ── pipeline ──────────────────────────────────────────────────────────────

/// Creates the viewport uniform buffer for one renderer.
pub(super) fn create_viewport_ubo(device: &wgpu::Device, label: &str) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(&format!("{label} viewport ubo")),
        size: std::mem::size_of::<ViewportUniform>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Layout entry for the viewport uniform at binding 0.
pub(super) fn viewport_bgl_entry() -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: VIEWPORT_UBO_SIZE,
        },
        count: None,
    }
}

/// Builds an instanced, alpha-blended quad pipeline without depth.
///
/// Slot 0 is the unit quad, slot 1 the per-instance data.
pub(super) fn create_overlay_pipeline(
    ctx: &RenderCtx<'_>,
    label: &str,
    wgsl: &str,
    bgl: &wgpu::BindGroupLayout,
    instance_layout: wgpu::VertexBufferLayout<'static>,
) -> wgpu::RenderPipeline {
    let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{label} shader")),
        source: wgpu::ShaderSource::Wgsl(wgsl.into()),
    });

    let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{label} pipeline layout")),
        bind_group_layouts: &[bgl],
        immediate_size: 0,
    });

    ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{label} pipeline")),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[QuadVertex::layout(), instance_layout],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: ctx.format,
                blend: Some(premul_alpha_blend()),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

// ── scissor rect ──────────────────────────────────────────────────────────

/// Converts a clip rect to scissor rect arguments for wgpu, clamped to the viewport.
///
/// Returns `None` if the clip is zero-area (the draw call is skipped).
/// `clip = None` means "no scissor" and yields the full viewport rect.
pub(crate) fn clip_to_scissor(
    clip: Option<Rect>,
    viewport: Viewport,
) -> Option<(u32, u32, u32, u32)> {
    let vw = viewport.width.max(1.0) as u32;
    let vh = viewport.height.max(1.0) as u32;

    let (x, y, w, h) = match clip {
        None => (0, 0, vw, vh),
        Some(r) => {
            let x  = (r.origin.x.max(0.0) as u32).min(vw);
            let y  = (r.origin.y.max(0.0) as u32).min(vh);
            let x2 = (r.right().max(0.0) as u32).min(vw);
            let y2 = (r.bottom().max(0.0) as u32).min(vh);
            (x, y, x2.saturating_sub(x), y2.saturating_sub(y))
        }
    };

    if w == 0 || h == 0 { None } else { Some((x, y, w, h)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vp() -> Viewport {
        Viewport { width: 100.0, height: 50.0 }
    }

    #[test]
    fn no_clip_is_full_viewport() {
        assert_eq!(clip_to_scissor(None, vp()), Some((0, 0, 100, 50)));
    }

    #[test]
    fn clip_is_clamped_to_viewport() {
        let r = Rect::new(-10.0, 40.0, 200.0, 20.0);
        assert_eq!(clip_to_scissor(Some(r), vp()), Some((0, 40, 100, 10)));
    }

    #[test]
    fn zero_area_clip_skips() {
        let r = Rect::new(10.0, 10.0, 0.0, 5.0);
        assert_eq!(clip_to_scissor(Some(r), vp()), None);
    }
}
