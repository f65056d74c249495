use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::render::RenderCtx;
use crate::scene::RectCmd;

use super::common::{
    create_overlay_pipeline, create_viewport_ubo, viewport_bgl_entry, InstanceBuffer,
    QuadGeometry, ViewportUniform,
};

const LABEL: &str = "vela rect";

/// Solid rectangle renderer.
///
/// Instances are recorded by the overlay pass in paint order; [`prepare`](Self::prepare)
/// uploads them once per frame and [`draw`](Self::draw) issues one instanced call per batch.
#[derive(Default)]
pub struct RectRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    gpu: Option<RectGpu>,
}

struct RectGpu {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    viewport_ubo: wgpu::Buffer,
    quad: QuadGeometry,
    instances: InstanceBuffer,
}

impl RectRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads this frame's instances. Must precede [`draw`](Self::draw).
    pub(crate) fn prepare(&mut self, ctx: &RenderCtx<'_>, instances: &[RectInstance]) {
        if instances.is_empty() {
            return;
        }
        self.ensure_gpu(ctx);
        let Some(gpu) = self.gpu.as_mut() else { return };

        ctx.queue.write_buffer(
            &gpu.viewport_ubo,
            0,
            bytemuck::bytes_of(&ViewportUniform::new(ctx.viewport)),
        );
        gpu.instances.upload(ctx, instances);
    }

    /// Draws instances `range` of the last prepared upload.
    pub(crate) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, range: Range<u32>) {
        let Some(gpu) = self.gpu.as_ref() else { return };
        if range.is_empty() {
            return;
        }
        rpass.set_pipeline(&gpu.pipeline);
        rpass.set_bind_group(0, &gpu.bind_group, &[]);
        gpu.quad.bind(rpass);
        if gpu.instances.bind(rpass) {
            rpass.draw_indexed(0..6, 0, range);
        }
    }

    fn ensure_gpu(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.format) && self.gpu.is_some() {
            return;
        }

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("vela rect bgl"),
            entries: &[viewport_bgl_entry()],
        });
        let pipeline = create_overlay_pipeline(
            ctx,
            LABEL,
            include_str!("shaders/rect.wgsl"),
            &bgl,
            RectInstance::layout(),
        );

        let viewport_ubo = create_viewport_ubo(ctx.device, LABEL);
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("vela rect bind group"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.gpu = Some(RectGpu {
            pipeline,
            bind_group,
            viewport_ubo,
            quad: QuadGeometry::new(ctx.device, LABEL),
            instances: InstanceBuffer::new("vela rect instance vbo"),
        });
        self.pipeline_format = Some(ctx.format);
    }
}

/// Per-rect GPU data, 32 bytes.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct RectInstance {
    origin: [f32; 2],
    size: [f32; 2],
    color: [f32; 4],
}

impl RectInstance {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        1 => Float32x2, // origin
        2 => Float32x2, // size
        3 => Float32x4  // color
    ];

    /// Converts a rect command; `None` when it covers no pixels.
    pub(crate) fn from_cmd(cmd: &RectCmd) -> Option<Self> {
        let r = cmd.rect.normalized();
        if r.is_empty() || cmd.color.a <= 0.0 {
            return None;
        }
        let c = cmd.color;
        Some(Self {
            origin: [r.origin.x, r.origin.y],
            size: [r.size.x, r.size.y],
            color: [c.r, c.g, c.b, c.a],
        })
    }

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<RectInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
