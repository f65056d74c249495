use std::collections::HashMap;
use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};

use crate::render::RenderCtx;
use crate::scene::TextCmd;
use crate::text::FontSystem;

use super::common::{
    create_overlay_pipeline, create_viewport_ubo, viewport_bgl_entry, InstanceBuffer,
    QuadGeometry, ViewportUniform,
};

const LABEL: &str = "vela text";

// ── glyph atlas ───────────────────────────────────────────────────────────

const ATLAS_SIZE: u32 = 2048;
const GLYPH_PADDING: u32 = 1; // pixels between glyphs

#[derive(Debug, Copy, Clone)]
struct AtlasSlot {
    uv_min: [f32; 2],
    uv_max: [f32; 2],
}

/// R8Unorm shelf-packed glyph atlas. Glyphs stay resident for the atlas lifetime.
struct GlyphAtlas {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    full: bool,
    slots: HashMap<GlyphRasterConfig, AtlasSlot>,
}

impl GlyphAtlas {
    fn new(device: &wgpu::Device) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("vela text atlas"),
            size: wgpu::Extent3d {
                width: ATLAS_SIZE,
                height: ATLAS_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            cursor_x: GLYPH_PADDING,
            cursor_y: GLYPH_PADDING,
            row_height: 0,
            full: false,
            slots: HashMap::new(),
        }
    }

    /// Returns the atlas slot for `key`, rasterizing and uploading on first use.
    fn slot(
        &mut self,
        queue: &wgpu::Queue,
        font: &fontdue::Font,
        key: GlyphRasterConfig,
    ) -> Option<AtlasSlot> {
        if let Some(slot) = self.slots.get(&key) {
            return Some(*slot);
        }
        if self.full {
            return None;
        }

        let (metrics, bitmap) = font.rasterize_config(key);
        let (w, h) = (metrics.width as u32, metrics.height as u32);
        if w == 0 || h == 0 {
            return None;
        }

        if self.cursor_x + w + GLYPH_PADDING > ATLAS_SIZE {
            self.cursor_y += self.row_height + GLYPH_PADDING;
            self.cursor_x = GLYPH_PADDING;
            self.row_height = 0;
        }
        if self.cursor_y + h + GLYPH_PADDING > ATLAS_SIZE {
            log::warn!("glyph atlas is full ({ATLAS_SIZE}x{ATLAS_SIZE}); new glyphs are dropped");
            self.full = true;
            return None;
        }

        let (gx, gy) = (self.cursor_x, self.cursor_y);
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x: gx, y: gy, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            &bitmap,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(w),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
        );

        self.cursor_x += w + GLYPH_PADDING;
        self.row_height = self.row_height.max(h);

        let size = ATLAS_SIZE as f32;
        let slot = AtlasSlot {
            uv_min: [gx as f32 / size, gy as f32 / size],
            uv_max: [(gx + w) as f32 / size, (gy + h) as f32 / size],
        };
        self.slots.insert(key, slot);
        Some(slot)
    }
}

// ── renderer ──────────────────────────────────────────────────────────────

/// Text renderer: lays out `TextCmd`s with fontdue and draws glyph quads
/// sampled from a shared atlas.
pub struct TextRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    gpu: Option<TextGpu>,
    layout: Layout<()>,
}

struct TextGpu {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    viewport_ubo: wgpu::Buffer,
    atlas: GlyphAtlas,
    quad: QuadGeometry,
    instances: InstanceBuffer,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            gpu: None,
            layout: Layout::new(CoordinateSystem::PositiveYDown),
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lays out `cmd` and appends one instance per visible glyph to `out`.
    pub(crate) fn layout(
        &mut self,
        ctx: &RenderCtx<'_>,
        cmd: &TextCmd,
        fonts: &FontSystem,
        out: &mut Vec<GlyphInstance>,
    ) {
        self.ensure_gpu(ctx);
        let Some(gpu) = self.gpu.as_mut() else { return };
        let Some(font) = fonts.get(cmd.font) else {
            log::warn!("unknown font {:?}; text skipped", cmd.font);
            return;
        };

        self.layout.reset(&LayoutSettings {
            x: cmd.origin.x,
            y: cmd.origin.y,
            ..LayoutSettings::default()
        });
        self.layout.append(&[font], &TextStyle::new(&cmd.text, cmd.size, 0));

        let color = [cmd.color.r, cmd.color.g, cmd.color.b, cmd.color.a];
        for g in self.layout.glyphs() {
            if !g.char_data.rasterize() || g.width == 0 || g.height == 0 {
                continue;
            }
            let Some(slot) = gpu.atlas.slot(ctx.queue, font, g.key) else { continue };
            out.push(GlyphInstance {
                dst_min: [g.x, g.y],
                dst_max: [g.x + g.width as f32, g.y + g.height as f32],
                uv_min: slot.uv_min,
                uv_max: slot.uv_max,
                color,
            });
        }
    }

    /// Uploads this frame's glyph instances. Must precede [`draw`](Self::draw).
    pub(crate) fn prepare(&mut self, ctx: &RenderCtx<'_>, instances: &[GlyphInstance]) {
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

    /// Draws glyph instances `range` of the last prepared upload.
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
            label: Some("vela text bgl"),
            entries: &[
                viewport_bgl_entry(),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let pipeline = create_overlay_pipeline(
            ctx,
            LABEL,
            include_str!("shaders/text.wgsl"),
            &bgl,
            GlyphInstance::layout(),
        );

        // The atlas survives a format change; only the pipeline is rebuilt.
        let atlas = match self.gpu.take() {
            Some(old) => old.atlas,
            None => GlyphAtlas::new(ctx.device),
        };
        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("vela text sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });
        let viewport_ubo = create_viewport_ubo(ctx.device, LABEL);
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("vela text bind group"),
            layout: &bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: viewport_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&atlas.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        self.gpu = Some(TextGpu {
            pipeline,
            bind_group,
            viewport_ubo,
            atlas,
            quad: QuadGeometry::new(ctx.device, LABEL),
            instances: InstanceBuffer::new("vela text instance vbo"),
        });
        self.pipeline_format = Some(ctx.format);
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance data layout (48 bytes):
///
///  offset  0  dst_min  [f32; 2]   loc 1
///  offset  8  dst_max  [f32; 2]   loc 2
///  offset 16  uv_min   [f32; 2]   loc 3
///  offset 24  uv_max   [f32; 2]   loc 4
///  offset 32  color    [f32; 4]   loc 5
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct GlyphInstance {
    dst_min: [f32; 2],
    dst_max: [f32; 2],
    uv_min:  [f32; 2],
    uv_max:  [f32; 2],
    color:   [f32; 4],
}

impl GlyphInstance {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x2, // dst_min
        2 => Float32x2, // dst_max
        3 => Float32x2, // uv_min
        4 => Float32x2, // uv_max
        5 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GlyphInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
