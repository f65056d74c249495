//! Draw-call execution: static buffers, programs, cached pipelines and the
//! per-draw transform uniforms.

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::gfx::{
    AttribType, CullMode, DepthTest, Frame, IndexBufferHandle, ProgramHandle,
    RenderDraw, ShaderSource, StateFlags, Topology, VertexBufferHandle, VertexLayout, ViewId,
};
use crate::math::{mtx_mul, Mat4, IDENTITY};

pub(super) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const MAT4_SIZE: u64 = std::mem::size_of::<Mat4>() as u64;

/// State bits that affect the pipeline. MSAA is decided by the render target.
const PIPELINE_STATE_MASK: StateFlags = StateFlags::WRITE_MASK
    .union(StateFlags::DEPTH_TEST_MASK)
    .union(StateFlags::CULL_MASK)
    .union(StateFlags::PT_MASK);

struct GpuVertexBuffer {
    buffer: wgpu::Buffer,
    layout: VertexLayout,
    attributes: Vec<wgpu::VertexAttribute>,
}

struct GpuProgram {
    vs: wgpu::ShaderModule,
    fs: wgpu::ShaderModule,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
struct PipelineKey {
    program: ProgramHandle,
    layout: u64,
    state: u64,
    format: wgpu::TextureFormat,
    samples: u32,
    wireframe: bool,
}

/// Target description shared by every pipeline in one frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(super) struct TargetDesc {
    pub format: wgpu::TextureFormat,
    pub samples: u32,
    pub wireframe: bool,
}

/// Per-draw result of [`MeshRenderer::prepare`].
#[derive(Debug, Copy, Clone)]
struct PreparedDraw {
    key: PipelineKey,
    uniform_offset: u32,
}

/// Owns mesh resources and records submitted draws into view passes.
pub(super) struct MeshRenderer {
    vertex_buffers: HashMap<VertexBufferHandle, GpuVertexBuffer>,
    index_buffers: HashMap<IndexBufferHandle, wgpu::Buffer>,
    programs: HashMap<ProgramHandle, GpuProgram>,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,

    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    uniforms: UniformRing,

    /// Indexed like `Frame::draws`; `None` for draws that were dropped.
    prepared: Vec<Option<PreparedDraw>>,
    staging: Vec<u8>,
}

impl MeshRenderer {
    pub(super) fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("vela mesh bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(MAT4_SIZE),
                },
                count: None,
            }],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("vela mesh pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let uniforms = UniformRing::new(device, &bind_group_layout, alignment);

        Self {
            vertex_buffers: HashMap::new(),
            index_buffers: HashMap::new(),
            programs: HashMap::new(),
            pipelines: HashMap::new(),
            bind_group_layout,
            pipeline_layout,
            uniforms,
            prepared: Vec::new(),
            staging: Vec::new(),
        }
    }

    // ── resources ─────────────────────────────────────────────────────────

    pub(super) fn create_vertex_buffer(
        &mut self,
        device: &wgpu::Device,
        handle: VertexBufferHandle,
        data: &[u8],
        layout: &VertexLayout,
    ) {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("vela vertex buffer {}", handle.idx())),
            contents: data,
            usage: wgpu::BufferUsages::VERTEX,
        });
        let attributes = layout
            .attributes()
            .iter()
            .enumerate()
            .map(|(location, a)| wgpu::VertexAttribute {
                format: vertex_format(a.ty, a.num, a.normalized),
                offset: a.offset as u64,
                shader_location: location as u32,
            })
            .collect();
        self.vertex_buffers.insert(handle, GpuVertexBuffer {
            buffer,
            layout: layout.clone(),
            attributes,
        });
    }

    pub(super) fn create_index_buffer(
        &mut self,
        device: &wgpu::Device,
        handle: IndexBufferHandle,
        indices: &[u16],
    ) {
        // Index buffer sizes must be a multiple of 4 bytes.
        let mut bytes: Vec<u8> = bytemuck::cast_slice(indices).to_vec();
        bytes.resize(bytes.len().next_multiple_of(4), 0);

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("vela index buffer {}", handle.idx())),
            contents: &bytes,
            usage: wgpu::BufferUsages::INDEX,
        });
        self.index_buffers.insert(handle, buffer);
    }

    pub(super) fn create_program(
        &mut self,
        device: &wgpu::Device,
        handle: ProgramHandle,
        vs: &ShaderSource,
        fs: &ShaderSource,
    ) {
        let vs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(vs.name.as_ref()),
            source: wgpu::ShaderSource::Wgsl(vs.wgsl.clone()),
        });
        let fs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(fs.name.as_ref()),
            source: wgpu::ShaderSource::Wgsl(fs.wgsl.clone()),
        });
        self.programs.insert(handle, GpuProgram { vs: vs_module, fs: fs_module });
    }

    pub(super) fn destroy_vertex_buffer(&mut self, handle: VertexBufferHandle) {
        self.vertex_buffers.remove(&handle);
    }

    pub(super) fn destroy_index_buffer(&mut self, handle: IndexBufferHandle) {
        self.index_buffers.remove(&handle);
    }

    pub(super) fn destroy_program(&mut self, handle: ProgramHandle) {
        self.programs.remove(&handle);
        self.pipelines.retain(|key, _| key.program != handle);
    }

    // ── per frame ─────────────────────────────────────────────────────────

    /// Resolves pipelines and uploads one model-view-projection matrix per draw.
    pub(super) fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        frame: &Frame,
        target: TargetDesc,
    ) {
        self.prepared.clear();
        self.staging.clear();

        let stride = self.uniforms.stride;
        for draw in &frame.draws {
            let Some(key) = self.ensure_pipeline(device, draw, target) else {
                self.prepared.push(None);
                continue;
            };

            let (view, proj) = frame
                .views
                .iter()
                .find(|v| v.id == draw.view)
                .map_or((IDENTITY, IDENTITY), |v| (v.view.view, v.view.proj));
            let mvp = mtx_mul(&proj, &mtx_mul(&view, &draw.transform));

            let offset = self.staging.len();
            self.staging.extend_from_slice(bytemuck::cast_slice(&mvp));
            self.staging.resize(offset + stride as usize, 0);

            self.prepared.push(Some(PreparedDraw { key, uniform_offset: offset as u32 }));
        }

        if !self.staging.is_empty() {
            self.uniforms.upload(device, queue, &self.bind_group_layout, &self.staging);
        }
    }

    /// Records the draws of `view` into `rpass`.
    pub(super) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, frame: &Frame, view: ViewId) {
        let Some(bind_group) = self.uniforms.bind_group.as_ref() else { return };

        for (i, draw) in frame.draws_for(view) {
            let Some(Some(prepared)) = self.prepared.get(i) else { continue };
            let Some(pipeline) = self.pipelines.get(&prepared.key) else { continue };
            let Some(vb) = self.vertex_buffers.get(&draw.vertex_buffer) else { continue };

            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, bind_group, &[prepared.uniform_offset]);
            rpass.set_vertex_buffer(0, vb.buffer.slice(..));

            match draw.index_buffer.and_then(|h| self.index_buffers.get(&h)) {
                Some(ib) => {
                    rpass.set_index_buffer(ib.slice(..), wgpu::IndexFormat::Uint16);
                    rpass.draw_indexed(0..draw.num_indices, 0, 0..1);
                }
                None => rpass.draw(0..draw.num_vertices, 0..1),
            }
        }
    }

    fn ensure_pipeline(
        &mut self,
        device: &wgpu::Device,
        draw: &RenderDraw,
        target: TargetDesc,
    ) -> Option<PipelineKey> {
        let vb = self.vertex_buffers.get(&draw.vertex_buffer)?;
        let program = self.programs.get(&draw.program)?;

        let state = draw.state & PIPELINE_STATE_MASK;
        let key = PipelineKey {
            program: draw.program,
            layout: vb.layout.hash(),
            state: state.bits(),
            format: target.format,
            samples: target.samples,
            wireframe: target.wireframe,
        };
        if self.pipelines.contains_key(&key) {
            return Some(key);
        }

        let topology = state.topology();
        let is_triangles = matches!(topology, Topology::TriList | Topology::TriStrip);
        let polygon_mode = if target.wireframe && is_triangles {
            wgpu::PolygonMode::Line
        } else {
            wgpu::PolygonMode::Fill
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("vela mesh pipeline {:#x}", key.state)),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &program.vs,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: vb.layout.stride() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &vb.attributes,
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &program.fs,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target.format,
                    blend: None,
                    write_mask: color_write_mask(state),
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: primitive_topology(topology),
                strip_index_format: topology.is_strip().then_some(wgpu::IndexFormat::Uint16),
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: cull_face(state.cull()),
                polygon_mode,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: state.writes_depth(),
                depth_compare: depth_compare(state.depth_test()),
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: target.samples,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview_mask: None,
            cache: None,
        });

        log::debug!("created mesh pipeline {key:?}");
        self.pipelines.insert(key, pipeline);
        Some(key)
    }
}

// ── uniform ring ──────────────────────────────────────────────────────────

/// One dynamic-offset uniform buffer holding every draw's matrix for a frame.
struct UniformRing {
    buffer: wgpu::Buffer,
    bind_group: Option<wgpu::BindGroup>,
    capacity: u64,
    /// Bytes between consecutive matrices; a multiple of the device alignment.
    stride: u64,
}

impl UniformRing {
    fn new(device: &wgpu::Device, bgl: &wgpu::BindGroupLayout, alignment: u64) -> Self {
        let stride = MAT4_SIZE.next_multiple_of(alignment.max(1));
        let capacity = stride * 256;
        let buffer = Self::create_buffer(device, capacity);
        let bind_group = Some(Self::create_bind_group(device, bgl, &buffer));
        Self { buffer, bind_group, capacity, stride }
    }

    fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bgl: &wgpu::BindGroupLayout,
        bytes: &[u8],
    ) {
        let needed = bytes.len() as u64;
        if needed > self.capacity {
            self.capacity = needed.next_power_of_two();
            self.buffer = Self::create_buffer(device, self.capacity);
            self.bind_group = Some(Self::create_bind_group(device, bgl, &self.buffer));
        }
        queue.write_buffer(&self.buffer, 0, bytes);
    }

    fn create_buffer(device: &wgpu::Device, size: u64) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("vela mesh uniforms"),
            size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn create_bind_group(
        device: &wgpu::Device,
        bgl: &wgpu::BindGroupLayout,
        buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("vela mesh uniform bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(MAT4_SIZE),
                }),
            }],
        })
    }
}

// ── state mapping ─────────────────────────────────────────────────────────

fn vertex_format(ty: AttribType, num: u8, normalized: bool) -> wgpu::VertexFormat {
    use wgpu::VertexFormat as F;
    match (ty, num, normalized) {
        (AttribType::Float, 1, _) => F::Float32,
        (AttribType::Float, 2, _) => F::Float32x2,
        (AttribType::Float, 3, _) => F::Float32x3,
        (AttribType::Float, _, _) => F::Float32x4,
        (AttribType::Uint8, _, true) => F::Unorm8x4,
        (AttribType::Uint8, _, false) => F::Uint8x4,
        (AttribType::Int16, 2, true) => F::Snorm16x2,
        (AttribType::Int16, 2, false) => F::Sint16x2,
        (AttribType::Int16, _, true) => F::Snorm16x4,
        (AttribType::Int16, _, false) => F::Sint16x4,
    }
}

fn primitive_topology(t: Topology) -> wgpu::PrimitiveTopology {
    match t {
        Topology::TriList => wgpu::PrimitiveTopology::TriangleList,
        Topology::TriStrip => wgpu::PrimitiveTopology::TriangleStrip,
        Topology::Lines => wgpu::PrimitiveTopology::LineList,
        Topology::LineStrip => wgpu::PrimitiveTopology::LineStrip,
        Topology::Points => wgpu::PrimitiveTopology::PointList,
    }
}

/// Front faces are counter-clockwise, so culling clockwise culls back faces.
fn cull_face(cull: Option<CullMode>) -> Option<wgpu::Face> {
    match cull? {
        CullMode::Clockwise => Some(wgpu::Face::Back),
        CullMode::CounterClockwise => Some(wgpu::Face::Front),
    }
}

fn depth_compare(test: Option<DepthTest>) -> wgpu::CompareFunction {
    use wgpu::CompareFunction as C;
    match test {
        None | Some(DepthTest::Always) => C::Always,
        Some(DepthTest::Less) => C::Less,
        Some(DepthTest::LessEqual) => C::LessEqual,
        Some(DepthTest::Equal) => C::Equal,
        Some(DepthTest::GreaterEqual) => C::GreaterEqual,
        Some(DepthTest::Greater) => C::Greater,
        Some(DepthTest::NotEqual) => C::NotEqual,
        Some(DepthTest::Never) => C::Never,
    }
}

fn color_write_mask(state: StateFlags) -> wgpu::ColorWrites {
    let mut mask = wgpu::ColorWrites::empty();
    if state.contains(StateFlags::WRITE_R) {
        mask |= wgpu::ColorWrites::RED;
    }
    if state.contains(StateFlags::WRITE_G) {
        mask |= wgpu::ColorWrites::GREEN;
    }
    if state.contains(StateFlags::WRITE_B) {
        mask |= wgpu::ColorWrites::BLUE;
    }
    if state.contains(StateFlags::WRITE_A) {
        mask |= wgpu::ColorWrites::ALPHA;
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_writes_map_per_channel() {
        let s = StateFlags::WRITE_R | StateFlags::WRITE_A | StateFlags::WRITE_Z;
        assert_eq!(color_write_mask(s), wgpu::ColorWrites::RED | wgpu::ColorWrites::ALPHA);
        assert_eq!(color_write_mask(StateFlags::WRITE_Z), wgpu::ColorWrites::empty());
    }

    #[test]
    fn cull_cw_culls_back_faces() {
        assert_eq!(cull_face(StateFlags::CULL_CW.cull()), Some(wgpu::Face::Back));
        assert_eq!(cull_face(StateFlags::CULL_CCW.cull()), Some(wgpu::Face::Front));
        assert_eq!(cull_face(StateFlags::empty().cull()), None);
    }

    #[test]
    fn missing_depth_test_always_passes() {
        assert_eq!(depth_compare(None), wgpu::CompareFunction::Always);
        assert_eq!(depth_compare(StateFlags::DEPTH_TEST_LESS.depth_test()), wgpu::CompareFunction::Less);
    }

    #[test]
    fn topology_follows_primitive_bits() {
        assert_eq!(primitive_topology(StateFlags::PT_LINESTRIP.topology()), wgpu::PrimitiveTopology::LineStrip);
        assert_eq!(primitive_topology(StateFlags::empty().topology()), wgpu::PrimitiveTopology::TriangleList);
    }

    #[test]
    fn packed_color_is_unorm() {
        assert_eq!(vertex_format(AttribType::Uint8, 4, true), wgpu::VertexFormat::Unorm8x4);
        assert_eq!(vertex_format(AttribType::Float, 3, false), wgpu::VertexFormat::Float32x3);
    }
}
