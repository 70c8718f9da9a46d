use std::collections::{HashMap, HashSet};

use bytemuck::{Pod, Zeroable};

use crate::bitmap::{Bitmap, BitmapStore};
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};
use crate::text::{FontSystem, GlyphAtlas};
use crate::EngineError;

use super::batch::{Quad, TextureKey, VertexBatch, FLOATS_PER_VERTEX};
use super::config::BatchConfig;
use super::shader::ShaderSource;
use super::texture::{create_sampler, GpuTexture};

// ── viewport uniform ──────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ViewportUniform {
    viewport: [f32; 2],
    _pad: [f32; 2], // 16-byte alignment
}

const VERTEX_STRIDE: u64 = (FLOATS_PER_VERTEX * std::mem::size_of::<f32>()) as u64;

const VERTEX_ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
    0 => Float32x2, // position
    1 => Float32x4, // color
    2 => Float32x2  // tex_coord
];

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: VERTEX_STRIDE,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRS,
    }
}

// ── texture sources ───────────────────────────────────────────────────────

/// CPU bitmaps the batch uploads from on first use of a [`TextureKey`].
#[derive(Copy, Clone)]
pub struct TextureSources<'a> {
    pub fonts: &'a FontSystem,
    pub bitmaps: &'a BitmapStore,
}

impl<'a> TextureSources<'a> {
    pub fn new(fonts: &'a FontSystem, bitmaps: &'a BitmapStore) -> Self {
        Self { fonts, bitmaps }
    }

    /// Bitmap backing `key`. The white texel is owned by the batch itself.
    pub fn bitmap(&self, key: TextureKey) -> Option<&'a Bitmap> {
        match key {
            TextureKey::White => None,
            TextureKey::Bitmap(id) => self.bitmaps.get(id),
            TextureKey::Glyphs(id) => self.fonts.atlas(id).map(GlyphAtlas::bitmap),
        }
    }
}

// ── batch ─────────────────────────────────────────────────────────────────

/// Immediate-mode sprite batch.
///
/// Quads are collected into a fixed-size CPU [`VertexBatch`] between
/// [`begin`](Self::begin) and [`end`](Self::end). The batch is flushed (one
/// upload + one draw call) when it cannot fit another quad, when a quad
/// samples a different texture than the pending ones, and at `end`.
///
/// `queue.write_buffer` is staged until the frame is submitted, so every flush
/// within a frame writes a vertex buffer of its own. Buffers are pooled and
/// reused from one frame to the next.
pub struct SpriteBatch {
    shader: ShaderSource,
    batch: VertexBatch,
    drawing: bool,
    flush_slot: usize,

    // pipeline
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    viewport_bgl: Option<wgpu::BindGroupLayout>,
    texture_bgl: Option<wgpu::BindGroupLayout>,

    // bindings
    viewport_ubo: Option<wgpu::Buffer>,
    viewport_bind_group: Option<wgpu::BindGroup>,
    sampler: Option<wgpu::Sampler>,
    textures: HashMap<TextureKey, GpuTexture>,
    missing_textures: HashSet<TextureKey>,

    // geometry
    vertex_buffers: Vec<wgpu::Buffer>,

    warned_not_drawing: bool,
    warned_incomplete: bool,
}

impl SpriteBatch {
    /// Creates a batch. GPU objects are created lazily on the first `begin`;
    /// only the shader source is resolved here.
    pub fn new(config: BatchConfig) -> Result<Self, EngineError> {
        let shader = ShaderSource::resolve(config.shader_path.as_ref())?;
        Ok(Self {
            shader,
            batch: VertexBatch::with_capacity(config.capacity),
            drawing: false,
            flush_slot: 0,
            pipeline_format: None,
            pipeline: None,
            viewport_bgl: None,
            texture_bgl: None,
            viewport_ubo: None,
            viewport_bind_group: None,
            sampler: None,
            textures: HashMap::new(),
            missing_textures: HashSet::new(),
            vertex_buffers: Vec::new(),
            warned_not_drawing: false,
            warned_incomplete: false,
        })
    }

    #[inline]
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Number of flushes issued since the last `begin`.
    #[inline]
    pub fn flush_count(&self) -> usize {
        self.flush_slot
    }

    /// Starts collecting quads for a frame. Does nothing while already drawing.
    pub fn begin(&mut self, ctx: &RenderCtx<'_>) {
        if self.drawing {
            return;
        }

        self.ensure_layouts(ctx);
        self.ensure_pipeline(ctx);
        self.ensure_viewport_bindings(ctx);
        self.ensure_sampler(ctx);
        self.write_viewport_uniform(ctx);

        self.batch.clear();
        self.flush_slot = 0;
        self.drawing = true;
    }

    /// Appends one quad sampling `texture`, flushing pending quads first when
    /// needed. Quads whose texture cannot be resolved are dropped.
    pub fn draw_quad(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        sources: TextureSources<'_>,
        texture: TextureKey,
        quad: &Quad,
    ) {
        if !self.drawing {
            if !self.warned_not_drawing {
                log::warn!("SpriteBatch::draw_quad called outside begin/end; quad dropped");
                self.warned_not_drawing = true;
            }
            return;
        }

        if !self.ensure_texture(ctx, sources, texture) {
            return;
        }

        if self.batch.needs_flush(texture) {
            self.flush(ctx, target);
        }
        let pushed = self.batch.push_quad(texture, quad);
        debug_assert!(pushed, "flush left quads pending");
    }

    /// Flushes pending quads and stops drawing. Does nothing when not drawing.
    pub fn end(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        if !self.drawing {
            return;
        }
        self.flush(ctx, target);
        self.drawing = false;
    }

    /// Uploads pending vertices and draws them as a triangle list in a render
    /// pass that loads the existing target contents. The CPU batch is always
    /// emptied, even when the GPU objects are missing and nothing is drawn.
    pub fn flush(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        if self.batch.is_empty() {
            return;
        }

        if let Some(texture) = self.batch.texture() {
            self.ensure_vertex_buffer(ctx, self.flush_slot);
            if self.draw_pending(ctx, target, texture) {
                self.flush_slot += 1;
            } else if !self.warned_incomplete {
                log::warn!("sprite batch flushed before its GPU objects existed; quads dropped");
                self.warned_incomplete = true;
            }
        }

        self.batch.clear();
    }

    /// Records the draw for the pending vertices. Returns `false` when a GPU
    /// object it needs has not been created.
    fn draw_pending(&self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, texture: TextureKey) -> bool {
        let Some(pipeline) = self.pipeline.as_ref() else { return false; };
        let Some(viewport_bg) = self.viewport_bind_group.as_ref() else { return false; };
        let Some(gpu_texture) = self.textures.get(&texture) else { return false; };
        let Some(vbo) = self.vertex_buffers.get(self.flush_slot) else { return false; };

        let vertices = self.batch.vertices();
        let bytes = std::mem::size_of_val(vertices) as u64;
        ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(vertices));

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("glint sprite pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, viewport_bg, &[]);
        rpass.set_bind_group(1, &gpu_texture.bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(0..bytes));
        rpass.draw(0..self.batch.vertex_count(), 0..1);
        true
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_layouts(&mut self, ctx: &RenderCtx<'_>) {
        if self.viewport_bgl.is_some() && self.texture_bgl.is_some() {
            return;
        }

        self.viewport_bgl = Some(ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("glint sprite viewport bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<ViewportUniform>() as u64),
                },
                count: None,
            }],
        }));

        self.texture_bgl = Some(ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("glint sprite texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        }));

        // Texture bind groups were built against the old layout.
        self.textures.clear();
        self.viewport_bind_group = None;
        self.pipeline = None;
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }
        let Some(viewport_bgl) = self.viewport_bgl.as_ref() else { return; };
        let Some(texture_bgl) = self.texture_bgl.as_ref() else { return; };

        let shader = self.shader.module(ctx.device);

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("glint sprite pipeline layout"),
            bind_group_layouts: &[viewport_bgl, texture_bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("glint sprite pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
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
        });

        log::debug!("created sprite pipeline for {:?} ({})", ctx.surface_format, self.shader.label());
        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
    }

    fn ensure_viewport_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.viewport_bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.viewport_bgl.as_ref() else { return; };

        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("glint sprite viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("glint sprite viewport bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        self.viewport_ubo = Some(ubo);
        self.viewport_bind_group = Some(bind_group);
    }

    fn ensure_sampler(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_none() {
            self.sampler = Some(create_sampler(ctx.device));
        }
    }

    /// Uploads the texture for `key` on first use. Returns `false` when the key
    /// has no bitmap behind it.
    fn ensure_texture(&mut self, ctx: &RenderCtx<'_>, sources: TextureSources<'_>, key: TextureKey) -> bool {
        if self.textures.contains_key(&key) {
            return true;
        }
        if self.missing_textures.contains(&key) {
            return false;
        }
        let Some(layout) = self.texture_bgl.as_ref() else { return false; };
        let Some(sampler) = self.sampler.as_ref() else { return false; };

        let white;
        let bitmap = match key {
            TextureKey::White => {
                white = Bitmap::solid(Color::WHITE, 1, 1);
                &white
            }
            _ => match sources.bitmap(key) {
                Some(b) => b,
                None => {
                    if self.missing_textures.insert(key) {
                        log::warn!("no bitmap for {key:?}; quads using it are skipped");
                    }
                    return false;
                }
            },
        };

        let label = format!("glint texture {key:?}");
        match GpuTexture::upload(ctx, layout, sampler, bitmap, &label) {
            Some(texture) => {
                self.textures.insert(key, texture);
                true
            }
            None => {
                // Oversized; remembered so the upload is not retried every quad.
                self.missing_textures.insert(key);
                false
            }
        }
    }

    fn ensure_vertex_buffer(&mut self, ctx: &RenderCtx<'_>, slot: usize) {
        let size = (self.batch.capacity() * std::mem::size_of::<f32>()) as u64;
        while self.vertex_buffers.len() <= slot {
            log::debug!("allocating sprite vertex buffer #{}", self.vertex_buffers.len());
            self.vertex_buffers.push(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("glint sprite vbo"),
                size,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
        }
    }

    fn write_viewport_uniform(&self, ctx: &RenderCtx<'_>) {
        let Some(ubo) = self.viewport_ubo.as_ref() else { return; };
        let w = ctx.viewport.width.max(1.0);
        let h = ctx.viewport.height.max(1.0);
        ctx.queue.write_buffer(
            ubo,
            0,
            bytemuck::bytes_of(&ViewportUniform { viewport: [w, h], _pad: [0.0; 2] }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::BitmapId;
    use crate::text::FontId;

    #[test]
    fn vertex_layout_matches_batch_format() {
        let layout = vertex_layout();
        assert_eq!(layout.array_stride, 32);
        let offsets: Vec<u64> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 8, 24]);
    }

    #[test]
    fn missing_shader_file_fails_creation() {
        let config = BatchConfig { shader_path: Some("/no/such/sprite.wgsl".into()), ..Default::default() };
        assert!(matches!(SpriteBatch::new(config), Err(EngineError::Io { .. })));
    }

    #[test]
    fn new_batch_is_idle() {
        let batch = SpriteBatch::new(BatchConfig::default()).unwrap();
        assert!(!batch.is_drawing());
        assert_eq!(batch.flush_count(), 0);
    }

    #[test]
    fn sources_resolve_bitmaps_only_for_known_ids() {
        let fonts = FontSystem::new();
        let mut bitmaps = BitmapStore::new();
        let id = bitmaps.insert(Bitmap::solid(Color::BLACK, 2, 2));
        let sources = TextureSources::new(&fonts, &bitmaps);

        assert!(sources.bitmap(TextureKey::White).is_none());
        assert_eq!(sources.bitmap(TextureKey::Bitmap(id)).map(Bitmap::width), Some(2));
        assert!(sources.bitmap(TextureKey::Bitmap(BitmapId(9))).is_none());
        assert!(sources.bitmap(TextureKey::Glyphs(FontId(0))).is_none());
    }
}
