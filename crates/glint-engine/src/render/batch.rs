use crate::bitmap::BitmapId;
use crate::paint::Color;
use crate::text::FontId;

/// Floats per vertex: position (2) + color (4) + texcoord (2).
pub const FLOATS_PER_VERTEX: usize = 8;
/// Two triangles per quad.
pub const VERTICES_PER_QUAD: usize = 6;
pub const FLOATS_PER_QUAD: usize = FLOATS_PER_VERTEX * VERTICES_PER_QUAD;

/// Default batch capacity, in floats.
pub const DEFAULT_CAPACITY: usize = 4096;

/// Attribute offsets within one vertex, in floats.
pub const POSITION_OFFSET: usize = 0;
pub const COLOR_OFFSET: usize = 2;
pub const TEX_COORD_OFFSET: usize = 6;

/// Identifies the texture a quad samples.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TextureKey {
    /// 1×1 white texel; solid and gradient fills.
    White,
    Bitmap(BitmapId),
    Glyphs(FontId),
}

/// Per-corner colors of a quad.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct QuadColors {
    pub top_left: Color,
    pub top_right: Color,
    pub bottom_right: Color,
    pub bottom_left: Color,
}

impl QuadColors {
    #[inline]
    pub fn uniform(c: Color) -> Self {
        Self { top_left: c, top_right: c, bottom_right: c, bottom_left: c }
    }

    #[inline]
    pub fn horizontal(left: Color, right: Color) -> Self {
        Self { top_left: left, top_right: right, bottom_right: right, bottom_left: left }
    }

    #[inline]
    pub fn vertical(top: Color, bottom: Color) -> Self {
        Self { top_left: top, top_right: top, bottom_right: bottom, bottom_left: bottom }
    }
}

/// A textured rectangle in logical pixels (top-left origin).
///
/// `(x1, y1)` is the top-left corner and samples `(s1, t1)`; `(x2, y2)` is the
/// bottom-right corner and samples `(s2, t2)`. Texture coordinates follow the
/// bottom-left origin convention, so an upright image uses `t1 = 1, t2 = 0`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Quad {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub s1: f32,
    pub t1: f32,
    pub s2: f32,
    pub t2: f32,
    pub colors: QuadColors,
}

impl Quad {
    /// Untextured rectangle (samples the white texel).
    pub fn filled(x: f32, y: f32, w: f32, h: f32, colors: QuadColors) -> Self {
        Self { x1: x, y1: y, x2: x + w, y2: y + h, s1: 0.0, t1: 1.0, s2: 1.0, t2: 0.0, colors }
    }

    /// Rectangle showing a whole upright image.
    pub fn image(x: f32, y: f32, w: f32, h: f32, tint: Color) -> Self {
        Self::filled(x, y, w, h, QuadColors::uniform(tint))
    }
}

/// Fixed-capacity CPU buffer of interleaved vertices.
///
/// The buffer holds quads for a single texture. The GPU side asks
/// [`needs_flush`](Self::needs_flush) before every push and uploads + clears
/// the buffer when it returns `true`.
#[derive(Debug)]
pub struct VertexBatch {
    vertices: Vec<f32>,
    capacity: usize,
    vertex_count: u32,
    texture: Option<TextureKey>,
}

impl VertexBatch {
    /// Creates a batch holding at most `capacity` floats.
    ///
    /// Capacity is raised to one quad when smaller.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(FLOATS_PER_QUAD);
        Self { vertices: Vec::with_capacity(capacity), capacity, vertex_count: 0, texture: None }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Floats still free.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity - self.vertices.len()
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }

    /// Texture shared by every pending quad.
    #[inline]
    pub fn texture(&self) -> Option<TextureKey> {
        self.texture
    }

    #[inline]
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    /// `true` when pending vertices must be flushed before a quad sampling
    /// `texture` can be pushed: the buffer cannot fit another quad, or the
    /// pending quads use another texture.
    #[inline]
    pub fn needs_flush(&self, texture: TextureKey) -> bool {
        !self.is_empty() && (self.remaining() < FLOATS_PER_QUAD || self.texture != Some(texture))
    }

    /// Appends the six vertices of `quad`.
    ///
    /// Returns `false` (and appends nothing) when the caller skipped a
    /// required flush.
    pub fn push_quad(&mut self, texture: TextureKey, quad: &Quad) -> bool {
        if self.needs_flush(texture) {
            return false;
        }

        let Quad { x1, y1, x2, y2, s1, t1, s2, t2, colors } = *quad;
        self.put(x1, y1, colors.top_left, s1, t1);
        self.put(x1, y2, colors.bottom_left, s1, t2);
        self.put(x2, y2, colors.bottom_right, s2, t2);
        self.put(x1, y1, colors.top_left, s1, t1);
        self.put(x2, y2, colors.bottom_right, s2, t2);
        self.put(x2, y1, colors.top_right, s2, t1);

        self.vertex_count += VERTICES_PER_QUAD as u32;
        self.texture = Some(texture);
        true
    }

    /// Drops pending vertices, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.vertex_count = 0;
        self.texture = None;
    }

    #[inline]
    fn put(&mut self, x: f32, y: f32, c: Color, s: f32, t: f32) {
        let [r, g, b, a] = c.to_array();
        self.vertices.extend_from_slice(&[x, y, r, g, b, a, s, t]);
    }
}

impl Default for VertexBatch {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red_quad() -> Quad {
        Quad::filled(10.0, 20.0, 30.0, 40.0, QuadColors::uniform(Color::rgb(1.0, 0.0, 0.0)))
    }

    fn vertex(batch: &VertexBatch, i: usize) -> &[f32] {
        &batch.vertices()[i * FLOATS_PER_VERTEX..(i + 1) * FLOATS_PER_VERTEX]
    }

    #[test]
    fn quad_is_six_interleaved_vertices() {
        let mut batch = VertexBatch::default();
        assert!(batch.push_quad(TextureKey::White, &red_quad()));

        assert_eq!(batch.vertex_count(), 6);
        assert_eq!(batch.vertices().len(), FLOATS_PER_QUAD);
        assert_eq!(vertex(&batch, 0), &[10.0, 20.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0]);
        assert_eq!(vertex(&batch, 1), &[10.0, 60.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        assert_eq!(vertex(&batch, 2), &[40.0, 60.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0]);
        assert_eq!(vertex(&batch, 5), &[40.0, 20.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn attribute_offsets_cover_the_vertex() {
        assert_eq!(POSITION_OFFSET + 2, COLOR_OFFSET);
        assert_eq!(COLOR_OFFSET + 4, TEX_COORD_OFFSET);
        assert_eq!(TEX_COORD_OFFSET + 2, FLOATS_PER_VERTEX);
        assert_eq!(FLOATS_PER_QUAD, 48);
    }

    #[test]
    fn gradient_colors_land_on_their_corners() {
        let left = Color::rgb(1.0, 0.0, 0.0);
        let right = Color::rgb(0.0, 0.0, 1.0);
        let mut batch = VertexBatch::default();
        batch.push_quad(TextureKey::White, &Quad::filled(0.0, 0.0, 1.0, 1.0, QuadColors::horizontal(left, right)));

        let color = |i| vertex(&batch, i)[COLOR_OFFSET..COLOR_OFFSET + 4].to_vec();
        // Vertices 0, 1, 3 are on the left edge; 2, 4, 5 on the right.
        for i in [0, 1, 3] {
            assert_eq!(color(i), left.to_array().to_vec());
        }
        for i in [2, 4, 5] {
            assert_eq!(color(i), right.to_array().to_vec());
        }
    }

    #[test]
    fn default_capacity_fits_85_quads() {
        let mut batch = VertexBatch::default();
        let mut pushed = 0;
        while !batch.needs_flush(TextureKey::White) {
            assert!(batch.push_quad(TextureKey::White, &red_quad()));
            pushed += 1;
        }
        // 4096 / 48 = 85 quads, 16 floats left over.
        assert_eq!(pushed, 85);
        assert_eq!(batch.remaining(), 16);
        assert!(!batch.push_quad(TextureKey::White, &red_quad()));
        assert_eq!(batch.vertex_count(), 85 * 6);
    }

    #[test]
    fn texture_change_requires_flush() {
        let mut batch = VertexBatch::default();
        let glyphs = TextureKey::Glyphs(FontId(0));
        assert!(!batch.needs_flush(glyphs));
        batch.push_quad(TextureKey::White, &red_quad());
        assert!(!batch.needs_flush(TextureKey::White));
        assert!(batch.needs_flush(glyphs));
        assert!(!batch.push_quad(glyphs, &red_quad()));

        batch.clear();
        assert!(batch.push_quad(glyphs, &red_quad()));
        assert_eq!(batch.texture(), Some(glyphs));
    }

    #[test]
    fn a_cleared_batch_accepts_any_texture() {
        let mut batch = VertexBatch::with_capacity(FLOATS_PER_QUAD);
        let quad = Quad::filled(0.0, 0.0, 1.0, 1.0, QuadColors::uniform(Color::WHITE));
        assert!(batch.push_quad(TextureKey::White, &quad));
        assert!(batch.needs_flush(TextureKey::White));
        assert!(!batch.push_quad(TextureKey::White, &quad));

        batch.clear();
        let other = TextureKey::Bitmap(crate::bitmap::BitmapId(3));
        assert!(!batch.needs_flush(other));
        assert!(batch.push_quad(other, &quad));
        assert_eq!(batch.texture(), Some(other));
    }

    #[test]
    fn clear_resets_counts() {
        let mut batch = VertexBatch::default();
        batch.push_quad(TextureKey::White, &red_quad());
        batch.clear();
        assert!(batch.is_empty());
        assert_eq!(batch.remaining(), DEFAULT_CAPACITY);
        assert_eq!(batch.texture(), None);
    }

    #[test]
    fn capacity_is_at_least_one_quad() {
        let mut batch = VertexBatch::with_capacity(10);
        assert_eq!(batch.capacity(), FLOATS_PER_QUAD);
        assert!(batch.push_quad(TextureKey::White, &red_quad()));
        assert!(batch.needs_flush(TextureKey::White));
    }
}
