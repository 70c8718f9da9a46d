use glint_engine::bitmap::BitmapId;
use glint_engine::paint::Color;
use glint_engine::render::{Quad, QuadColors, RenderCtx, RenderTarget, SpriteBatch, TextureKey, TextureSources};
use glint_engine::text::{FontId, GlyphAtlas};

/// Drawing surface passed to [`Component::render`](crate::Component::render).
///
/// Coordinates are logical pixels with a top-left origin, relative to the
/// current translation.
pub trait Graphics {
    fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color);

    /// Rectangle fading from `left` to `right`.
    fn draw_horizontal_gradient_rect(&mut self, x: i32, y: i32, width: i32, height: i32, left: Color, right: Color);

    /// Rectangle fading from `top` to `bottom`.
    fn draw_vertical_gradient_rect(&mut self, x: i32, y: i32, width: i32, height: i32, top: Color, bottom: Color);

    /// Draws `text` with the current font; `(x, y)` is the top-left of the
    /// first line. Does nothing without a font.
    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color);

    /// Draws a bitmap at its natural size.
    fn draw_image(&mut self, image: BitmapId, x: i32, y: i32);

    fn set_font(&mut self, font: Option<FontId>);

    fn font(&self) -> Option<FontId>;

    /// `(width, height)` of `text` in the current font; zero without a font.
    fn text_size(&self, text: &str) -> (u32, u32);

    /// Moves the origin by `(dx, dy)`.
    fn translate(&mut self, dx: i32, dy: i32);
}

// ── text layout ───────────────────────────────────────────────────────────

/// One quad per drawable character of `text`, starting at `(x, y)`.
///
/// Lines advance by the atlas line height; `\r` and characters missing from
/// the atlas are skipped.
pub fn text_quads(atlas: &GlyphAtlas, text: &str, x: f32, y: f32, color: Color) -> Vec<Quad> {
    let line_height = atlas.line_height() as f32;
    let colors = QuadColors::uniform(color);

    let mut quads = Vec::with_capacity(text.len());
    let (mut pen_x, mut pen_y) = (x, y);

    for c in text.chars() {
        match c {
            '\n' => {
                pen_x = x;
                pen_y += line_height;
            }
            '\r' => {}
            _ => {
                let Some(glyph) = atlas.glyph(c) else { continue; };
                let uv = atlas.uv(glyph);
                let (w, h) = (glyph.width as f32, glyph.height as f32);
                quads.push(Quad {
                    x1: pen_x,
                    y1: pen_y,
                    x2: pen_x + w,
                    y2: pen_y + h,
                    s1: uv.s_left,
                    t1: uv.t_top,
                    s2: uv.s_right,
                    t2: uv.t_bottom,
                    colors,
                });
                pen_x += w;
            }
        }
    }
    quads
}

// ── quad placement ────────────────────────────────────────────────────────

/// `(x, y)` moved by `origin`, in batch coordinates. Added as floats so
/// extreme coordinates cannot overflow.
fn offset(origin: (i32, i32), x: i32, y: i32) -> (f32, f32) {
    (origin.0 as f32 + x as f32, origin.1 as f32 + y as f32)
}

/// Filled quad for a rectangle relative to `origin`; `None` when it has no
/// area.
pub(crate) fn rect_quad(origin: (i32, i32), x: i32, y: i32, width: i32, height: i32, colors: QuadColors) -> Option<Quad> {
    if width <= 0 || height <= 0 {
        return None;
    }
    let (x, y) = offset(origin, x, y);
    Some(Quad::filled(x, y, width as f32, height as f32, colors))
}

/// Untinted quad drawing a `width`×`height` bitmap at its natural size.
pub(crate) fn image_quad(origin: (i32, i32), x: i32, y: i32, width: u32, height: u32) -> Quad {
    let (x, y) = offset(origin, x, y);
    Quad::image(x, y, width as f32, height as f32, Color::WHITE)
}

// ── BatchGraphics ─────────────────────────────────────────────────────────

/// [`Graphics`] backed by a window's [`SpriteBatch`].
///
/// Created per frame with [`begin`](Self::begin) and closed with
/// [`finish`](Self::finish), which flushes whatever is still pending.
pub struct BatchGraphics<'a, 'r> {
    batch: &'a mut SpriteBatch,
    ctx: &'a RenderCtx<'a>,
    target: &'a mut RenderTarget<'r>,
    sources: TextureSources<'a>,
    font: Option<FontId>,
    origin: (i32, i32),
}

impl<'a, 'r> BatchGraphics<'a, 'r> {
    pub fn begin(
        batch: &'a mut SpriteBatch,
        ctx: &'a RenderCtx<'a>,
        target: &'a mut RenderTarget<'r>,
        sources: TextureSources<'a>,
        font: Option<FontId>,
    ) -> Self {
        batch.begin(ctx);
        Self { batch, ctx, target, sources, font, origin: (0, 0) }
    }

    pub fn finish(self) {
        self.batch.end(self.ctx, self.target);
    }

    fn push(&mut self, texture: TextureKey, quad: &Quad) {
        self.batch.draw_quad(self.ctx, self.target, self.sources, texture, quad);
    }

    fn fill(&mut self, x: i32, y: i32, width: i32, height: i32, colors: QuadColors) {
        if let Some(quad) = rect_quad(self.origin, x, y, width, height, colors) {
            self.push(TextureKey::White, &quad);
        }
    }
}

impl Graphics for BatchGraphics<'_, '_> {
    fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        self.fill(x, y, width, height, QuadColors::uniform(color));
    }

    fn draw_horizontal_gradient_rect(&mut self, x: i32, y: i32, width: i32, height: i32, left: Color, right: Color) {
        self.fill(x, y, width, height, QuadColors::horizontal(left, right));
    }

    fn draw_vertical_gradient_rect(&mut self, x: i32, y: i32, width: i32, height: i32, top: Color, bottom: Color) {
        self.fill(x, y, width, height, QuadColors::vertical(top, bottom));
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color) {
        let Some(font) = self.font else { return; };
        let Some(atlas) = self.sources.fonts.atlas(font) else { return; };
        let (x, y) = offset(self.origin, x, y);
        for quad in text_quads(atlas, text, x, y, color) {
            self.push(TextureKey::Glyphs(font), &quad);
        }
    }

    fn draw_image(&mut self, image: BitmapId, x: i32, y: i32) {
        let Some(bitmap) = self.sources.bitmaps.get(image) else { return; };
        let quad = image_quad(self.origin, x, y, bitmap.width(), bitmap.height());
        self.push(TextureKey::Bitmap(image), &quad);
    }

    fn set_font(&mut self, font: Option<FontId>) {
        self.font = font;
    }

    fn font(&self) -> Option<FontId> {
        self.font
    }

    fn text_size(&self, text: &str) -> (u32, u32) {
        match self.font {
            Some(f) => (self.sources.fonts.text_width(f, text), self.sources.fonts.text_height(f, text)),
            None => (0, 0),
        }
    }

    fn translate(&mut self, dx: i32, dy: i32) {
        self.origin.0 = self.origin.0.saturating_add(dx);
        self.origin.1 = self.origin.1.saturating_add(dy);
    }
}

// ── test support ──────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Op {
        Rect { x: i32, y: i32, w: i32, h: i32, color: Color },
        HGradient { x: i32, y: i32, w: i32, h: i32, left: Color, right: Color },
        VGradient { x: i32, y: i32, w: i32, h: i32, top: Color, bottom: Color },
        Text { text: String, x: i32, y: i32, color: Color, font: Option<FontId> },
        Image { image: BitmapId, x: i32, y: i32 },
    }

    /// Records draw calls in absolute coordinates. Every character measures
    /// 8×16 whether or not a font is set.
    #[derive(Default)]
    pub struct RecordingGraphics {
        pub ops: Vec<Op>,
        pub font: Option<FontId>,
        origin: (i32, i32),
    }

    impl RecordingGraphics {
        pub fn origin(&self) -> (i32, i32) {
            self.origin
        }
    }

    impl Graphics for RecordingGraphics {
        fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
            let (x, y) = (x.saturating_add(self.origin.0), y.saturating_add(self.origin.1));
            self.ops.push(Op::Rect { x, y, w, h, color });
        }

        fn draw_horizontal_gradient_rect(&mut self, x: i32, y: i32, w: i32, h: i32, left: Color, right: Color) {
            let (x, y) = (x.saturating_add(self.origin.0), y.saturating_add(self.origin.1));
            self.ops.push(Op::HGradient { x, y, w, h, left, right });
        }

        fn draw_vertical_gradient_rect(&mut self, x: i32, y: i32, w: i32, h: i32, top: Color, bottom: Color) {
            let (x, y) = (x.saturating_add(self.origin.0), y.saturating_add(self.origin.1));
            self.ops.push(Op::VGradient { x, y, w, h, top, bottom });
        }

        fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color) {
            let (x, y) = (x.saturating_add(self.origin.0), y.saturating_add(self.origin.1));
            self.ops.push(Op::Text { text: text.to_string(), x, y, color, font: self.font });
        }

        fn draw_image(&mut self, image: BitmapId, x: i32, y: i32) {
            let (x, y) = (x.saturating_add(self.origin.0), y.saturating_add(self.origin.1));
            self.ops.push(Op::Image { image, x, y });
        }

        fn set_font(&mut self, font: Option<FontId>) {
            self.font = font;
        }

        fn font(&self) -> Option<FontId> {
            self.font
        }

        fn text_size(&self, text: &str) -> (u32, u32) {
            if text.is_empty() {
                return (0, 0);
            }
            (text.chars().count() as u32 * 8, 16)
        }

        fn translate(&mut self, dx: i32, dy: i32) {
            self.origin.0 = self.origin.0.saturating_add(dx);
            self.origin.1 = self.origin.1.saturating_add(dy);
        }
    }
}
