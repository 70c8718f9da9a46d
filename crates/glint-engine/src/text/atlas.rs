use std::collections::HashMap;
use std::ops::RangeInclusive;

use crate::bitmap::Bitmap;

/// Characters baked into every atlas.
pub const PRINTABLE_ASCII: RangeInclusive<char> = ' '..='~';

/// A rasterized character cell.
///
/// `width` is the advance, `height` the font's line height; the glyph is
/// drawn on the ascent baseline inside the cell. `coverage` holds one alpha
/// byte per pixel, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphCell {
    pub width: u32,
    pub height: u32,
    pub coverage: Vec<u8>,
    pub advance: f32,
}

/// Source of glyph cells for [`GlyphAtlas::build`].
pub trait GlyphRasterizer {
    /// Renders `c`, or returns `None` when the font has nothing to draw for it
    /// (zero advance or no glyph).
    fn rasterize_cell(&self, c: char) -> Option<GlyphCell>;
}

/// Placement of one character in the atlas strip.
///
/// `x`/`y` are pixel offsets in bottom-left origin coordinates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Glyph {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
    pub advance: f32,
}

/// Texture coordinates of a glyph (bottom-left origin).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlyphUv {
    pub s_left: f32,
    pub s_right: f32,
    pub t_top: f32,
    pub t_bottom: f32,
}

/// Single-strip glyph atlas.
///
/// Cells are packed left to right in `PRINTABLE_ASCII` order. The strip is as
/// wide as the sum of the cell widths and as tall as the tallest cell, and is
/// stored flipped (bottom row first) like every other [`Bitmap`].
#[derive(Debug, Clone)]
pub struct GlyphAtlas {
    glyphs: HashMap<char, Glyph>,
    bitmap: Bitmap,
}

impl GlyphAtlas {
    /// Rasterizes every printable ASCII character and packs the result.
    pub fn build(rasterizer: &impl GlyphRasterizer) -> Self {
        let cells: Vec<(char, GlyphCell)> = PRINTABLE_ASCII
            .filter_map(|c| rasterizer.rasterize_cell(c).map(|cell| (c, cell)))
            .filter(|(_, cell)| cell.width > 0 && cell.height > 0)
            .collect();

        let width: u32 = cells.iter().map(|(_, cell)| cell.width).sum();
        let height: u32 = cells.iter().map(|(_, cell)| cell.height).max().unwrap_or(0);

        let row_len = width as usize * 4;
        let mut strip = vec![0u8; row_len * height as usize];
        let mut glyphs = HashMap::with_capacity(cells.len());
        let mut x = 0u32;

        for (c, cell) in &cells {
            glyphs.insert(*c, Glyph {
                width: cell.width,
                height: cell.height,
                x,
                y: height - cell.height,
                advance: cell.advance,
            });

            // Cells sit at the top of the strip (before the flip).
            for row in 0..cell.height as usize {
                for col in 0..cell.width as usize {
                    let alpha = cell.coverage.get(row * cell.width as usize + col).copied().unwrap_or(0);
                    let i = row * row_len + (x as usize + col) * 4;
                    strip[i..i + 4].copy_from_slice(&[255, 255, 255, alpha]);
                }
            }

            x += cell.width;
        }

        let bitmap = match Bitmap::from_rgba(width, height, strip) {
            Ok(top_down) => top_down.flipped_vertically(),
            Err(e) => {
                // Unreachable by construction; keep an empty atlas rather than panic.
                log::error!("glyph atlas packing produced a bad strip: {e}");
                Bitmap::solid(crate::paint::Color::TRANSPARENT, 0, 0)
            }
        };

        log::debug!("built glyph atlas: {} glyphs, {}x{}", glyphs.len(), width, height);
        Self { glyphs, bitmap }
    }

    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs.get(&c)
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// The atlas strip, bottom row first.
    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    /// Height of one text line (the tallest cell).
    pub fn line_height(&self) -> u32 {
        self.bitmap.height()
    }

    /// Texture coordinates for `glyph` within this atlas.
    pub fn uv(&self, glyph: &Glyph) -> GlyphUv {
        let w = self.bitmap.width().max(1) as f32;
        let h = self.bitmap.height().max(1) as f32;
        GlyphUv {
            s_left: glyph.x as f32 / w,
            s_right: (glyph.x + glyph.width) as f32 / w,
            t_top: (glyph.y + glyph.height) as f32 / h,
            t_bottom: glyph.y as f32 / h,
        }
    }

    /// Width of the widest line of `text`, in pixels.
    ///
    /// `\r` is ignored and characters missing from the atlas contribute nothing.
    pub fn text_width(&self, text: &str) -> u32 {
        let mut line = 0u32;
        let mut widest = 0u32;
        for c in text.chars() {
            match c {
                '\n' => {
                    widest = widest.max(line);
                    line = 0;
                }
                '\r' => {}
                _ => line += self.glyph(c).map_or(0, |g| g.width),
            }
        }
        widest.max(line)
    }

    /// Sum over lines of the tallest glyph on each line, in pixels.
    pub fn text_height(&self, text: &str) -> u32 {
        let mut line = 0u32;
        let mut total = 0u32;
        for c in text.chars() {
            match c {
                '\n' => {
                    total += line;
                    line = 0;
                }
                '\r' => {}
                _ => line = line.max(self.glyph(c).map_or(0, |g| g.height)),
            }
        }
        total + line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Cells sized per character; everything else has no glyph.
    struct FakeRasterizer(HashMap<char, (u32, u32)>);

    impl FakeRasterizer {
        fn new(cells: &[(char, u32, u32)]) -> Self {
            Self(cells.iter().map(|&(c, w, h)| (c, (w, h))).collect())
        }
    }

    impl GlyphRasterizer for FakeRasterizer {
        fn rasterize_cell(&self, c: char) -> Option<GlyphCell> {
            let &(width, height) = self.0.get(&c)?;
            Some(GlyphCell {
                width,
                height,
                // Fully covered top row, empty elsewhere.
                coverage: (0..width * height).map(|i| if i < width { 255 } else { 0 }).collect(),
                advance: width as f32,
            })
        }
    }

    fn atlas() -> GlyphAtlas {
        GlyphAtlas::build(&FakeRasterizer::new(&[('A', 3, 4), ('b', 2, 6), (' ', 1, 6)]))
    }

    #[test]
    fn strip_dimensions() {
        let a = atlas();
        assert_eq!(a.glyph_count(), 3);
        assert_eq!(a.bitmap().width(), 6);
        assert_eq!(a.bitmap().height(), 6);
        assert_eq!(a.line_height(), 6);
    }

    #[test]
    fn packs_left_to_right_in_ascii_order() {
        let a = atlas();
        // ' ' (0x20) < 'A' (0x41) < 'b' (0x62)
        assert_eq!(a.glyph(' ').unwrap().x, 0);
        assert_eq!(a.glyph('A').unwrap().x, 1);
        assert_eq!(a.glyph('b').unwrap().x, 4);
    }

    #[test]
    fn y_offset_is_measured_from_the_bottom() {
        let a = atlas();
        assert_eq!(a.glyph('A').unwrap().y, 2);
        assert_eq!(a.glyph('b').unwrap().y, 0);
    }

    #[test]
    fn strip_is_flipped() {
        let a = atlas();
        let bmp = a.bitmap();
        // 'A' has its covered row at the top of its cell, which after the flip
        // is the last storage row.
        let g = *a.glyph('A').unwrap();
        assert_eq!(bmp.pixel(g.x, bmp.height() - 1), Some([255, 255, 255, 255]));
        assert_eq!(bmp.pixel(g.x, g.y), Some([255, 255, 255, 0]));
        // Below a short cell the strip stays empty.
        assert_eq!(bmp.pixel(g.x, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn characters_without_cells_are_skipped() {
        let a = atlas();
        assert!(a.glyph('z').is_none());
        let zero = GlyphAtlas::build(&FakeRasterizer::new(&[('x', 0, 5)]));
        assert_eq!(zero.glyph_count(), 0);
        assert!(zero.bitmap().is_empty());
    }

    #[test]
    fn uv_matches_bottom_left_convention() {
        let a = atlas();
        let g = *a.glyph('A').unwrap();
        let uv = a.uv(&g);
        assert_eq!(uv.s_left, 1.0 / 6.0);
        assert_eq!(uv.s_right, 4.0 / 6.0);
        assert_eq!(uv.t_bottom, 2.0 / 6.0);
        assert_eq!(uv.t_top, 1.0);
    }

    #[test]
    fn width_is_widest_line() {
        let a = atlas();
        assert_eq!(a.text_width("Ab"), 5);
        assert_eq!(a.text_width("A\nbbb"), 6);
        assert_eq!(a.text_width("A\r\nb"), 3);
        assert_eq!(a.text_width(""), 0);
        // Unknown characters add nothing.
        assert_eq!(a.text_width("AzA"), 6);
    }

    #[test]
    fn height_sums_tallest_glyph_per_line() {
        let a = atlas();
        assert_eq!(a.text_height("A"), 4);
        assert_eq!(a.text_height("Ab"), 6);
        assert_eq!(a.text_height("A\nA"), 8);
        assert_eq!(a.text_height("A\r\nb"), 10);
        assert_eq!(a.text_height(""), 0);
    }
}
