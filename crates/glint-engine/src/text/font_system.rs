use std::path::Path;

use super::atlas::{GlyphAtlas, GlyphCell, GlyphRasterizer};
use crate::EngineError;

/// Opaque handle to a font loaded into a [`FontSystem`].
///
/// A handle names one face at one pixel size.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

struct LoadedFont {
    px: f32,
    atlas: GlyphAtlas,
}

/// Owns the loaded fonts and their glyph atlases.
///
/// Fonts are immutable after loading. Atlases are built eagerly at load time,
/// so nothing here needs a GPU and the whole system can be prepared before
/// the event loop starts.
#[derive(Default)]
pub struct FontSystem {
    fonts: Vec<LoadedFont>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a TrueType or OpenType font and bakes its printable ASCII glyphs
    /// at `px` pixels.
    pub fn load_font(&mut self, bytes: &[u8], px: f32) -> Result<FontId, EngineError> {
        if !(px.is_finite() && px > 0.0) {
            return Err(EngineError::FontLoad(format!("invalid pixel size {px}")));
        }

        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| EngineError::FontLoad(e.to_string()))?;

        let atlas = GlyphAtlas::build(&FontdueRasterizer { font: &font, px });
        if atlas.glyph_count() == 0 {
            log::warn!("font has no printable ASCII glyphs at {px}px; text will not render");
        }

        let id = FontId(self.fonts.len());
        self.fonts.push(LoadedFont { px, atlas });
        Ok(id)
    }

    /// Reads a font file and loads it at `px` pixels.
    pub fn open_font(&mut self, path: impl AsRef<Path>, px: f32) -> Result<FontId, EngineError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| EngineError::io(path, e))?;
        let id = self.load_font(&bytes, px)?;
        log::debug!("loaded font {} at {px}px", path.display());
        Ok(id)
    }

    /// Returns the glyph atlas for `id`, if `id` is valid.
    pub fn atlas(&self, id: FontId) -> Option<&GlyphAtlas> {
        self.fonts.get(id.0).map(|f| &f.atlas)
    }

    /// Pixel size the font was baked at.
    pub fn px_size(&self, id: FontId) -> Option<f32> {
        self.fonts.get(id.0).map(|f| f.px)
    }

    /// Width of the widest line of `text`. Unknown fonts measure as zero.
    #[must_use]
    pub fn text_width(&self, id: FontId, text: &str) -> u32 {
        self.atlas(id).map_or(0, |a| a.text_width(text))
    }

    /// Total height of `text`. Unknown fonts measure as zero.
    #[must_use]
    pub fn text_height(&self, id: FontId, text: &str) -> u32 {
        self.atlas(id).map_or(0, |a| a.text_height(text))
    }
}

/// Renders character cells with fontdue.
struct FontdueRasterizer<'a> {
    font: &'a fontdue::Font,
    px: f32,
}

impl GlyphRasterizer for FontdueRasterizer<'_> {
    fn rasterize_cell(&self, c: char) -> Option<GlyphCell> {
        if self.font.lookup_glyph_index(c) == 0 {
            return None;
        }

        let (ascent, line_height) = self
            .font
            .horizontal_line_metrics(self.px)
            .map_or((self.px, self.px * 1.2), |m| (m.ascent, m.new_line_size));

        let (metrics, raster) = self.font.rasterize(c, self.px);
        let width = metrics.advance_width.ceil() as u32;
        if width == 0 {
            return None;
        }
        let height = line_height.ceil().max(1.0) as u32;

        let mut coverage = vec![0u8; width as usize * height as usize];

        // Glyph box in cell coordinates (top-left origin, +Y down).
        let left = metrics.xmin;
        let top = ascent.round() as i32 - (metrics.ymin + metrics.height as i32);

        for gy in 0..metrics.height {
            let cy = top + gy as i32;
            if cy < 0 || cy >= height as i32 {
                continue;
            }
            for gx in 0..metrics.width {
                let cx = left + gx as i32;
                if cx < 0 || cx >= width as i32 {
                    continue;
                }
                let dst = cy as usize * width as usize + cx as usize;
                coverage[dst] = coverage[dst].max(raster[gy * metrics.width + gx]);
            }
        }

        Some(GlyphCell { width, height, coverage, advance: metrics.advance_width })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_fail_to_load() {
        let mut fonts = FontSystem::new();
        let err = fonts.load_font(b"definitely not a font", 16.0).unwrap_err();
        assert!(matches!(err, EngineError::FontLoad(_)));
    }

    #[test]
    fn invalid_size_is_rejected_before_parsing() {
        let mut fonts = FontSystem::new();
        assert!(matches!(fonts.load_font(&[], 0.0), Err(EngineError::FontLoad(_))));
        assert!(matches!(fonts.load_font(&[], f32::NAN), Err(EngineError::FontLoad(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let mut fonts = FontSystem::new();
        let err = fonts.open_font("/no/such/font.ttf", 12.0).unwrap_err();
        assert!(matches!(err, EngineError::Io { .. }));
    }

    #[test]
    fn unknown_font_measures_zero() {
        let fonts = FontSystem::new();
        assert_eq!(fonts.text_width(FontId(3), "hello"), 0);
        assert_eq!(fonts.text_height(FontId(3), "hello"), 0);
        assert!(fonts.atlas(FontId(0)).is_none());
    }
}
