use std::path::Path;

use glint_engine::EngineError;
use glint_engine::bitmap::{Bitmap, BitmapId, BitmapStore};
use glint_engine::render::TextureSources;
use glint_engine::text::{FontId, FontSystem};

/// Fonts and bitmaps shared by every window of an application.
///
/// The first font loaded becomes the default font each window starts
/// rendering with.
#[derive(Default)]
pub struct Assets {
    fonts: FontSystem,
    bitmaps: BitmapStore,
    default_font: Option<FontId>,
}

impl Assets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rasterizes a TTF/OTF font at `px` pixels.
    pub fn load_font(&mut self, bytes: &[u8], px: f32) -> Result<FontId, EngineError> {
        let id = self.fonts.load_font(bytes, px)?;
        self.default_font.get_or_insert(id);
        Ok(id)
    }

    pub fn open_font(&mut self, path: impl AsRef<Path>, px: f32) -> Result<FontId, EngineError> {
        let id = self.fonts.open_font(path, px)?;
        self.default_font.get_or_insert(id);
        Ok(id)
    }

    /// Decodes an image file into the bitmap store.
    pub fn open_bitmap(&mut self, path: impl AsRef<Path>) -> Result<BitmapId, EngineError> {
        self.bitmaps.open(path)
    }

    pub fn insert_bitmap(&mut self, bitmap: Bitmap) -> BitmapId {
        self.bitmaps.insert(bitmap)
    }

    pub fn default_font(&self) -> Option<FontId> {
        self.default_font
    }

    pub fn set_default_font(&mut self, font: Option<FontId>) {
        self.default_font = font;
    }

    pub fn fonts(&self) -> &FontSystem {
        &self.fonts
    }

    pub fn bitmaps(&self) -> &BitmapStore {
        &self.bitmaps
    }

    pub(crate) fn sources(&self) -> TextureSources<'_> {
        TextureSources::new(&self.fonts, &self.bitmaps)
    }
}

#[cfg(test)]
mod tests {
    use glint_engine::paint::Color;

    use super::*;

    #[test]
    fn starts_without_a_default_font() {
        let assets = Assets::new();
        assert!(assets.default_font().is_none());
        assert!(assets.bitmaps().is_empty());
    }

    #[test]
    fn garbage_font_is_rejected_and_leaves_no_default() {
        let mut assets = Assets::new();
        assert!(assets.load_font(b"not a font", 16.0).is_err());
        assert!(assets.default_font().is_none());
    }

    #[test]
    fn missing_files_report_errors() {
        let mut assets = Assets::new();
        assert!(assets.open_font("/nonexistent/font.ttf", 16.0).is_err());
        assert!(assets.open_bitmap("/nonexistent/image.png").is_err());
    }

    #[test]
    fn inserted_bitmaps_are_visible_to_renderers() {
        let mut assets = Assets::new();
        let id = assets.insert_bitmap(Bitmap::solid(Color::WHITE, 3, 2));
        let bitmap = assets.bitmaps().get(id).unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (3, 2));
        assert!(assets.sources().bitmaps.get(id).is_some());
    }
}
