//! Fonts and glyph atlases.
//!
//! A font is loaded at a fixed pixel size; loading rasterizes every printable
//! ASCII character into a single-strip [`GlyphAtlas`] on the CPU. The sprite
//! batch uploads the atlas as a texture the first time text is drawn with it.

mod atlas;
mod font_system;

pub use atlas::{Glyph, GlyphAtlas, GlyphCell, GlyphRasterizer, GlyphUv, PRINTABLE_ASCII};
pub use font_system::{FontId, FontSystem};
