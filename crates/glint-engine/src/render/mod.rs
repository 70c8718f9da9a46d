//! GPU rendering subsystem.
//!
//! A single immediate-mode [`SpriteBatch`] draws everything: solid and
//! gradient rectangles (white texel tinted by vertex colors), bitmaps, and
//! text (glyph atlas quads). The CPU side ([`VertexBatch`]) is GPU-free and
//! tested on its own.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shader converts to NDC using a viewport uniform.
//! - Texture coordinates use a bottom-left origin (`t = 0` is the bottom row).

mod batch;
mod config;
mod ctx;
mod shader;
mod sprite;
mod texture;

pub use batch::{
    Quad, QuadColors, TextureKey, VertexBatch, COLOR_OFFSET, DEFAULT_CAPACITY, FLOATS_PER_QUAD,
    FLOATS_PER_VERTEX, POSITION_OFFSET, TEX_COORD_OFFSET, VERTICES_PER_QUAD,
};
pub use config::BatchConfig;
pub use ctx::{RenderCtx, RenderTarget};
pub use shader::ShaderSource;
pub use sprite::{SpriteBatch, TextureSources};
