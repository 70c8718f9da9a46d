//! CPU-side RGBA bitmaps.
//!
//! Bitmaps are stored bottom row first (bottom-left origin), which matches the
//! sprite renderer's texture coordinate convention: `t = 0` samples the bottom
//! row. Decoded files are flipped on load; generated bitmaps are written in
//! that order directly.

mod data;
mod store;

pub use data::Bitmap;
pub use store::{BitmapId, BitmapStore};
