//! Paint model shared between the widget layer and the renderer.
//!
//! Colors are straight (non-premultiplied) RGBA with every channel clamped to
//! [0, 1]. The sprite pipeline blends with source-alpha / one-minus-source-alpha.

pub mod color;

pub use color::Color;
