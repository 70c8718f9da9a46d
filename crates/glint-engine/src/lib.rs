//! Glint engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the widget layer:
//! windows, the wgpu device, the batched sprite renderer, fonts and bitmaps.

pub mod device;
pub mod window;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
pub mod text;
pub mod bitmap;

mod error;

pub use error::EngineError;
