//! Coordinate types shared by the renderer and the widget layer.
//!
//! Canonical CPU space:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down
//!
//! The sprite shader converts to NDC using a viewport uniform.

mod viewport;

pub use viewport::Viewport;
