//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the open windows, and wires each window to
//! its own [`Gpu`](crate::device::Gpu).

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
