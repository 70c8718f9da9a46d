//! GPU device + surface management.
//!
//! One [`Gpu`] per window: wgpu adapter/device/queue, the configured surface,
//! and frame acquisition.

mod gpu;

pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
