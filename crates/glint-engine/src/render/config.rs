use std::path::PathBuf;

use super::batch::DEFAULT_CAPACITY;

/// Sprite batch configuration.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// CPU vertex buffer size, in floats. Raised to one quad when smaller.
    pub capacity: usize,

    /// WGSL file replacing the built-in sprite shader.
    ///
    /// The file must declare `vs_main`/`fs_main` and the same bind groups as
    /// the built-in shader.
    pub shader_path: Option<PathBuf>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { capacity: DEFAULT_CAPACITY, shader_path: None }
    }
}
