use std::path::PathBuf;

/// Errors raised while loading assets and shader sources.
///
/// Runtime and GPU setup failures use `anyhow` with context instead; this type
/// covers the failures a caller can reasonably name and report.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("font load error: {0}")]
    FontLoad(String),

    #[error("invalid bitmap: expected {expected} bytes for {width}x{height} RGBA, got {actual}")]
    InvalidBitmap {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("shader source {path} is empty")]
    EmptyShader { path: PathBuf },
}

impl EngineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
