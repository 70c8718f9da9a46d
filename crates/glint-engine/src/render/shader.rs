use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::EngineError;

const BUILTIN_SPRITE: &str = include_str!("shaders/sprite.wgsl");

/// WGSL source for the sprite pipeline.
///
/// The source is resolved when the batch is created so a missing or empty
/// shader file fails early instead of on the first frame.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    label: String,
    code: Cow<'static, str>,
}

impl ShaderSource {
    /// The sprite shader compiled into the crate.
    pub fn builtin() -> Self {
        Self { label: "builtin sprite.wgsl".to_owned(), code: Cow::Borrowed(BUILTIN_SPRITE) }
    }

    /// Reads a WGSL file. The file must define `vs_main` and `fs_main` with the
    /// same bindings as the built-in shader.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let code = std::fs::read_to_string(path).map_err(|e| EngineError::io(path, e))?;
        if code.trim().is_empty() {
            return Err(EngineError::EmptyShader { path: path.to_path_buf() });
        }
        log::debug!("loaded shader {}", path.display());
        Ok(Self { label: path.display().to_string(), code: Cow::Owned(code) })
    }

    /// Built-in source, or the file at `path` when one is given.
    pub fn resolve(path: Option<&PathBuf>) -> Result<Self, EngineError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::builtin()),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub(crate) fn module(&self, device: &wgpu::Device) -> wgpu::ShaderModule {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&self.label),
            source: wgpu::ShaderSource::Wgsl(self.code.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_both_entry_points() {
        let src = ShaderSource::builtin();
        assert!(src.code().contains("fn vs_main"));
        assert!(src.code().contains("fn fs_main"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ShaderSource::from_file("/no/such/shader.wgsl").unwrap_err();
        assert!(matches!(err, EngineError::Io { .. }));
    }

    #[test]
    fn empty_file_is_rejected() {
        let path = std::env::temp_dir().join(format!("glint-empty-{}.wgsl", std::process::id()));
        std::fs::write(&path, "  \n").unwrap();
        let err = ShaderSource::from_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, EngineError::EmptyShader { .. }));
    }

    #[test]
    fn resolve_without_path_is_builtin() {
        let src = ShaderSource::resolve(None).unwrap();
        assert_eq!(src.label(), "builtin sprite.wgsl");
    }

    #[test]
    fn file_source_is_read_verbatim() {
        let path = std::env::temp_dir().join(format!("glint-custom-{}.wgsl", std::process::id()));
        std::fs::write(&path, BUILTIN_SPRITE).unwrap();
        let src = ShaderSource::resolve(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(src.code(), BUILTIN_SPRITE);
    }
}
