use std::path::Path;

use super::Bitmap;
use crate::EngineError;

/// Opaque handle to a bitmap held in a [`BitmapStore`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BitmapId(pub(crate) usize);

/// Owns the bitmaps an application draws.
///
/// Bitmaps are immutable once stored. The GPU copy is created lazily by the
/// sprite batch the first time a bitmap is drawn.
#[derive(Debug, Default)]
pub struct BitmapStore {
    bitmaps: Vec<Bitmap>,
}

impl BitmapStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a bitmap and returns its handle.
    pub fn insert(&mut self, bitmap: Bitmap) -> BitmapId {
        let id = BitmapId(self.bitmaps.len());
        self.bitmaps.push(bitmap);
        id
    }

    /// Decodes an image file and stores it.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<BitmapId, EngineError> {
        Ok(self.insert(Bitmap::open(path)?))
    }

    pub fn get(&self, id: BitmapId) -> Option<&Bitmap> {
        self.bitmaps.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.bitmaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bitmaps.is_empty()
    }
}
